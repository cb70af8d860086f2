//! Error types for the index crate.

use std::path::PathBuf;

/// Errors that can occur during index persistence.
///
/// Reads never produce these: a missing or unreadable index file is
/// recovered as an empty index. Writes always do: losing the index
/// silently would turn every future run into a full reprocess without
/// anyone noticing.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// An index, snapshot, or catalog file could not be written.
    #[error("failed to write index file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Index data could not be serialized.
    #[error("failed to serialize index data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
