//! Error types for the store crate.

use std::path::PathBuf;

/// Errors that can occur while materializing bundles locally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The fetcher has no bundle for the requested hash.
    #[error("bundle {name} ({hash}) not available from the fetcher")]
    NotFound { name: String, hash: String },

    /// A cache file or directory could not be read or written.
    #[error("store I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
