//! Error types for the bundle crate.

use std::path::PathBuf;

/// Errors that can occur while loading bundles or materializing objects.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// A bundle file could not be read.
    #[error("failed to read bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bundle file did not parse.
    #[error("failed to parse bundle {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An object payload did not deserialize into a type tree.
    #[error("object {name} (#{path_id}) has a malformed type tree: {source}")]
    MalformedTypeTree {
        name: String,
        path_id: i64,
        #[source]
        source: serde_json::Error,
    },

    /// The loader was asked to load an empty path list.
    #[error("no bundle paths given")]
    NoPaths,

    /// A loader had no bundle registered for the requested path.
    #[error("no bundle registered for {path}")]
    UnknownBundle { path: PathBuf },
}

/// Convenience alias for bundle results.
pub type BundleResult<T> = Result<T, BundleError>;
