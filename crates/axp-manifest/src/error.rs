//! Error types for the manifest crate.

use std::path::PathBuf;

/// Errors that can occur while loading or querying the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A manifest document could not be read.
    #[error("failed to read manifest document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest document did not deserialize.
    #[error("failed to parse manifest document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry names a dependency absent from its locale's catalog.
    #[error("entry {dependent} depends on unknown entry {name}")]
    UnknownDependency { dependent: String, name: String },

    /// Dependency expansion revisited an entry already on the walk stack.
    /// The manifest declares a cycle, which is a fatal configuration error.
    #[error("dependency cycle through entry {name}")]
    DependencyCycle { name: String },
}

/// Convenience alias for manifest results.
pub type ManifestResult<T> = Result<T, ManifestError>;
