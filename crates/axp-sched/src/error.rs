//! Error types for the scheduler.

use axp_export::ExportError;
use axp_manifest::ManifestError;
use axp_store::StoreError;

/// Owner-side scheduling failures.
///
/// Worker-side failures never appear here: they are collected by the engine
/// and escalate to fail-fast process termination.
#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    /// Dependency expansion failed (cycle or unknown dependency).
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Convenience alias for scheduler results.
pub type SchedResult<T> = Result<T, SchedError>;

/// One worker's failure: anything that can go wrong while materializing and
/// exporting a dependency group.
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    /// A bundle could not be materialized locally.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The export call failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A raw artifact could not be written.
    #[error("failed to copy raw asset to {path}: {source}")]
    RawCopy {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
