//! Error types for export calls.
//!
//! Every variant here is fatal to the export call that raised it; the
//! worker surfaces it to the engine, which applies the fail-fast policy.
//! "Nothing to export" is deliberately not an error; it is a suppressible
//! warning handled inside the call.

use std::path::PathBuf;

use axp_bundle::BundleError;

/// Errors that can occur inside one export call.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A cross-reference id resolved to nothing anywhere reachable.
    #[error("path id #{path_id} not found anywhere in bundle set {bundle}")]
    ReferenceNotFound { path_id: i64, bundle: String },

    /// A loaded object's field tree is missing a field the exporter needs.
    #[error("object {object} has no field {field}")]
    MissingField { object: String, field: String },

    /// Loading or materializing bundle data failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// An export artifact could not be written.
    #[error("failed to write export artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An export payload could not be serialized.
    #[error("failed to serialize export payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
