//! Error types for the foundation crate.

/// Errors from parsing foundation type values.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A locale wire code outside the closed set.
    #[error("unknown locale code: {0}")]
    UnknownLocale(String),

    /// An export kind name with no registered export function.
    #[error("unknown export kind: {0}")]
    UnknownExportKind(String),
}
