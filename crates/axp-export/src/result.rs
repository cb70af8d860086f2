//! Export call results.

use std::path::Path;

use axp_bundle::FieldTree;

/// What one export call produced.
///
/// Paths are normalized to forward slashes regardless of platform; they
/// feed the audit trail, which is diffed across operating systems.
#[derive(Clone, Debug, Default)]
pub struct ExportResult {
    /// Produced file paths, in production order.
    pub exported_paths: Vec<String>,
    /// Structured payloads produced alongside the files (one per exported
    /// object that had one). Used by callers that post-process exported
    /// trees, e.g. the manifest itself.
    pub payloads: Vec<FieldTree>,
}

impl ExportResult {
    /// Record one produced file.
    pub fn push_path(&mut self, path: &Path) {
        self.exported_paths
            .push(path.to_string_lossy().replace('\\', "/"));
    }

    /// Returns `true` if the call produced nothing.
    pub fn is_empty(&self) -> bool {
        self.exported_paths.is_empty() && self.payloads.is_empty()
    }
}
