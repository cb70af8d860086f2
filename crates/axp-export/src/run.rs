//! One export call, end to end.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use axp_bundle::BundleLoader;
use axp_types::{ExportKind, WarningKind};

use crate::error::ExportError;
use crate::functions::export_function;
use crate::info::ExportInfo;
use crate::result::ExportResult;

/// Load the bundles at `paths`, select the objects matching the sub-task's
/// filter, and run the export function for `kind`.
///
/// `paths` is a dependency group in expansion order: the first path is the
/// main bundle. Matching zero objects is not an error: it logs a warning
/// (unless `suppressed` covers it) and returns an empty result.
pub fn export_bundles(
    loader: &dyn BundleLoader,
    paths: &[PathBuf],
    kind: ExportKind,
    container_filter: &Regex,
    export_dir: &Path,
    suppressed: &[WarningKind],
) -> Result<ExportResult, ExportError> {
    let bundles = loader.load(paths)?;
    debug!(
        "getting objects to export from {} bundles ({})",
        bundles.bundle_count(),
        bundles.name()
    );

    let objects = bundles.objects_matching(kind.object_kinds(), Some(container_filter));
    if objects.is_empty() {
        if !suppressed.contains(&WarningKind::NothingToExport) {
            warn!("Nothing to export for the asset: {}", bundles.name());
        }
        return Ok(ExportResult::default());
    }
    debug!(
        "found {} objects to export from {}",
        objects.len(),
        bundles.name()
    );

    let info = ExportInfo::new(export_dir, objects, &bundles, suppressed);
    let result = export_function(kind)(&info)?;
    debug!("done exporting {} to {}", bundles.name(), export_dir.display());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axp_bundle::{BundleObject, MemoryBundleLoader};
    use axp_types::ObjectKind;
    use serde_json::json;

    fn loader_with_master() -> MemoryBundleLoader {
        let loader = MemoryBundleLoader::new();
        loader.insert(
            "aa01",
            vec![BundleObject::from_tree(
                1,
                ObjectKind::MonoBehaviour,
                "master",
                Some("assets/master/data".to_string()),
                &json!({"m_Name": "master"}),
            )],
        );
        loader
    }

    #[test]
    fn exports_matching_objects() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_with_master();
        let filter = Regex::new("master").unwrap();

        let result = export_bundles(
            &loader,
            &[PathBuf::from("cache/aa/aa01")],
            ExportKind::MonoBehaviour,
            &filter,
            dir.path(),
            &[],
        )
        .unwrap();

        assert_eq!(result.exported_paths.len(), 1);
        assert!(dir.path().join("assets/master/master.json").is_file());
    }

    #[test]
    fn no_match_is_an_empty_result_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader_with_master();
        let filter = Regex::new("prefabs/").unwrap();

        let result = export_bundles(
            &loader,
            &[PathBuf::from("cache/aa/aa01")],
            ExportKind::MonoBehaviour,
            &filter,
            dir.path(),
            &[WarningKind::NothingToExport],
        )
        .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn unknown_bundle_propagates_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = MemoryBundleLoader::new();
        let filter = Regex::new(".").unwrap();

        let result = export_bundles(
            &loader,
            &[PathBuf::from("cache/ff/ff00")],
            ExportKind::MonoBehaviour,
            &filter,
            dir.path(),
            &[],
        );
        assert!(matches!(result, Err(ExportError::Bundle(_))));
    }
}
