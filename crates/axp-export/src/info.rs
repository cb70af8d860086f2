//! The export working set and cross-reference resolver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use axp_bundle::{BundleSet, ObjectInfo};
use axp_types::WarningKind;

use crate::error::ExportError;

/// The working set of one export call.
///
/// Owns the objects the sub-task selected, the export directory, and the
/// path-id resolver cache. Lives on one worker thread for exactly one call;
/// the cache is discarded when the call returns.
pub struct ExportInfo<'a> {
    export_dir: PathBuf,
    objects: Vec<ObjectInfo>,
    bundles: &'a BundleSet,
    suppressed: &'a [WarningKind],
    // Append-only for the life of the call. RefCell keeps `object_at`
    // usable from `&self` while exporters iterate `objects`; the info
    // never crosses threads (one call, one worker).
    cache: RefCell<HashMap<i64, ObjectInfo>>,
}

impl<'a> ExportInfo<'a> {
    /// Build the working set for one export call.
    ///
    /// The resolver cache starts out seeded with the selected objects.
    pub fn new(
        export_dir: impl Into<PathBuf>,
        objects: Vec<ObjectInfo>,
        bundles: &'a BundleSet,
        suppressed: &'a [WarningKind],
    ) -> Self {
        let cache = objects
            .iter()
            .map(|info| (info.path_id(), info.clone()))
            .collect();
        Self {
            export_dir: export_dir.into(),
            objects,
            bundles,
            suppressed,
            cache: RefCell::new(cache),
        }
    }

    /// The objects the sub-task selected for this call.
    pub fn objects(&self) -> &[ObjectInfo] {
        &self.objects
    }

    /// The main bundle's name.
    pub fn asset_name(&self) -> &str {
        self.bundles.name()
    }

    /// Whether this call's task suppressed `warning`.
    pub fn suppresses(&self, warning: WarningKind) -> bool {
        self.suppressed.contains(&warning)
    }

    /// Resolve the object at `path_id`.
    ///
    /// Checks the per-call cache first; on a miss, asks the bundle set,
    /// labeling the resolved object with the *requesting* object's container
    /// (dependency bundles frequently record none of their own). The first
    /// resolution of an id may deserialize a large object; later calls for
    /// the same id are cache hits.
    pub fn object_at(
        &self,
        path_id: i64,
        requesting: &ObjectInfo,
    ) -> Result<ObjectInfo, ExportError> {
        if let Some(cached) = self.cache.borrow().get(&path_id) {
            return Ok(cached.clone());
        }

        let resolved = self
            .bundles
            .find_object(path_id, &requesting.container)
            .ok_or_else(|| ExportError::ReferenceNotFound {
                path_id,
                bundle: self.asset_name().to_string(),
            })?;
        self.cache.borrow_mut().insert(path_id, resolved.clone());
        Ok(resolved)
    }

    /// The export directory for `info`'s artifacts, derived from its
    /// container path. Creates the directory.
    pub fn export_dir_of(&self, info: &ObjectInfo) -> Result<PathBuf, ExportError> {
        let container_dir = Path::new(&info.container).parent().unwrap_or(Path::new(""));
        let dir = self.export_dir.join(container_dir);
        fs::create_dir_all(&dir).map_err(|source| ExportError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

impl std::fmt::Debug for ExportInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportInfo")
            .field("asset_name", &self.asset_name())
            .field("export_dir", &self.export_dir)
            .field("objects", &self.objects.len())
            .finish()
    }
}
