//! Multi-bundle object lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use regex::Regex;

use axp_types::ObjectKind;

use crate::object::{BundleObject, ObjectInfo};

/// One loaded bundle: its objects, indexed by path id.
///
/// Indexing records ids only; object payloads stay serialized until read.
#[derive(Clone, Debug)]
pub struct LoadedBundle {
    name: String,
    objects: Vec<BundleObject>,
    by_path_id: HashMap<i64, usize>,
}

impl LoadedBundle {
    /// Build a bundle from its objects.
    pub fn new(name: impl Into<String>, objects: Vec<BundleObject>) -> Self {
        let by_path_id = objects
            .iter()
            .enumerate()
            .map(|(idx, object)| (object.path_id(), idx))
            .collect();
        Self {
            name: name.into(),
            objects,
            by_path_id,
        }
    }

    /// The bundle's name (its content hash for downloaded bundles).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bundle's objects, in container order.
    pub fn objects(&self) -> &[BundleObject] {
        &self.objects
    }

    fn object_at(&self, path_id: i64) -> Option<&BundleObject> {
        self.by_path_id.get(&path_id).map(|&idx| &self.objects[idx])
    }
}

/// The set of bundles loaded for one export call: the main bundle first,
/// then its dependency bundles in expansion order.
#[derive(Debug)]
pub struct BundleSet {
    bundles: Vec<LoadedBundle>,
    lookups: AtomicUsize,
}

impl BundleSet {
    /// Assemble a set; the first bundle is the main bundle.
    pub fn new(bundles: Vec<LoadedBundle>) -> Self {
        Self {
            bundles,
            lookups: AtomicUsize::new(0),
        }
    }

    /// The main bundle's name, or empty for an empty set.
    pub fn name(&self) -> &str {
        self.bundles.first().map(|b| b.name()).unwrap_or_default()
    }

    /// Number of loaded bundles.
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    /// Total number of objects across bundles.
    pub fn object_count(&self) -> usize {
        self.bundles.iter().map(|b| b.objects().len()).sum()
    }

    /// Select the objects an export call starts from: those in `kinds`
    /// whose container path matches `filter` (any container when `None`).
    ///
    /// Only objects that carry a container path are candidates; dependency
    /// objects without one are reachable through
    /// [`find_object`](Self::find_object) instead.
    pub fn objects_matching(
        &self,
        kinds: &[ObjectKind],
        filter: Option<&Regex>,
    ) -> Vec<ObjectInfo> {
        let mut selected = Vec::new();
        for (bundle_idx, bundle) in self.bundles.iter().enumerate() {
            for object in bundle.objects() {
                let Some(container) = object.container() else {
                    continue;
                };
                if !kinds.contains(&object.kind()) {
                    continue;
                }
                if let Some(filter) = filter {
                    if !filter.is_match(container) {
                        continue;
                    }
                }
                selected.push(ObjectInfo {
                    object: object.clone(),
                    container: container.to_string(),
                    from_main_bundle: bundle_idx == 0,
                });
            }
        }
        selected
    }

    /// Look up an object by path id across all bundles, main bundle first.
    ///
    /// `fallback_container` labels the resolved object when its bundle
    /// records no container path of its own; callers pass the *requesting*
    /// object's container, which keeps exported files grouped with the
    /// object that pulled them in.
    pub fn find_object(&self, path_id: i64, fallback_container: &str) -> Option<ObjectInfo> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        for (bundle_idx, bundle) in self.bundles.iter().enumerate() {
            if let Some(object) = bundle.object_at(path_id) {
                let container = object
                    .container()
                    .unwrap_or(fallback_container)
                    .to_string();
                return Some(ObjectInfo {
                    object: object.clone(),
                    container,
                    from_main_bundle: bundle_idx == 0,
                });
            }
        }
        None
    }

    /// Number of `find_object` calls served. Instrumentation for logs and
    /// tests; resolver caches sit above this.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}
