//! Bundle loader seam and shipped implementations.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::Deserialize;
use tracing::debug;

use axp_types::ObjectKind;

use crate::error::{BundleError, BundleResult};
use crate::object::{BundleObject, FieldTree};
use crate::set::{BundleSet, LoadedBundle};

/// Loads cached bundle files into a [`BundleSet`].
///
/// The first path is the main bundle; the rest are its dependency bundles in
/// expansion order. The proprietary container reader implements this trait
/// out of tree; the shipped implementations cover tests, embedding, and
/// pre-extracted development data.
pub trait BundleLoader: Send + Sync {
    /// Load the bundles at `paths`.
    fn load(&self, paths: &[PathBuf]) -> BundleResult<BundleSet>;
}

/// One object record of a pre-extracted bundle document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectRecord {
    path_id: i64,
    kind: ObjectKind,
    name: String,
    #[serde(default)]
    container: Option<String>,
    fields: FieldTree,
}

/// Loader for pre-extracted bundle documents: each cached bundle file is a
/// JSON array of object records.
///
/// This is the development and CI form of the container format: the output
/// of running the external extractor over the real bundles once, checked
/// into a mirror. Production deployments swap in the reader-backed loader
/// behind the same trait.
#[derive(Debug, Default)]
pub struct JsonBundleLoader;

impl JsonBundleLoader {
    /// Create the loader.
    pub fn new() -> Self {
        Self
    }

    fn load_one(&self, path: &Path) -> BundleResult<LoadedBundle> {
        let text = fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<ObjectRecord> =
            serde_json::from_str(&text).map_err(|source| BundleError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let objects = records
            .into_iter()
            .map(|record| {
                BundleObject::from_tree(
                    record.path_id,
                    record.kind,
                    record.name,
                    record.container,
                    &record.fields,
                )
            })
            .collect();
        Ok(LoadedBundle::new(file_stem(path), objects))
    }
}

impl BundleLoader for JsonBundleLoader {
    fn load(&self, paths: &[PathBuf]) -> BundleResult<BundleSet> {
        if paths.is_empty() {
            return Err(BundleError::NoPaths);
        }
        let bundles = paths
            .iter()
            .map(|path| self.load_one(path))
            .collect::<BundleResult<Vec<_>>>()?;
        debug!(
            "loaded {} bundles ({} objects) for {}",
            bundles.len(),
            bundles.iter().map(|b| b.objects().len()).sum::<usize>(),
            bundles[0].name()
        );
        Ok(BundleSet::new(bundles))
    }
}

/// In-memory loader for tests and embedding.
///
/// Bundles are registered under a key matched against the file stem of each
/// requested path (the content hash, for store-cached bundles).
#[derive(Default)]
pub struct MemoryBundleLoader {
    bundles: RwLock<HashMap<String, LoadedBundle>>,
}

impl MemoryBundleLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the objects of the bundle keyed by `name`.
    pub fn insert(&self, name: impl Into<String>, objects: Vec<BundleObject>) {
        let name = name.into();
        self.bundles
            .write()
            .expect("lock poisoned")
            .insert(name.clone(), LoadedBundle::new(name, objects));
    }
}

impl BundleLoader for MemoryBundleLoader {
    fn load(&self, paths: &[PathBuf]) -> BundleResult<BundleSet> {
        if paths.is_empty() {
            return Err(BundleError::NoPaths);
        }
        let registry = self.bundles.read().expect("lock poisoned");
        let bundles = paths
            .iter()
            .map(|path| {
                registry
                    .get(&file_stem(path))
                    .cloned()
                    .ok_or_else(|| BundleError::UnknownBundle {
                        path: path.clone(),
                    })
            })
            .collect::<BundleResult<Vec<_>>>()?;
        Ok(BundleSet::new(bundles))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_loader_reads_object_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aa01");
        fs::write(
            &path,
            r#"[
                {"pathId": 1, "kind": "MonoBehaviour", "name": "master",
                 "container": "assets/master/data", "fields": {"m_Name": "master"}},
                {"pathId": 2, "kind": "AnimationClip", "name": "walk", "fields": {}}
            ]"#,
        )
        .unwrap();

        let set = JsonBundleLoader::new().load(&[path]).unwrap();
        assert_eq!(set.name(), "aa01");
        assert_eq!(set.object_count(), 2);
        let found = set.find_object(1, "fallback").unwrap();
        assert_eq!(found.container, "assets/master/data");
        assert_eq!(
            found.object.read_type_tree().unwrap(),
            json!({"m_Name": "master"})
        );
    }

    #[test]
    fn json_loader_rejects_malformed_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken");
        fs::write(&path, b"[{").unwrap();
        assert!(matches!(
            JsonBundleLoader::new().load(&[path]),
            Err(BundleError::Parse { .. })
        ));
    }

    #[test]
    fn memory_loader_resolves_by_stem() {
        let loader = MemoryBundleLoader::new();
        loader.insert(
            "aa01",
            vec![BundleObject::from_tree(
                1,
                ObjectKind::GameObject,
                "hero",
                Some("assets/hero".to_string()),
                &json!({}),
            )],
        );

        let set = loader
            .load(&[PathBuf::from("/cache/aa/aa01")])
            .unwrap();
        assert_eq!(set.bundle_count(), 1);
        assert!(set.find_object(1, "x").is_some());

        assert!(matches!(
            loader.load(&[PathBuf::from("/cache/ff/ff00")]),
            Err(BundleError::UnknownBundle { .. })
        ));
    }

    #[test]
    fn empty_path_list_is_rejected() {
        assert!(matches!(
            MemoryBundleLoader::new().load(&[]),
            Err(BundleError::NoPaths)
        ));
    }
}
