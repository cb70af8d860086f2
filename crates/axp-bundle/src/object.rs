//! Typed objects and their resolved wrappers.

use std::sync::Arc;

use axp_types::ObjectKind;

use crate::error::{BundleError, BundleResult};

/// A fully materialized object field tree.
pub type FieldTree = serde_json::Value;

/// One typed object inside a loaded bundle.
///
/// The payload stays serialized until [`read_type_tree`](Self::read_type_tree)
/// is called; cloning shares the payload. Path ids are locally unique within
/// the set of bundles loaded for one export call and are how objects
/// reference each other.
#[derive(Clone)]
pub struct BundleObject {
    path_id: i64,
    kind: ObjectKind,
    name: String,
    container: Option<String>,
    payload: Arc<[u8]>,
}

impl BundleObject {
    /// Wrap a serialized object payload.
    pub fn new(
        path_id: i64,
        kind: ObjectKind,
        name: impl Into<String>,
        container: Option<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            path_id,
            kind,
            name: name.into(),
            container,
            payload: payload.into(),
        }
    }

    /// Build an object from an already materialized field tree.
    ///
    /// Used by loaders and tests; the tree is re-serialized so that
    /// `read_type_tree` keeps its lazy contract.
    pub fn from_tree(
        path_id: i64,
        kind: ObjectKind,
        name: impl Into<String>,
        container: Option<String>,
        tree: &FieldTree,
    ) -> Self {
        let payload = serde_json::to_vec(tree).expect("serializing a JSON value cannot fail");
        Self::new(path_id, kind, name, container, payload)
    }

    /// The object's path id.
    pub fn path_id(&self) -> i64 {
        self.path_id
    }

    /// The object's container type tag.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The object's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The container path recorded in the bundle, if any. Dependency
    /// bundles frequently omit this.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    /// Materialize the object's full field tree.
    ///
    /// This deserializes the whole payload on every call; cost grows with
    /// object size. Callers that re-read the same object should hold on to
    /// the result (the export working set caches resolved objects, not
    /// trees).
    pub fn read_type_tree(&self) -> BundleResult<FieldTree> {
        serde_json::from_slice(&self.payload).map_err(|source| BundleError::MalformedTypeTree {
            name: self.name.clone(),
            path_id: self.path_id,
            source,
        })
    }

    /// Whether two handles share the same underlying payload.
    pub fn same_object(&self, other: &BundleObject) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl std::fmt::Debug for BundleObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleObject")
            .field("path_id", &self.path_id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("container", &self.container)
            .finish()
    }
}

/// One object selected for an export call: the object handle, the container
/// path it resolved to, and whether it came from the task's main bundle
/// rather than a dependency bundle.
///
/// Owned by the export working set that created it for the duration of one
/// export call; never shared across calls.
#[derive(Clone, Debug)]
pub struct ObjectInfo {
    /// The object handle.
    pub object: BundleObject,
    /// Resolved container path. Falls back to the requesting object's
    /// container when the bundle records none.
    pub container: String,
    /// `true` when the object originated from the main bundle.
    pub from_main_bundle: bool,
}

impl ObjectInfo {
    /// The wrapped object's path id.
    pub fn path_id(&self) -> i64 {
        self.object.path_id()
    }
}
