//! Asset container contract for the AXP pipeline.
//!
//! The proprietary container format is parsed elsewhere; this crate defines
//! what the pipeline consumes: a [`BundleSet`] of typed objects addressable
//! by path id, loaded through the [`BundleLoader`] seam. Object payloads
//! stay serialized until [`BundleObject::read_type_tree`] is called: most
//! objects in dependency bundles are never referenced, and materializing a
//! type tree costs time proportional to its size.
//!
//! # Key Types
//!
//! - [`BundleObject`] — One typed object: path id, kind, lazily parsed fields
//! - [`ObjectInfo`] — An object plus its resolved container path and origin
//! - [`BundleSet`] — The main bundle and its dependency bundles, with lookup
//! - [`BundleLoader`] — Loader seam; [`MemoryBundleLoader`] and
//!   [`JsonBundleLoader`] are the shipped implementations

pub mod error;
pub mod loader;
pub mod object;
pub mod set;

pub use error::{BundleError, BundleResult};
pub use loader::{BundleLoader, JsonBundleLoader, MemoryBundleLoader};
pub use object::{BundleObject, FieldTree, ObjectInfo};
pub use set::{BundleSet, LoadedBundle};
