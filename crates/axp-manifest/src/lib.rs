//! Manifest catalog for the AXP pipeline.
//!
//! The manifest is the upstream build's catalog of every bundle: name,
//! content hash, size, group, and dependency names, partitioned by locale.
//! It is built once per run from the exported manifest documents and is
//! read-only afterward.
//!
//! # Key Types
//!
//! - [`Manifest`] — All locales; regex entry lookup
//! - [`ManifestLocale`] — One locale: categories, raw entries, name index
//! - [`ManifestEntry`] / [`ManifestRawEntry`] — Catalog rows
//! - [`load_manifest`] — Read per-locale manifest documents from disk

pub mod entry;
pub mod error;
pub mod load;
pub mod locale;
pub mod manifest;

pub use entry::{CatalogEntry, ManifestCategory, ManifestEntry, ManifestRawEntry};
pub use error::{ManifestError, ManifestResult};
pub use load::load_manifest;
pub use locale::ManifestLocale;
pub use manifest::Manifest;
