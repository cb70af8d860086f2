//! Manifest catalog rows.

use serde::{Deserialize, Serialize};

/// Identity shared by decoded and raw catalog rows: the change-detection
/// oracle only ever needs an entry's name and content hash.
pub trait CatalogEntry {
    /// Bundle name, unique within a locale and category.
    fn name(&self) -> &str;
    /// Content digest of the bundle.
    fn hash(&self) -> &str;
}

/// One bundle entry of the manifest.
///
/// Immutable once parsed; the `hash` in particular never changes within one
/// run and is the sole input to change detection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Bundle name, unique within a locale and category.
    pub name: String,
    /// Content digest of the bundle.
    pub hash: String,
    /// Names of manifest entries this bundle depends on, in declared order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Logical asset names contained in the bundle.
    #[serde(default)]
    pub assets: Vec<String>,
    /// Download group.
    pub group: i64,
    /// Bundle size in bytes.
    pub size: u64,
}

impl ManifestEntry {
    /// The content-addressed directory prefix: the first two characters of
    /// the hash.
    pub fn hash_dir(&self) -> &str {
        let end = self.hash.len().min(2);
        &self.hash[..end]
    }
}

impl CatalogEntry for ManifestEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

/// A raw (undecoded pass-through) entry of the manifest.
///
/// Shares identity fields with [`ManifestEntry`] but carries no dependency
/// or asset list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRawEntry {
    /// Bundle name.
    pub name: String,
    /// Content digest of the bundle.
    pub hash: String,
    /// Download group.
    pub group: i64,
    /// Bundle size in bytes.
    pub size: u64,
}

impl ManifestRawEntry {
    /// The content-addressed directory prefix: the first two characters of
    /// the hash.
    pub fn hash_dir(&self) -> &str {
        let end = self.hash.len().min(2);
        &self.hash[..end]
    }
}

impl CatalogEntry for ManifestRawEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

/// One named group of entries. Organizational only; matching and lookup
/// treat the categories of a locale as a single ordered sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestCategory {
    /// Category name.
    pub name: String,
    /// Entries in declared order.
    pub assets: Vec<ManifestEntry>,
}
