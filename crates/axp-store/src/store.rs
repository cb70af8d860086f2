//! The local bundle cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use axp_manifest::CatalogEntry;

use crate::error::{StoreError, StoreResult};
use crate::fetcher::AssetFetcher;

/// Content-hash-addressed cache of downloaded bundles.
///
/// Safe to share across worker threads: the cache is write-once per path
/// (content addressing), so concurrent `ensure_local` calls for the same
/// entry at worst fetch twice and write identical bytes.
pub struct AssetStore {
    root: PathBuf,
    fetcher: Arc<dyn AssetFetcher>,
}

impl AssetStore {
    /// Create a store rooted at `root`, downloading through `fetcher`.
    pub fn new(root: impl Into<PathBuf>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            root: root.into(),
            fetcher,
        }
    }

    /// The cache path for a content hash: `<root>/<hash[0..2]>/<hash>`.
    pub fn local_path(&self, entry: &impl CatalogEntry) -> PathBuf {
        let hash = entry.hash();
        let end = hash.len().min(2);
        self.root.join(&hash[..end]).join(hash)
    }

    /// Return the local path of `entry`'s bundle, downloading it first if
    /// it is not cached yet.
    pub fn ensure_local(&self, entry: &impl CatalogEntry) -> StoreResult<PathBuf> {
        let path = self.local_path(entry);
        if path.exists() {
            return Ok(path);
        }

        debug!("fetching bundle {} ({})", entry.name(), entry.hash());
        let bytes = self.fetcher.fetch(entry.name(), entry.hash())?;
        let hash = entry.hash();
        let dir = self.root.join(&hash[..hash.len().min(2)]);
        write_bundle(&dir, &path, &bytes)?;
        Ok(path)
    }

    /// Materialize every entry of a dependency group, main bundle first.
    pub fn ensure_local_all<'a, E: CatalogEntry + 'a>(
        &self,
        entries: impl IntoIterator<Item = &'a E>,
    ) -> StoreResult<Vec<PathBuf>> {
        entries
            .into_iter()
            .map(|entry| self.ensure_local(entry))
            .collect()
    }
}

fn write_bundle(dir: &Path, path: &Path, bytes: &[u8]) -> StoreResult<()> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore").field("root", &self.root).finish()
    }
}
