//! The transport seam and its shipped implementations.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};

/// Fetches bundle bytes from the remote origin.
///
/// Implementations must be safe to call from worker threads. The store
/// addresses bundles purely by content hash; `name` is carried for
/// diagnostics only.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the raw bytes of the bundle with content digest `hash`.
    fn fetch(&self, name: &str, hash: &str) -> StoreResult<Vec<u8>>;
}

/// Fetcher backed by a local mirror directory laid out like the CDN:
/// `<mirror>/<hash[0..2]>/<hash>`.
///
/// This is the stand-in where an HTTP transport would otherwise plug in;
/// sync jobs that rsync the CDN locally use it directly.
pub struct MirrorFetcher {
    mirror_root: PathBuf,
}

impl MirrorFetcher {
    /// Create a fetcher over `mirror_root`.
    pub fn new(mirror_root: impl Into<PathBuf>) -> Self {
        Self {
            mirror_root: mirror_root.into(),
        }
    }
}

impl AssetFetcher for MirrorFetcher {
    fn fetch(&self, name: &str, hash: &str) -> StoreResult<Vec<u8>> {
        let end = hash.len().min(2);
        let path = self.mirror_root.join(&hash[..end]).join(hash);
        if !path.exists() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
                hash: hash.to_string(),
            });
        }
        fs::read(&path).map_err(|source| StoreError::Io { path, source })
    }
}

/// In-memory fetcher for tests and embedding.
///
/// Counts fetches so tests can assert the cache only downloads once.
#[derive(Default)]
pub struct MemoryFetcher {
    bundles: RwLock<HashMap<String, Vec<u8>>>,
    fetch_count: AtomicUsize,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bundle bytes under `hash`.
    pub fn insert(&self, hash: impl Into<String>, bytes: Vec<u8>) {
        self.bundles
            .write()
            .expect("lock poisoned")
            .insert(hash.into(), bytes);
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, name: &str, hash: &str) -> StoreResult<Vec<u8>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.bundles
            .read()
            .expect("lock poisoned")
            .get(hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
                hash: hash.to_string(),
            })
    }
}
