//! Content-hash-addressed local bundle cache.
//!
//! Downloaded bundles live under `<root>/<hash[0..2]>/<hash>`; the hash comes
//! from the manifest, so a changed bundle lands in a new path and the old
//! one simply stops being referenced. The remote origin is reached through
//! the [`AssetFetcher`] seam; the store never talks to the network itself.
//!
//! # Key Types
//!
//! - [`AssetStore`] — The cache: `ensure_local` downloads on miss
//! - [`AssetFetcher`] — Transport seam
//! - [`MirrorFetcher`] — Reads a local mirror laid out like the CDN
//! - [`MemoryFetcher`] — In-memory fetcher for tests and embedding

pub mod error;
pub mod fetcher;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use fetcher::{AssetFetcher, MemoryFetcher, MirrorFetcher};
pub use store::AssetStore;
