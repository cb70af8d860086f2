//! Persisted content-hash index for the AXP pipeline.
//!
//! The index remembers, per locale, the content hash last committed for each
//! asset name. It is the change-detection oracle: an entry whose stored hash
//! matches the manifest's current hash needs no reprocessing. The index is
//! mutated only by the scheduler on the owning thread, after a task fully
//! completes, and written back at controlled checkpoints.
//!
//! # Key Types
//!
//! - [`ContentIndex`] — Per-locale name → hash maps with persistence
//! - [`UpdatedOutputs`] — Accumulated audit trail of paths touched this run

pub mod error;
pub mod index;
pub mod updated;

pub use error::{IndexError, IndexResult};
pub use index::ContentIndex;
pub use updated::{CatalogRecord, SnapshotSubTask, SnapshotTask, UpdatedOutputs};
