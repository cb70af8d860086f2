//! Chunked worker-pool dispatch for the AXP pipeline.
//!
//! The engine splits a work list into fixed-size chunks and runs each chunk
//! on a freshly built worker pool that is torn down before the next chunk
//! starts (a pool only releases its memory when it is dropped), so long runs
//! stay bounded. Each work item's outcome is collected by key; a chunk that
//! produced any failure stops the run after that chunk, keeping the results
//! that already succeeded.
//!
//! Workers never share mutable state with the owner: contributions come back
//! exclusively as `(key, result)` values the owner drains after the chunk.
//!
//! # Key Types
//!
//! - [`ConcurrencyEngine`] — `run` (recoverable) and `run_or_exit` (fail-fast)
//! - [`PoolError`] — Pool construction failure or a failed chunk
//! - [`WorkerFailure`] — One work item's captured error or panic

pub mod engine;
pub mod error;

pub use engine::{ConcurrencyEngine, DEFAULT_CHUNK_SIZE};
pub use error::{PoolError, WorkerFailure};
