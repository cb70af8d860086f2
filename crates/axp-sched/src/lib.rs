//! Task scheduler for the AXP pipeline.
//!
//! The scheduler turns one configured export task into concrete
//! (locale, entry-group, sub-task) work items, drops the groups the content
//! index says are unchanged, dispatches the survivors through the worker
//! engine, and commits the processed entries back into the index on the
//! owning thread, strictly after every sub-task of the task has completed.
//!
//! # Key Types
//!
//! - [`Scheduler`] — Wires manifest, store, loader, engine, and paths
//! - [`SchedError`] — Owner-side scheduling failures
//! - [`WorkError`] — One worker's failure, surfaced through the engine

pub mod error;
pub mod scheduler;

pub use error::{SchedError, SchedResult, WorkError};
pub use scheduler::Scheduler;
