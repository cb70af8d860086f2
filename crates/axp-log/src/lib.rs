//! Logging bootstrap and scoped log groups for the AXP pipeline.
//!
//! # Key Types
//!
//! - [`init`] — Install the tracing subscriber (console + optional run log file)
//! - [`LogGroup`] — RAII guard printing group start/end markers with elapsed time

pub mod group;
pub mod init;

pub use group::LogGroup;
pub use init::init;
