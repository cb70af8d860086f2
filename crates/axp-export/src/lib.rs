//! Export working set and export functions for the AXP pipeline.
//!
//! One export call gets an [`ExportInfo`]: the export directory, the objects
//! selected by the sub-task's filter, and the loaded bundle set. Cross
//! references between objects resolve through
//! [`ExportInfo::object_at`], the per-call resolver that caches every
//! resolved object for the life of the call.
//!
//! # Key Types
//!
//! - [`ExportInfo`] — Working set + cross-reference resolver
//! - [`ExportResult`] — Produced file paths and structured payloads
//! - [`export_bundles`] — Load, filter, and run one export call
//! - [`export_function`] — The static `ExportKind → fn` table

pub mod error;
pub mod functions;
pub mod info;
pub mod json;
pub mod result;
pub mod run;

pub use error::ExportError;
pub use functions::{export_function, ExportFn};
pub use info::ExportInfo;
pub use result::ExportResult;
pub use run::export_bundles;
