//! Foundation types for the AXP asset export pipeline.
//!
//! This crate provides the closed enumerations shared by every other AXP
//! crate: content locales, container object type tags, export task kinds,
//! and suppressible warning kinds.
//!
//! # Key Types
//!
//! - [`Locale`] — Closed set of content locales; exactly one master locale
//! - [`ObjectKind`] — Type tag of an object inside an asset container
//! - [`ExportKind`] — Export flavor a sub-task runs (maps to an export function)
//! - [`WarningKind`] — Warnings a task configuration may suppress

pub mod error;
pub mod kind;
pub mod locale;

pub use error::TypeError;
pub use kind::{ExportKind, ObjectKind, WarningKind};
pub use locale::Locale;
