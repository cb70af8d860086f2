//! Run configuration for the AXP pipeline.
//!
//! The configuration file is YAML. Deserialization is the schema check:
//! unknown export kinds, malformed regexes, and missing required fields all
//! fail the load with a position-carrying error.
//!
//! # Key Types
//!
//! - [`Config`] — The whole run configuration
//! - [`Paths`] — Data directories and per-locale export roots
//! - [`Concurrency`] — Worker and chunk-size knobs
//! - [`ExportTask`] / [`ExportSubTask`] — One configured export task
//! - [`RawTask`] — Raw pass-through task over undecoded bundles

pub mod error;
pub mod load;
pub mod model;
pub mod task;

pub use error::{ConfigError, ConfigResult};
pub use load::load_config;
pub use model::{Concurrency, Config, IndexOptions, Paths};
pub use task::{ExportSubTask, ExportTask, RawTask};
