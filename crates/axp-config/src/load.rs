//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::error::ConfigResult;
use crate::model::Config;

/// Load and validate the run configuration from a YAML file.
///
/// Typed deserialization doubles as the schema check: unknown fields,
/// malformed patterns, and unknown export kinds are all load errors.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let text = fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&text)?;
    Ok(config)
}
