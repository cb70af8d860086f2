//! Error types for configuration loading.

/// Errors that can occur while loading the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file did not deserialize. Regex and export-kind
    /// problems surface here too, attached to their document position.
    #[error("config did not validate: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
