use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use axp_config::Config;
use axp_log::LogGroup;

use crate::cli::Cli;

/// The run environment: parsed arguments plus loaded configuration.
pub struct Environment {
    pub args: Cli,
    pub config: Config,
}

impl Environment {
    pub fn new(args: Cli, config: Config) -> Self {
        Self { args, config }
    }

    /// Directory of the per-locale manifest documents for this run.
    pub fn manifest_dir(&self) -> PathBuf {
        self.config.paths.manifest_dir(&self.args.version_code)
    }

    /// Whether the content index participates in this run.
    pub fn index_enabled(&self) -> bool {
        self.config.index.enabled && !self.args.no_index
    }

    /// Create every directory the run owns.
    pub fn init_dirs(&self) -> anyhow::Result<()> {
        for dir in self.config.paths.owned_dirs() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        fs::create_dir_all(self.config.paths.assets_dir()).context("creating asset cache dir")?;
        Ok(())
    }

    /// Log the environment banner.
    pub fn print_info(&self) {
        let _group = LogGroup::begin("Environment info");
        info!("Manifest version code: {}", self.args.version_code);
        info!("Manifest document directory: {}", self.manifest_dir().display());
        info!(
            "Downloaded assets directory: {}",
            self.config.paths.assets_dir().display()
        );
        info!(
            "Exported files directory: {}",
            self.config.paths.export.display()
        );
        info!(
            "File index directory: {}",
            self.config.paths.index.display()
        );
        if !self.index_enabled() {
            info!("Content index disabled: every asset will be reprocessed");
        }
    }
}
