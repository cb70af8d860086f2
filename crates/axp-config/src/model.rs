//! Top-level configuration structures.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use axp_types::Locale;

use crate::task::{ExportTask, RawTask};

/// The whole run configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Data directories.
    pub paths: Paths,
    /// Concurrency knobs.
    #[serde(default)]
    pub concurrency: Concurrency,
    /// Content index behavior.
    #[serde(default)]
    pub index: IndexOptions,
    /// Export tasks, run in declared order.
    #[serde(rename = "assets", default)]
    pub tasks: Vec<ExportTask>,
    /// Raw pass-through tasks, run after the export tasks.
    #[serde(rename = "rawAssets", default)]
    pub raw_tasks: Vec<RawTask>,
}

/// Data directories used by a run.
///
/// Every path is taken as-is from the configuration; the environment
/// bootstrap creates the ones AXP owns.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Paths {
    /// Root for downloaded data (manifests and bundle cache).
    pub downloaded: PathBuf,
    /// Directory holding the per-locale content index files.
    pub index: PathBuf,
    /// Root of the export tree.
    pub export: PathBuf,
    /// Run log directory.
    pub log: PathBuf,
    /// Directory for updated-output audit snapshots.
    pub updated: PathBuf,
    /// Local bundle mirror consulted by the filesystem fetcher.
    #[serde(default)]
    pub mirror: Option<PathBuf>,
}

impl Paths {
    /// Directory of the cached downloaded bundles.
    pub fn assets_dir(&self) -> PathBuf {
        self.downloaded.join("assets")
    }

    /// Directory of the per-locale manifest documents for `version_code`.
    pub fn manifest_dir(&self, version_code: &str) -> PathBuf {
        self.downloaded.join("manifest").join(version_code)
    }

    /// Root directory for the exported assets of `locale`.
    ///
    /// The master locale exports to the export root; regional locales go
    /// under `localized/<code>`.
    pub fn export_dir_of_locale(&self, locale: Locale) -> PathBuf {
        if locale.is_master() {
            self.export.clone()
        } else {
            self.export.join("localized").join(locale.code())
        }
    }

    /// All directories AXP itself creates at startup.
    pub fn owned_dirs(&self) -> Vec<&Path> {
        vec![
            self.downloaded.as_path(),
            self.index.as_path(),
            self.export.as_path(),
            self.log.as_path(),
            self.updated.as_path(),
        ]
    }
}

/// Concurrency knobs.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Concurrency {
    /// Worker count per chunk pool. Defaults to the logical CPU count.
    #[serde(rename = "processes")]
    pub workers: Option<usize>,
    /// Work items per chunk. Defaults to the engine's built-in chunk size.
    pub batch_size: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

/// Content index behavior.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndexOptions {
    /// When `false`, every entry counts as updated and nothing is persisted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Write the updated-output audit trail for every task.
    #[serde(default)]
    pub export_updated: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            export_updated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> Config {
        serde_yaml::from_str(
            r#"
paths:
  downloaded: data/downloaded
  index: data/index
  export: data/export
  log: data/log
  updated: data/updated
"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_apply() {
        let config = minimal_config();
        assert!(config.index.enabled);
        assert!(!config.index.export_updated);
        assert!(config.concurrency.workers.is_none());
        assert!(config.tasks.is_empty());
        assert!(config.raw_tasks.is_empty());
        assert!(config.paths.mirror.is_none());
    }

    #[test]
    fn master_locale_exports_to_root() {
        let paths = minimal_config().paths;
        assert_eq!(paths.export_dir_of_locale(Locale::Jp), PathBuf::from("data/export"));
        assert_eq!(
            paths.export_dir_of_locale(Locale::En),
            PathBuf::from("data/export/localized/en")
        );
    }

    #[test]
    fn manifest_dir_is_versioned() {
        let paths = minimal_config().paths;
        assert_eq!(
            paths.manifest_dir("3090250"),
            PathBuf::from("data/downloaded/manifest/3090250")
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str(
            r#"
paths:
  downloaded: a
  index: b
  export: c
  log: d
  updated: e
typo: true
"#,
        );
        assert!(result.is_err());
    }
}
