//! The persisted content-hash index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use axp_manifest::CatalogEntry;
use axp_types::Locale;

use crate::error::{IndexError, IndexResult};
use crate::updated::{CatalogRecord, UpdatedOutputs};

/// Per-locale map of asset name → last-committed content hash.
///
/// Loaded at startup from one file per locale; a missing or unreadable file
/// is an empty index, never an error. Committed entries are only written
/// back by [`ContentIndex::flush`], which the owner calls at checkpoints;
/// the index is never written concurrently.
///
/// When disabled, `is_updated` always answers `true` (forcing a full
/// reprocess) and `commit`/`flush` do nothing.
#[derive(Debug)]
pub struct ContentIndex {
    index_dir: PathBuf,
    updated_dir: PathBuf,
    version_code: String,
    enabled: bool,
    export_updated: bool,
    data: BTreeMap<Locale, BTreeMap<String, String>>,
    updated: UpdatedOutputs,
}

impl ContentIndex {
    /// Load the index from `index_dir`.
    ///
    /// `version_code` tags the catalog records of this run. `export_updated`
    /// turns the audit trail on for every task; individual tasks can also
    /// opt in through their configuration.
    pub fn load(
        index_dir: &Path,
        updated_dir: &Path,
        version_code: &str,
        enabled: bool,
        export_updated: bool,
    ) -> Self {
        let mut data = BTreeMap::new();
        if enabled {
            for locale in Locale::ALL {
                data.insert(locale, load_locale_map(&index_file_path(index_dir, locale)));
            }
        }
        Self {
            index_dir: index_dir.to_path_buf(),
            updated_dir: updated_dir.to_path_buf(),
            version_code: version_code.to_string(),
            enabled,
            export_updated,
            data,
            updated: UpdatedOutputs::default(),
        }
    }

    /// Whether the index participates in change detection at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if `entry` needs reprocessing.
    ///
    /// An entry is updated when its name is absent from the locale's map or
    /// its stored hash differs from the manifest's current hash. A disabled
    /// index reports everything as updated.
    pub fn is_updated(&self, locale: Locale, entry: &impl CatalogEntry) -> bool {
        if !self.enabled {
            return true;
        }
        match self.data.get(&locale).and_then(|map| map.get(entry.name())) {
            Some(stored) => stored != entry.hash(),
            None => true,
        }
    }

    /// Record `entry` as fully processed at its current hash.
    ///
    /// Unconditionally overwrites any stored hash. No-op when disabled.
    /// The caller must only commit after every sub-task of the owning task
    /// has completed for the entry's group.
    pub fn commit(&mut self, locale: Locale, entry: &impl CatalogEntry) {
        if !self.enabled {
            return;
        }
        self.data
            .entry(locale)
            .or_default()
            .insert(entry.name().to_string(), entry.hash().to_string());
    }

    /// Record export `paths` for the audit trail.
    ///
    /// Accumulates only when auditing is on for the run or the task opted in
    /// via `task_opted_in`; a disabled index records nothing.
    pub fn record_outputs<I, S>(
        &mut self,
        locale: Locale,
        task: &str,
        subtask: &str,
        task_opted_in: bool,
        paths: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.enabled || !(self.export_updated || task_opted_in) {
            return;
        }
        self.updated.record(locale, task, subtask, paths);
    }

    /// Write the index back to disk, plus the audit snapshot when one was
    /// accumulated.
    ///
    /// A write failure is fatal and propagates: the caller must see the
    /// data-loss risk. No-op when disabled.
    pub fn flush(&self) -> IndexResult<()> {
        if !self.enabled {
            return Ok(());
        }

        for (locale, map) in &self.data {
            let path = index_file_path(&self.index_dir, *locale);
            write_json(&path, map)?;
            debug!("wrote index of {locale} ({} entries)", map.len());
        }

        if !self.updated.is_empty() {
            self.flush_updated()?;
        }
        Ok(())
    }

    fn flush_updated(&self) -> IndexResult<()> {
        let now = Utc::now();
        let file_name = now.format("%Y%m%d-%H%M%S").to_string();

        let snapshot_path = self.updated_dir.join(format!("{file_name}.json"));
        write_json(&snapshot_path, &self.updated.to_snapshot())?;

        let catalog_path = self.updated_dir.join("index.json");
        let mut catalog: Vec<CatalogRecord> = match fs::read_to_string(&catalog_path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!("snapshot catalog unreadable, starting fresh: {err}");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };
        catalog.push(CatalogRecord {
            timestamp_iso: now.to_rfc3339_opts(SecondsFormat::Micros, true),
            file_name,
            version_code: self.version_code.clone(),
        });
        write_json(&catalog_path, &catalog)
    }
}

fn index_file_path(index_dir: &Path, locale: Locale) -> PathBuf {
    index_dir.join(format!("index-{}.json", locale.code()))
}

fn load_locale_map(path: &Path) -> BTreeMap<String, String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        // Absent file: first run for this locale, empty index.
        Err(_) => return BTreeMap::new(),
    };
    match serde_json::from_str(&text) {
        Ok(map) => map,
        Err(err) => {
            warn!(
                "index file {} unreadable, treating as empty: {err}",
                path.display()
            );
            BTreeMap::new()
        }
    }
}

/// Serialize `value` as minified JSON to `path`.
fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> IndexResult<()> {
    let data = serde_json::to_string(value)?;
    fs::write(path, data).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}
