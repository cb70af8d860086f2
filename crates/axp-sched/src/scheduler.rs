//! The task scheduler.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use axp_bundle::BundleLoader;
use axp_config::{ExportSubTask, ExportTask, Paths, RawTask};
use axp_export::{export_bundles, ExportResult};
use axp_index::ContentIndex;
use axp_log::LogGroup;
use axp_manifest::{Manifest, ManifestEntry, ManifestRawEntry};
use axp_pool::ConcurrencyEngine;
use axp_store::AssetStore;
use axp_types::Locale;

use crate::error::{SchedResult, WorkError};

/// Key of one dispatched work unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct WorkKey {
    locale: Locale,
    index: usize,
    name: String,
}

impl std::fmt::Display for WorkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.locale)
    }
}

/// One stale dependency group scheduled for a sub-task.
struct WorkUnit<'m> {
    locale: Locale,
    /// The expanded group, main entry first.
    group: Vec<&'m ManifestEntry>,
    index: usize,
}

/// Drives configured tasks over the manifest.
///
/// The scheduler runs on the owning thread. Workers only ever receive
/// borrowed, immutable inputs and give results back as values through the
/// engine; all index mutation happens here, after collection.
pub struct Scheduler<'a> {
    manifest: &'a Manifest,
    store: &'a AssetStore,
    loader: &'a dyn BundleLoader,
    engine: ConcurrencyEngine,
    paths: &'a Paths,
}

impl<'a> Scheduler<'a> {
    /// Wire up a scheduler.
    pub fn new(
        manifest: &'a Manifest,
        store: &'a AssetStore,
        loader: &'a dyn BundleLoader,
        engine: ConcurrencyEngine,
        paths: &'a Paths,
    ) -> Self {
        Self {
            manifest,
            store,
            loader,
            engine,
            paths,
        }
    }

    /// Run one export task.
    ///
    /// For each sub-task, in declared order: match entries, expand their
    /// dependency groups, keep the groups with at least one updated entry,
    /// and dispatch them. Commits happen only after the last sub-task:
    /// committing earlier would let the index forget that an entry changed
    /// while a later sub-task of the same task still needs to see it as
    /// stale.
    pub fn run_task(&self, task: &ExportTask, index: &mut ContentIndex) -> SchedResult<()> {
        let mut processed: Vec<(Locale, Vec<&ManifestEntry>)> = Vec::new();

        for subtask in &task.subtasks {
            let _group = LogGroup::begin(format!("{} // {}", task.summary(), subtask.title));

            info!("Getting asset entries from the manifest...");
            let master_only = !subtask.multi_locale(task.is_multi_locale);
            let matched = self.manifest.entries_matching(&task.name_pattern, master_only);

            let mut groups = Vec::with_capacity(matched.len());
            for (locale, entry) in matched {
                groups.push((locale, self.manifest.expand_dependencies(locale, entry)?));
            }

            let work_units: Vec<WorkUnit<'_>> = groups
                .iter()
                .enumerate()
                .filter(|(_, (locale, group))| {
                    group.iter().any(|entry| index.is_updated(*locale, *entry))
                })
                .map(|(unit_index, (locale, group))| WorkUnit {
                    locale: *locale,
                    group: group.clone(),
                    index: unit_index,
                })
                .collect();

            info!(
                "{} assets matching the criteria. {} assets updated{}.",
                groups.len(),
                work_units.len(),
                if index.enabled() { "" } else { " (force update)" }
            );

            let results = self.engine.run_or_exit(
                &work_units,
                |unit| WorkKey {
                    locale: unit.locale,
                    index: unit.index,
                    name: unit.group[0].name.clone(),
                },
                |unit| self.export_group(unit, task, subtask),
            );

            // Owner-side accumulation of the audit trail, from returned
            // values only.
            for (key, result) in &results {
                index.record_outputs(
                    key.locale,
                    &task.title,
                    &subtask.title,
                    task.export_updated_file_index,
                    result.exported_paths.iter().cloned(),
                );
            }

            processed.extend(groups);
        }

        // Commit strictly after every sub-task of this task: sub-tasks are
        // performed on the same assets, and worker state never propagates
        // back except through the collected results above.
        for (locale, group) in processed {
            for entry in group {
                index.commit(locale, entry);
            }
        }
        Ok(())
    }

    fn export_group(
        &self,
        unit: &WorkUnit<'_>,
        task: &ExportTask,
        subtask: &ExportSubTask,
    ) -> Result<ExportResult, WorkError> {
        let paths = self.store.ensure_local_all(unit.group.iter().copied())?;
        let export_dir = self.paths.export_dir_of_locale(unit.locale);
        let result = export_bundles(
            self.loader,
            &paths,
            subtask.kind,
            &subtask.container_pattern,
            &export_dir,
            &task.suppress_warnings,
        )?;
        Ok(result)
    }

    /// Run one raw pass-through task: matched raw entries are copied to the
    /// export tree undecoded.
    pub fn run_raw_task(&self, task: &RawTask, index: &mut ContentIndex) -> SchedResult<()> {
        let _group = LogGroup::begin(task.summary());

        let matched = self
            .manifest
            .raw_entries_matching(&task.name_pattern, !task.is_multi_locale);
        let work_units: Vec<(Locale, &ManifestRawEntry, usize)> = matched
            .iter()
            .enumerate()
            .filter(|(_, (locale, entry))| index.is_updated(*locale, *entry))
            .map(|(unit_index, (locale, entry))| (*locale, *entry, unit_index))
            .collect();

        info!(
            "{} raw assets matching the criteria. {} updated.",
            matched.len(),
            work_units.len()
        );

        let results = self.engine.run_or_exit(
            &work_units,
            |(locale, entry, unit_index)| WorkKey {
                locale: *locale,
                index: *unit_index,
                name: entry.name.clone(),
            },
            |(locale, entry, _)| self.copy_raw(*locale, *entry),
        );

        for (key, result) in &results {
            index.record_outputs(
                key.locale,
                &task.title,
                &task.title,
                false,
                result.exported_paths.iter().cloned(),
            );
        }

        for (locale, entry) in matched {
            index.commit(locale, entry);
        }
        Ok(())
    }

    fn copy_raw(
        &self,
        locale: Locale,
        entry: &ManifestRawEntry,
    ) -> Result<ExportResult, WorkError> {
        let cached = self.store.ensure_local(entry)?;
        let target: PathBuf = self.paths.export_dir_of_locale(locale).join(&entry.name);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkError::RawCopy {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&cached, &target).map_err(|source| WorkError::RawCopy {
            path: target.clone(),
            source,
        })?;

        let mut result = ExportResult::default();
        result.push_path(&target);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;

    use regex::Regex;
    use serde_json::json;

    use axp_bundle::{BundleObject, MemoryBundleLoader};
    use axp_manifest::{ManifestCategory, ManifestLocale};
    use axp_store::MemoryFetcher;
    use axp_types::{ExportKind, ObjectKind};

    fn entry(name: &str, hash: &str, dependencies: &[&str]) -> ManifestEntry {
        ManifestEntry {
            name: name.to_string(),
            hash: hash.to_string(),
            dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
            assets: vec![],
            group: 0,
            size: 0,
        }
    }

    fn raw_entry(name: &str, hash: &str) -> ManifestRawEntry {
        ManifestRawEntry {
            name: name.to_string(),
            hash: hash.to_string(),
            group: 0,
            size: 0,
        }
    }

    fn manifest_of(locales: Vec<(Locale, Vec<ManifestEntry>, Vec<ManifestRawEntry>)>) -> Manifest {
        let mut map = BTreeMap::new();
        for (locale, entries, raw) in locales {
            map.insert(
                locale,
                ManifestLocale::new(
                    vec![ManifestCategory {
                        name: "main".to_string(),
                        assets: entries,
                    }],
                    raw,
                ),
            );
        }
        Manifest::new(map)
    }

    fn mono_object(path_id: i64, name: &str, container: &str) -> BundleObject {
        BundleObject::from_tree(
            path_id,
            ObjectKind::MonoBehaviour,
            name,
            Some(container.to_string()),
            &json!({"m_Name": name}),
        )
    }

    fn task(pattern: &str, subtasks: Vec<ExportSubTask>) -> ExportTask {
        ExportTask {
            title: "test task".to_string(),
            name_pattern: Regex::new(pattern).unwrap(),
            is_multi_locale: false,
            suppress_warnings: vec![],
            export_updated_file_index: false,
            subtasks,
        }
    }

    fn subtask(title: &str, container: &str) -> ExportSubTask {
        ExportSubTask {
            title: title.to_string(),
            container_pattern: Regex::new(container).unwrap(),
            kind: ExportKind::MonoBehaviour,
            is_multi_locale: None,
        }
    }

    struct Harness {
        _dirs: Vec<tempfile::TempDir>,
        fetcher: Arc<MemoryFetcher>,
        store: AssetStore,
        loader: MemoryBundleLoader,
        paths: Paths,
        index: ContentIndex,
    }

    impl Harness {
        fn new() -> Self {
            let store_root = tempfile::tempdir().unwrap();
            let export_root = tempfile::tempdir().unwrap();
            let index_dir = tempfile::tempdir().unwrap();
            let updated_dir = tempfile::tempdir().unwrap();
            let log_dir = tempfile::tempdir().unwrap();

            let fetcher = Arc::new(MemoryFetcher::new());
            let store = AssetStore::new(store_root.path(), fetcher.clone());
            let paths = Paths {
                downloaded: store_root.path().to_path_buf(),
                index: index_dir.path().to_path_buf(),
                export: export_root.path().to_path_buf(),
                log: log_dir.path().to_path_buf(),
                updated: updated_dir.path().to_path_buf(),
                mirror: None,
            };
            let index =
                ContentIndex::load(index_dir.path(), updated_dir.path(), "100", true, true);

            Self {
                _dirs: vec![store_root, export_root, index_dir, updated_dir, log_dir],
                fetcher,
                store,
                loader: MemoryBundleLoader::new(),
                paths,
                index,
            }
        }

        fn register_bundle(&self, hash: &str, objects: Vec<BundleObject>) {
            self.fetcher.insert(hash, b"bundle".to_vec());
            self.loader.insert(hash, objects);
        }

        fn run(&mut self, manifest: &Manifest, task: &ExportTask) {
            let engine = ConcurrencyEngine::new(Some(2), None);
            let scheduler =
                Scheduler::new(manifest, &self.store, &self.loader, engine, &self.paths);
            scheduler.run_task(task, &mut self.index).unwrap();
        }

        fn export_file(&self, relative: &str) -> PathBuf {
            self.paths.export.join(relative)
        }

        fn clear_exports(&self) {
            for dir_entry in fs::read_dir(&self.paths.export).unwrap() {
                let path = dir_entry.unwrap().path();
                if path.is_dir() {
                    fs::remove_dir_all(path).unwrap();
                } else {
                    fs::remove_file(path).unwrap();
                }
            }
        }
    }

    fn assert_exists(path: &Path, expected: bool) {
        assert_eq!(path.exists(), expected, "unexpected state for {path:?}");
    }

    #[test]
    fn unchanged_rerun_reprocesses_nothing() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        let manifest = manifest_of(vec![(
            Locale::Jp,
            vec![entry("ui/common", "aa01", &[])],
            vec![],
        )]);
        let task = task("ui/", vec![subtask("mono", "assets/ui")]);

        harness.run(&manifest, &task);
        let exported = harness.export_file("assets/ui/common/common.json");
        assert_exists(&exported, true);

        // Nothing changed: the rerun must dispatch no work at all.
        harness.clear_exports();
        harness.run(&manifest, &task);
        assert_exists(&exported, false);
    }

    #[test]
    fn changing_one_hash_marks_exactly_that_entry_stale() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        harness.register_bundle("bb01", vec![mono_object(2, "title", "assets/ui/title/data")]);
        let task = task("ui/", vec![subtask("mono", "assets/ui")]);

        let before = manifest_of(vec![(
            Locale::Jp,
            vec![entry("ui/common", "aa01", &[]), entry("ui/title", "bb01", &[])],
            vec![],
        )]);
        harness.run(&before, &task);
        harness.clear_exports();

        // Only ui/common's hash moves.
        harness.register_bundle(
            "aa02",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        let after = manifest_of(vec![(
            Locale::Jp,
            vec![entry("ui/common", "aa02", &[]), entry("ui/title", "bb01", &[])],
            vec![],
        )]);
        harness.run(&after, &task);

        assert_exists(&harness.export_file("assets/ui/common/common.json"), true);
        assert_exists(&harness.export_file("assets/ui/title/title.json"), false);

        // And after that run the entry reads as current again.
        harness.clear_exports();
        harness.run(&after, &task);
        assert_exists(&harness.export_file("assets/ui/common/common.json"), false);
    }

    #[test]
    fn changed_dependency_forces_whole_group() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        harness.register_bundle("dd01", vec![]);
        let task = task("ui/common", vec![subtask("mono", "assets/ui")]);

        let before = manifest_of(vec![(
            Locale::Jp,
            vec![
                entry("ui/common", "aa01", &["shared/base"]),
                entry("shared/base", "dd01", &[]),
            ],
            vec![],
        )]);
        harness.run(&before, &task);
        harness.clear_exports();

        // The main entry's hash is unchanged; only the dependency moved.
        harness.register_bundle("dd02", vec![]);
        let after = manifest_of(vec![(
            Locale::Jp,
            vec![
                entry("ui/common", "aa01", &["shared/base"]),
                entry("shared/base", "dd02", &[]),
            ],
            vec![],
        )]);
        harness.run(&after, &task);
        assert_exists(&harness.export_file("assets/ui/common/common.json"), true);
    }

    #[test]
    fn commits_happen_after_all_subtasks() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![
                mono_object(1, "first", "assets/ui/one/data"),
                mono_object(2, "second", "assets/ui/two/data"),
            ],
        );
        let manifest = manifest_of(vec![(
            Locale::Jp,
            vec![entry("ui/common", "aa01", &[])],
            vec![],
        )]);
        // Both sub-tasks match the same entry. If the first sub-task
        // committed it, the second would see it as current and skip.
        let task = task(
            "ui/common",
            vec![subtask("one", "assets/ui/one"), subtask("two", "assets/ui/two")],
        );

        harness.run(&manifest, &task);
        assert_exists(&harness.export_file("assets/ui/one/first.json"), true);
        assert_exists(&harness.export_file("assets/ui/two/second.json"), true);
    }

    #[test]
    fn master_only_scope_skips_regional_locales() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        let manifest = manifest_of(vec![
            (Locale::Jp, vec![entry("ui/common", "aa01", &[])], vec![]),
            (Locale::En, vec![entry("ui/common", "aa01", &[])], vec![]),
        ]);

        let master_task = task("ui/", vec![subtask("mono", "assets/ui")]);
        harness.run(&manifest, &master_task);
        assert_exists(&harness.export_file("assets/ui/common/common.json"), true);
        assert_exists(
            &harness.export_file("localized/en/assets/ui/common/common.json"),
            false,
        );

        let mut multi_task = task("ui/", vec![subtask("mono", "assets/ui")]);
        multi_task.is_multi_locale = true;
        harness.run(&manifest, &multi_task);
        assert_exists(
            &harness.export_file("localized/en/assets/ui/common/common.json"),
            true,
        );
    }

    #[test]
    fn raw_task_copies_bundle_bytes() {
        let mut harness = Harness::new();
        harness.fetcher.insert("cc01", b"movie bytes".to_vec());
        let manifest = manifest_of(vec![(
            Locale::Jp,
            vec![],
            vec![raw_entry("videos/intro.usm", "cc01")],
        )]);
        let raw_task = RawTask {
            title: "videos".to_string(),
            name_pattern: Regex::new("\\.usm$").unwrap(),
            is_multi_locale: false,
        };

        let engine = ConcurrencyEngine::new(Some(2), None);
        let scheduler =
            Scheduler::new(&manifest, &harness.store, &harness.loader, engine, &harness.paths);
        scheduler
            .run_raw_task(&raw_task, &mut harness.index)
            .unwrap();

        let exported = harness.export_file("videos/intro.usm");
        assert_eq!(fs::read(&exported).unwrap(), b"movie bytes");

        // Committed: a rerun copies nothing.
        fs::remove_file(&exported).unwrap();
        scheduler
            .run_raw_task(&raw_task, &mut harness.index)
            .unwrap();
        assert_exists(&exported, false);
    }

    #[test]
    fn audit_trail_records_exported_paths() {
        let mut harness = Harness::new();
        harness.register_bundle(
            "aa01",
            vec![mono_object(1, "common", "assets/ui/common/data")],
        );
        let manifest = manifest_of(vec![(
            Locale::Jp,
            vec![entry("ui/common", "aa01", &[])],
            vec![],
        )]);
        let task = task("ui/", vec![subtask("mono", "assets/ui")]);

        harness.run(&manifest, &task);
        harness.index.flush().unwrap();

        let catalog_path = harness.paths.updated.join("index.json");
        let catalog: Vec<axp_index::CatalogRecord> =
            serde_json::from_str(&fs::read_to_string(&catalog_path).unwrap()).unwrap();
        let snapshot = fs::read_to_string(
            harness
                .paths
                .updated
                .join(format!("{}.json", catalog[0].file_name)),
        )
        .unwrap();
        assert!(snapshot.contains("common.json"));
        assert!(snapshot.contains("test task"));
    }
}
