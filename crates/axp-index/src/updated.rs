//! Updated-output audit trail.
//!
//! When enabled, each run records which export paths every task and sub-task
//! touched, per locale, and writes the result as a timestamped snapshot next
//! to a rolling catalog of all snapshots.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use axp_types::Locale;

/// Paths touched this run: locale → task title → sub-task title → paths.
///
/// The inner sets keep the paths sorted and deduplicated; the same path can
/// legitimately arrive from several work items of one sub-task.
#[derive(Debug, Default)]
pub struct UpdatedOutputs {
    outputs: BTreeMap<Locale, BTreeMap<String, BTreeMap<String, BTreeSet<String>>>>,
}

impl UpdatedOutputs {
    /// Record `paths` under `locale` / `task` / `subtask`.
    pub fn record<I, S>(&mut self, locale: Locale, task: &str, subtask: &str, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs
            .entry(locale)
            .or_default()
            .entry(task.to_string())
            .or_default()
            .entry(subtask.to_string())
            .or_default()
            .extend(paths.into_iter().map(Into::into));
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Render the accumulated outputs into the snapshot document shape.
    pub fn to_snapshot(&self) -> BTreeMap<String, Vec<SnapshotTask>> {
        self.outputs
            .iter()
            .map(|(locale, tasks)| {
                let rendered = tasks
                    .iter()
                    .map(|(task, subtasks)| SnapshotTask {
                        name: task.clone(),
                        subtasks: subtasks
                            .iter()
                            .map(|(subtask, paths)| SnapshotSubTask {
                                name: subtask.clone(),
                                paths: paths.iter().cloned().collect(),
                            })
                            .collect(),
                    })
                    .collect();
                (locale.code().to_string(), rendered)
            })
            .collect()
    }
}

/// One task's record in a snapshot document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotTask {
    pub name: String,
    pub subtasks: Vec<SnapshotSubTask>,
}

/// One sub-task's record in a snapshot document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotSubTask {
    pub name: String,
    /// Sorted, deduplicated export paths.
    pub paths: Vec<String>,
}

/// One record of the rolling snapshot catalog.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// ISO-8601 UTC timestamp of the run.
    pub timestamp_iso: String,
    /// Snapshot file name, without extension.
    pub file_name: String,
    /// Manifest version code the run processed.
    pub version_code: String,
}
