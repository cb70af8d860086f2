//! Export task definitions.

use regex::Regex;
use serde::{Deserialize, Deserializer};

use axp_types::{ExportKind, WarningKind};

fn de_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;
    Regex::new(&pattern).map_err(serde::de::Error::custom)
}

/// One configured export task.
///
/// A task selects manifest entries by name pattern and runs its sub-tasks
/// over every selected entry group, in declared order. All fields are
/// immutable for the run.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportTask {
    /// Human-readable task title, used in logs and the audit trail.
    #[serde(rename = "task")]
    pub title: String,
    /// Pattern matched (substring search) against manifest entry names.
    #[serde(rename = "name", deserialize_with = "de_regex")]
    pub name_pattern: Regex,
    /// Default locale scope for sub-tasks that do not override it.
    #[serde(default)]
    pub is_multi_locale: bool,
    /// Warnings this task silences.
    #[serde(default)]
    pub suppress_warnings: Vec<WarningKind>,
    /// Opt this task into the updated-output audit trail even when the run
    /// as a whole has it off.
    #[serde(default)]
    pub export_updated_file_index: bool,
    /// Sub-tasks, run in declared order.
    #[serde(rename = "tasks")]
    pub subtasks: Vec<ExportSubTask>,
}

impl ExportTask {
    /// One-line task summary for log group titles.
    pub fn summary(&self) -> String {
        format!(
            "{} (Regex: {} - {})",
            self.title,
            self.name_pattern.as_str(),
            if self.is_multi_locale {
                "all locale"
            } else {
                "master only"
            }
        )
    }

    /// Whether `warning` is suppressed by this task's configuration.
    pub fn suppresses(&self, warning: WarningKind) -> bool {
        self.suppress_warnings.contains(&warning)
    }
}

/// One sub-task of an [`ExportTask`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportSubTask {
    /// Human-readable sub-task title.
    pub title: String,
    /// Pattern matched (substring search) against object container paths.
    #[serde(rename = "container", deserialize_with = "de_regex")]
    pub container_pattern: Regex,
    /// Export flavor to run.
    #[serde(rename = "type")]
    pub kind: ExportKind,
    /// Per-sub-task locale scope override.
    #[serde(default)]
    pub is_multi_locale: Option<bool>,
}

impl ExportSubTask {
    /// Effective locale scope, falling back to the task default.
    pub fn multi_locale(&self, task_default: bool) -> bool {
        self.is_multi_locale.unwrap_or(task_default)
    }
}

/// A raw pass-through task: matched bundles are copied to the export tree
/// undecoded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawTask {
    /// Human-readable task title.
    #[serde(rename = "task")]
    pub title: String,
    /// Pattern matched (substring search) against raw entry names.
    #[serde(rename = "name", deserialize_with = "de_regex")]
    pub name_pattern: Regex,
    /// Locale scope.
    #[serde(default)]
    pub is_multi_locale: bool,
}

impl RawTask {
    /// One-line task summary for log group titles.
    pub fn summary(&self) -> String {
        format!("{} (Regex: {})", self.title, self.name_pattern.as_str())
    }
}
