//! Per-locale manifest catalog.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::entry::{ManifestCategory, ManifestEntry, ManifestRawEntry};
use crate::error::{ManifestError, ManifestResult};

/// The raw document shape of one locale's manifest.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocaleDocument {
    pub categories: Vec<ManifestCategory>,
    #[serde(default)]
    pub raw_assets: Vec<ManifestRawEntry>,
}

/// The manifest catalog of one locale.
///
/// Holds the ordered categories plus the flat raw-entry list, and derives a
/// `name → entry` index for O(1) dependency lookup.
#[derive(Debug)]
pub struct ManifestLocale {
    categories: Vec<ManifestCategory>,
    raw_entries: Vec<ManifestRawEntry>,
    /// name → (category index, entry index)
    entry_index: HashMap<String, (usize, usize)>,
}

impl ManifestLocale {
    pub(crate) fn from_document(document: LocaleDocument) -> Self {
        let mut entry_index = HashMap::new();
        for (category_idx, category) in document.categories.iter().enumerate() {
            for (asset_idx, entry) in category.assets.iter().enumerate() {
                entry_index
                    .entry(entry.name.clone())
                    .or_insert((category_idx, asset_idx));
            }
        }
        Self {
            categories: document.categories,
            raw_entries: document.raw_assets,
            entry_index,
        }
    }

    /// Build a locale catalog directly from categories and raw entries.
    pub fn new(categories: Vec<ManifestCategory>, raw_entries: Vec<ManifestRawEntry>) -> Self {
        Self::from_document(LocaleDocument {
            categories,
            raw_assets: raw_entries,
        })
    }

    /// The ordered categories.
    pub fn categories(&self) -> &[ManifestCategory] {
        &self.categories
    }

    /// The flat raw-entry list.
    pub fn raw_entries(&self) -> &[ManifestRawEntry] {
        &self.raw_entries
    }

    /// All entries across categories, in per-category insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.categories
            .iter()
            .flat_map(|category| category.assets.iter())
    }

    /// Look up an entry by name.
    pub fn entry(&self, name: &str) -> Option<&ManifestEntry> {
        let (category_idx, asset_idx) = *self.entry_index.get(name)?;
        Some(&self.categories[category_idx].assets[asset_idx])
    }

    /// Expand `entry` into its transitive dependency group.
    ///
    /// The walk is depth-first: the result starts with `entry` itself, then
    /// each dependency's own expansion in declared order. An entry reached
    /// through two paths appears once (first visit wins); an entry that
    /// reaches itself is a [`ManifestError::DependencyCycle`].
    ///
    /// Position 0 is the main bundle; workers treat the rest as read-only
    /// dependency context.
    pub fn expand_dependencies<'a>(
        &'a self,
        entry: &'a ManifestEntry,
    ) -> ManifestResult<Vec<&'a ManifestEntry>> {
        let mut expanded = Vec::new();
        let mut visited = HashSet::new();
        let mut walk_stack = HashSet::new();
        self.expand_into(entry, &mut expanded, &mut visited, &mut walk_stack)?;
        Ok(expanded)
    }

    fn expand_into<'a>(
        &'a self,
        entry: &'a ManifestEntry,
        expanded: &mut Vec<&'a ManifestEntry>,
        visited: &mut HashSet<&'a str>,
        walk_stack: &mut HashSet<&'a str>,
    ) -> ManifestResult<()> {
        if walk_stack.contains(entry.name.as_str()) {
            return Err(ManifestError::DependencyCycle {
                name: entry.name.clone(),
            });
        }
        if !visited.insert(entry.name.as_str()) {
            return Ok(());
        }

        walk_stack.insert(entry.name.as_str());
        expanded.push(entry);
        for dependency in &entry.dependencies {
            let dependency_entry =
                self.entry(dependency)
                    .ok_or_else(|| ManifestError::UnknownDependency {
                        dependent: entry.name.clone(),
                        name: dependency.clone(),
                    })?;
            self.expand_into(dependency_entry, expanded, visited, walk_stack)?;
        }
        walk_stack.remove(entry.name.as_str());
        Ok(())
    }
}
