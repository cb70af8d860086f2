//! The all-locale manifest.

use std::collections::BTreeMap;

use regex::Regex;

use axp_types::Locale;

use crate::entry::{ManifestEntry, ManifestRawEntry};
use crate::error::ManifestResult;
use crate::locale::ManifestLocale;

/// The manifest of every locale, built once per run and read-only afterward.
#[derive(Debug)]
pub struct Manifest {
    locales: BTreeMap<Locale, ManifestLocale>,
}

impl Manifest {
    /// Assemble a manifest from per-locale catalogs.
    pub fn new(locales: BTreeMap<Locale, ManifestLocale>) -> Self {
        Self { locales }
    }

    /// The catalog of one locale.
    pub fn locale(&self, locale: Locale) -> Option<&ManifestLocale> {
        self.locales.get(&locale)
    }

    /// Locales present in this manifest, master first.
    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.locales.keys().copied()
    }

    /// All `(locale, entry)` pairs whose entry name matches `pattern`.
    ///
    /// Matching is a substring search of the pattern against the entry name,
    /// evaluated per category in per-locale insertion order. With
    /// `master_only` the non-master locales are skipped entirely, not
    /// filtered afterward.
    pub fn entries_matching(
        &self,
        pattern: &Regex,
        master_only: bool,
    ) -> Vec<(Locale, &ManifestEntry)> {
        self.matching(pattern, master_only, |locale| {
            Box::new(locale.entries().map(|e| (e.name.as_str(), e)))
        })
    }

    /// All `(locale, raw entry)` pairs whose entry name matches `pattern`.
    pub fn raw_entries_matching(
        &self,
        pattern: &Regex,
        master_only: bool,
    ) -> Vec<(Locale, &ManifestRawEntry)> {
        self.matching(pattern, master_only, |locale| {
            Box::new(locale.raw_entries().iter().map(|e| (e.name.as_str(), e)))
        })
    }

    fn matching<'a, T: 'a>(
        &'a self,
        pattern: &Regex,
        master_only: bool,
        entries_of: impl Fn(&'a ManifestLocale) -> Box<dyn Iterator<Item = (&'a str, T)> + 'a>,
    ) -> Vec<(Locale, T)> {
        let mut matched = Vec::new();
        for (&locale, catalog) in &self.locales {
            if master_only && !locale.is_master() {
                continue;
            }
            for (name, entry) in entries_of(catalog) {
                if pattern.is_match(name) {
                    matched.push((locale, entry));
                }
            }
        }
        matched
    }

    /// Expand `entry` into its dependency group within `locale`.
    ///
    /// See [`ManifestLocale::expand_dependencies`].
    pub fn expand_dependencies<'a>(
        &'a self,
        locale: Locale,
        entry: &'a ManifestEntry,
    ) -> ManifestResult<Vec<&'a ManifestEntry>> {
        match self.locales.get(&locale) {
            Some(catalog) => catalog.expand_dependencies(entry),
            // An entry always originates from a loaded locale; a bare group
            // of one keeps the call total for callers that synthesize entries.
            None => Ok(vec![entry]),
        }
    }
}
