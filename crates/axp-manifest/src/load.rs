//! Manifest document loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use axp_types::Locale;

use crate::error::{ManifestError, ManifestResult};
use crate::locale::{LocaleDocument, ManifestLocale};
use crate::manifest::Manifest;

/// File name of one locale's manifest document.
pub fn manifest_file_name(locale: Locale) -> String {
    format!("manifest-{}.json", locale.code())
}

/// Load the manifest documents of every locale from `dir`.
///
/// Expects one `manifest-<code>.json` per locale, the exported JSON form of
/// the manifest bundle (downloading and decrypting that bundle is upstream
/// of this tool). Every locale must be present; a missing document is an
/// error, unlike a missing content index.
pub fn load_manifest(dir: &Path) -> ManifestResult<Manifest> {
    let mut locales = BTreeMap::new();
    for locale in Locale::ALL {
        let path = dir.join(manifest_file_name(locale));
        locales.insert(locale, load_locale(&path)?);
        debug!("loaded manifest document for {locale} from {}", path.display());
    }
    Ok(Manifest::new(locales))
}

fn load_locale(path: &Path) -> ManifestResult<ManifestLocale> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    let document: LocaleDocument =
        serde_json::from_str(&text).map_err(|source| ManifestError::Parse {
            path: PathBuf::from(path),
            source,
        })?;
    Ok(ManifestLocale::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"{
        "categories": [
            {
                "name": "Master",
                "assets": [
                    {"name": "master", "hash": "aa11", "dependencies": [], "assets": ["master.data"], "group": 1, "size": 10}
                ]
            }
        ],
        "rawAssets": [
            {"name": "intro.usm", "hash": "bb22", "group": 2, "size": 20}
        ]
    }"#;

    #[test]
    fn loads_every_locale() {
        let dir = tempfile::tempdir().unwrap();
        for locale in Locale::ALL {
            let mut file = fs::File::create(dir.path().join(manifest_file_name(locale))).unwrap();
            file.write_all(DOCUMENT.as_bytes()).unwrap();
        }

        let manifest = load_manifest(dir.path()).unwrap();
        assert_eq!(manifest.locales().count(), Locale::ALL.len());
        let jp = manifest.locale(Locale::Jp).unwrap();
        assert_eq!(jp.entry("master").unwrap().hash, "aa11");
        assert_eq!(jp.raw_entries()[0].name, "intro.usm");
    }

    #[test]
    fn missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_manifest(dir.path());
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        for locale in Locale::ALL {
            fs::write(dir.path().join(manifest_file_name(locale)), b"not json").unwrap();
        }
        let result = load_manifest(dir.path());
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }
}
