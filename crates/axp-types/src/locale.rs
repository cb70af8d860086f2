//! Content locale enumeration.

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One regional content variant of the game's asset catalog.
///
/// The set is closed: the upstream build ships exactly these locales, and
/// `Jp` is the master locale used when a task does not request multi-locale
/// processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    /// Japanese, the master locale.
    #[serde(rename = "jp")]
    Jp,
    /// English.
    #[serde(rename = "en")]
    En,
    /// Traditional Chinese.
    #[serde(rename = "tw")]
    Cht,
    /// Simplified Chinese.
    #[serde(rename = "cn")]
    Chs,
}

impl Locale {
    /// All locales in catalog order. The master locale comes first.
    pub const ALL: [Locale; 4] = [Locale::Jp, Locale::En, Locale::Cht, Locale::Chs];

    /// Returns `true` for the master locale.
    pub fn is_master(self) -> bool {
        matches!(self, Locale::Jp)
    }

    /// The wire code used in manifest names, index file names, and export
    /// directory names.
    pub fn code(self) -> &'static str {
        match self {
            Locale::Jp => "jp",
            Locale::En => "en",
            Locale::Cht => "tw",
            Locale::Chs => "cn",
        }
    }

    /// Parse a wire code back into a locale.
    pub fn from_code(code: &str) -> Result<Self, TypeError> {
        match code {
            "jp" => Ok(Locale::Jp),
            "en" => Ok(Locale::En),
            "tw" => Ok(Locale::Cht),
            "cn" => Ok(Locale::Chs),
            other => Err(TypeError::UnknownLocale(other.to_string())),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
