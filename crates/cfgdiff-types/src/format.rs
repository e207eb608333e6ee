use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of an input format.
///
/// The set is closed and its declaration order is the registration order
/// used everywhere formats are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatId {
    /// Classic INI sections with `key = value` entries.
    Ini,
    /// JSON documents.
    Json,
    /// YAML documents (safe data subset).
    Yaml,
    /// XML documents.
    Xml,
    /// Nested section key/value files with comments stripped.
    Conf,
    /// Application-specific grammars selected by a dialect name.
    Reconf,
    /// DNS zone files.
    Zone,
}

impl FormatId {
    /// Every format in registration order.
    pub const ALL: [FormatId; 7] = [
        FormatId::Ini,
        FormatId::Json,
        FormatId::Yaml,
        FormatId::Xml,
        FormatId::Conf,
        FormatId::Reconf,
        FormatId::Zone,
    ];

    /// The identifier as used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ini => "ini",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Conf => "conf",
            Self::Reconf => "reconf",
            Self::Zone => "zone",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| TypeError::UnknownFormat(s.to_string()))
    }
}

/// How structural elements are ordered before serialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingMode {
    /// Keys, sections and elements are reordered deterministically.
    #[default]
    Sorted,
    /// File appearance order is preserved.
    OriginalOrder,
}

impl OrderingMode {
    /// Map the `--ordered-input` flag to a mode.
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            Self::OriginalOrder
        } else {
            Self::Sorted
        }
    }

    /// Returns `true` for [`OrderingMode::Sorted`].
    pub fn is_sorted(&self) -> bool {
        matches!(self, Self::Sorted)
    }
}
