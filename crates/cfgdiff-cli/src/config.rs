use std::path::{Path, PathBuf};

use anyhow::Context;
use cfgdiff_diff::OutputMode;
use cfgdiff_normalize::FormatId;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when no config path is given.
pub const LOCAL_CONFIG: &str = ".cfgdiff.toml";

/// Contents of a cfgdiff configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CfgdiffConfig {
    pub defaults: Defaults,
}

/// Values used when the corresponding flag is not given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub input_format: Option<FormatId>,
    pub ordered: bool,
    pub lines: Option<usize>,
    pub reconf_class: Option<String>,
    pub new_file: bool,
    pub output: Option<OutputMode>,
}

impl CfgdiffConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `explicit` if given, else [`LOCAL_CONFIG`] if it exists, else
    /// the built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = PathBuf::from(LOCAL_CONFIG);
                if local.is_file() {
                    Self::load(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
