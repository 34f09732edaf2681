//! Run configuration

use crate::{Error, Result};
use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file the binary looks for in the working directory
pub const CONFIG_FILE: &str = "asphyxia-kamai.toml";

/// Settings for one conversion run.
///
/// Every field is optional in the TOML file; missing ones fall back to
/// [`Config::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// NeDB file written by the Asphyxia SDVX plugin
    pub database_path: PathBuf,
    pub output_path: PathBuf,
    /// Asphyxia profile reference (`__refid`) whose plays are exported
    pub profile_id: String,
    /// Keep plays whose lamp is FAILED
    pub preserve_fails: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("sdvx@asphyxia.db"),
            output_path: PathBuf::from("output.json"),
            profile_id: "ACA11374C2D83E9A".to_string(),
            preserve_fails: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load(path)
    }
}
