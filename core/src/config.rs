//! Configuration loaded from a TOML file.
//!
//! The file is picked from, in order:
//! 1. an explicit path (the `--config` flag)
//! 2. the `PARKLOG_CONFIG` environment variable
//! 3. `config.toml` inside the default data directory, if it exists
//!
//! Without any of these the built-in defaults apply.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::repository::FileRecordStore;
use crate::service::recorder::DEFAULT_SLOT_MINUTES;

pub const CONFIG_ENV: &str = "PARKLOG_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_ATTRACTIONS: [&str; 10] = [
    "Montaña Rusa",
    "Carrusel",
    "Torre de Caída",
    "Rueda de Chicago",
    "Teleférico",
    "Barco Vikingo",
    "Rapids",
    "Karts",
    "Krater",
    "Yippe",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_attractions")]
    pub attractions: Vec<String>,
}

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

fn default_attractions() -> Vec<String> {
    DEFAULT_ATTRACTIONS.iter().map(|a| a.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot_minutes: default_slot_minutes(),
            attractions: default_attractions(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Resolves the config file as described in the module docs.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let fallback = FileRecordStore::default_dir()?.join(CONFIG_FILE_NAME);
        if fallback.exists() {
            return Self::from_file(&fallback);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if !(1..=240).contains(&self.slot_minutes) {
            return Err(Error::Config(format!(
                "slot_minutes must be between 1 and 240, got {}",
                self.slot_minutes
            )));
        }
        if self.attractions.iter().any(|a| a.trim().is_empty()) {
            return Err(Error::Config("attraction names must not be empty".to_string()));
        }
        Ok(())
    }

    /// Case-insensitive lookup; returns the configured spelling.
    pub fn find_attraction(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        self.attractions
            .iter()
            .find(|a| a.to_lowercase() == name)
            .map(|a| a.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.attractions.len(), 10);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
data_dir = "/tmp/park"
slot_minutes = 30
attractions = ["Karts", "Rapids"]
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/park")));
        assert_eq!(config.slot_minutes, 30);
        assert_eq!(config.find_attraction("karts"), Some("Karts"));
        assert_eq!(config.find_attraction("Carrusel"), None);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(Config::from_toml("slot_minutes = 0"), Err(Error::Config(_))));
        assert!(matches!(Config::from_toml("attractions = [\" \"]"), Err(Error::Config(_))));
        assert!(matches!(Config::from_toml("colour = \"red\""), Err(Error::Config(_))));
    }
}
