//! Configuration management for scrapyard CLI

use anyhow::{Context, Result};
use scrapyard::{DataLayout, Heuristics};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::DataArgs;

const DEFAULT_DATA_DIR: &str = "arcraiders-data";
const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url_prefix: Option<String>,
    /// Overrides for the weapon/blueprint/tag rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristics: Option<Heuristics>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("scrapyard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Data layout for a run: command-line values win over configured ones
    pub fn layout(&self, args: &DataArgs) -> DataLayout {
        let data_dir = args
            .data_dir
            .as_deref()
            .or(self.data_dir.as_deref())
            .unwrap_or(Path::new(DEFAULT_DATA_DIR));
        let layout = DataLayout::new(data_dir, self.public_dir(args));
        match args.image_url_prefix.as_ref().or(self.image_url_prefix.as_ref()) {
            Some(prefix) => layout.with_image_url_prefix(prefix.as_str()),
            None => layout,
        }
    }

    /// Servable root: command-line value, configured value, then `public`
    pub fn public_dir(&self, args: &DataArgs) -> PathBuf {
        args.public_dir
            .clone()
            .or_else(|| self.public_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR))
    }

    pub fn heuristics(&self) -> Heuristics {
        self.heuristics.clone().unwrap_or_default()
    }
}
