//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up scrapyard CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Values to persist; `None` leaves the current setting alone
#[derive(Debug, Default)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub image_url_prefix: Option<String>,
}

impl Settings {
    fn is_empty(&self) -> bool {
        self.data_dir.is_none() && self.public_dir.is_none() && self.image_url_prefix.is_none()
    }
}

/// Handle the configure command
pub fn handle(settings: Settings, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if settings.is_empty() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, settings);
    let path = config.save()?;

    show_config(&config);
    println!("Config saved to: {}", path.display());

    Ok(())
}

fn apply(config: &mut Config, settings: Settings) {
    if let Some(dir) = settings.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(dir) = settings.public_dir {
        config.public_dir = Some(dir);
    }
    if let Some(prefix) = settings.image_url_prefix {
        config.image_url_prefix = Some(prefix);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    let show_path = |label: &str, value: Option<&PathBuf>| match value {
        Some(p) => println!("{:<18} {}", label, p.display()),
        None => println!("{:<18} (default)", label),
    };

    show_path("Data directory:", config.data_dir.as_ref());
    show_path("Public directory:", config.public_dir.as_ref());
    println!(
        "{:<18} {}",
        "Image URL prefix:",
        config.image_url_prefix.as_deref().unwrap_or("(default)")
    );
    println!(
        "{:<18} {}",
        "Heuristics:",
        if config.heuristics.is_some() { "custom" } else { "(default)" }
    );

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: scrapyard configure --data-dir PATH [--public-dir PATH] [--image-url-prefix PREFIX]");
    println!("   or: scrapyard configure --show");
    println!();
    println!("Weapon/blueprint rules can be tuned in a [heuristics] table in the config file.");
}
