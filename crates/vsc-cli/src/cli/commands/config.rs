//! `vsc config show|set|reset` – the options page, on the command line.

use anyhow::{Context, Result};
use std::path::Path;
use vsc_core::config::{self, Settings, StoredSettings};

pub fn run_config_show(path: &Path) -> Result<()> {
    let stored = config::load_or_init_at(path)?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&stored)?);
    Ok(())
}

pub fn run_config_set(
    path: &Path,
    increment: Option<String>,
    key_combo: Option<String>,
    blocked_sites: Option<String>,
) -> Result<()> {
    let stored = config::load_or_init_at(path)?;
    let updated = apply_overrides(stored, increment, key_combo, blocked_sites);
    let settings = Settings::from_stored(&updated).context("settings not saved")?;
    config::save_at(path, &settings)?;
    println!("{}", settings.saved_status());
    Ok(())
}

pub fn run_config_reset(path: &Path) -> Result<()> {
    config::save_at(path, &Settings::default())?;
    println!("{}", config::SAVED_STATUS);
    Ok(())
}

fn apply_overrides(
    mut stored: StoredSettings,
    increment: Option<String>,
    key_combo: Option<String>,
    blocked_sites: Option<String>,
) -> StoredSettings {
    if let Some(increment) = increment {
        stored.increment = increment;
    }
    if let Some(key_combo) = key_combo {
        stored.key_combo = key_combo;
    }
    if let Some(blocked_sites) = blocked_sites {
        stored.blocked_sites = blocked_sites;
    }
    stored
}
