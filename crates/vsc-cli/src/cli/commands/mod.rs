//! CLI command handlers, one file per command.

mod check;
mod completions;
mod config;
mod keys;
mod step;

pub use check::run_check;
pub use completions::run_completions;
pub use config::{run_config_reset, run_config_set, run_config_show};
pub use keys::run_keys;
pub use step::run_step;

use anyhow::Result;
use std::path::Path;
use vsc_core::config::{self as core_config, Settings};

/// Settings as the content script would see them (invalid fields fall back to defaults).
fn effective_settings(path: &Path) -> Result<Settings> {
    let stored = core_config::load_or_init_at(path)?;
    Ok(Settings::from_stored_lossy(&stored))
}
