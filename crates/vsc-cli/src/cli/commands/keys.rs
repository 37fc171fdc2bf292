//! `vsc keys` – show the configured key bindings.

use anyhow::Result;
use std::path::Path;

use super::effective_settings;

pub fn run_keys(path: &Path) -> Result<()> {
    let settings = effective_settings(path)?;
    let (up, down) = settings.key_combo.bindings();
    println!("key combo: {}", settings.key_combo);
    println!("increase:  {:?} (+{})", up, settings.increment);
    println!("decrease:  {:?} (-{})", down, settings.increment);
    Ok(())
}
