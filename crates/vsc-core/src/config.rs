use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blacklist::Blacklist;
use crate::keys::KeyCombo;
use crate::speed::MAX_RATE;

pub const DEFAULT_INCREMENT: f64 = 0.1;
/// Smallest increment that still moves a rate rounded to two decimals.
pub const MIN_INCREMENT: f64 = 0.01;
pub const DEFAULT_BLOCKED_SITES: &str = "vine.com";

/// Store keys, shared by `chrome.storage.sync` and the native TOML file.
pub const INCREMENT_KEY: &str = "increment";
pub const KEY_COMBO_KEY: &str = "keyCombo";
pub const BLOCKED_SITES_KEY: &str = "blockedSites";

/// Status line shown after a successful save.
pub const SAVED_STATUS: &str = "Options saved.";

/// Rejected settings values (strict parsing only).
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid increment {0:?}: expected a number from 0.01 to 16")]
    InvalidIncrement(String),
    #[error("unknown key combo {0:?}: expected one of udar, lrar, pgud")]
    UnknownKeyCombo(String),
}

/// Settings as kept in the host key-value store: three strings.
///
/// The key names (`increment`, `keyCombo`, `blockedSites`) are shared by
/// `chrome.storage.sync` and the native TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSettings {
    pub increment: String,
    pub key_combo: String,
    pub blocked_sites: String,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT.to_string(),
            key_combo: KeyCombo::default().as_str().to_string(),
            blocked_sites: DEFAULT_BLOCKED_SITES.to_string(),
        }
    }
}

/// One value as read back from a key-value store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    /// Older versions wrote the increment as a number.
    Number(f64),
    /// Unset, or of a type the store should not hold.
    Missing,
}

impl StoredValue {
    fn into_string(self, default: &str) -> String {
        match self {
            StoredValue::Text(s) => s,
            StoredValue::Number(n) => n.to_string(),
            StoredValue::Missing => default.to_string(),
        }
    }
}

impl StoredSettings {
    /// Assemble stored settings from a store lookup; missing keys take defaults.
    pub fn from_values(mut read: impl FnMut(&str) -> StoredValue) -> Self {
        let defaults = Self::default();
        Self {
            increment: read(INCREMENT_KEY).into_string(&defaults.increment),
            key_combo: read(KEY_COMBO_KEY).into_string(&defaults.key_combo),
            blocked_sites: read(BLOCKED_SITES_KEY).into_string(&defaults.blocked_sites),
        }
    }

    /// `(key, value)` pairs in store order.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (INCREMENT_KEY, self.increment.as_str()),
            (KEY_COMBO_KEY, self.key_combo.as_str()),
            (BLOCKED_SITES_KEY, self.blocked_sites.as_str()),
        ]
    }
}

/// Configuration handed to the blacklist gate and every video control.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Playback-rate step per button press or key press.
    pub increment: f64,
    pub key_combo: KeyCombo,
    pub blocked_sites: Blacklist,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            key_combo: KeyCombo::default(),
            blocked_sites: Blacklist::parse(DEFAULT_BLOCKED_SITES),
        }
    }
}

impl Settings {
    /// Parse stored settings, rejecting any invalid field.
    pub fn from_stored(stored: &StoredSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            increment: parse_increment(&stored.increment)?,
            key_combo: stored.key_combo.parse()?,
            blocked_sites: Blacklist::parse(&stored.blocked_sites),
        })
    }

    /// Parse stored settings, replacing each invalid field with its default.
    pub fn from_stored_lossy(stored: &StoredSettings) -> Self {
        let increment = parse_increment(&stored.increment).unwrap_or_else(|e| {
            tracing::warn!("{}; using {}", e, DEFAULT_INCREMENT);
            DEFAULT_INCREMENT
        });
        let key_combo = stored.key_combo.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using {}", e, KeyCombo::default());
            KeyCombo::default()
        });
        Self {
            increment,
            key_combo,
            blocked_sites: Blacklist::parse(&stored.blocked_sites),
        }
    }

    /// Status line after saving: names any blacklist patterns left out.
    pub fn saved_status(&self) -> String {
        let rejected = self.blocked_sites.rejected();
        if rejected.is_empty() {
            return SAVED_STATUS.to_string();
        }
        format!(
            "{} Ignored invalid blacklist patterns: {}",
            SAVED_STATUS,
            rejected.join(", ")
        )
    }

    pub fn to_stored(&self) -> StoredSettings {
        StoredSettings {
            increment: self.increment.to_string(),
            key_combo: self.key_combo.as_str().to_string(),
            blocked_sites: self.blocked_sites.to_raw(),
        }
    }
}

fn parse_increment(raw: &str) -> Result<f64, SettingsError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidIncrement(raw.to_string()))?;
    if !value.is_finite() || value < MIN_INCREMENT || value > MAX_RATE {
        return Err(SettingsError::InvalidIncrement(raw.to_string()));
    }
    Ok(value)
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::{config_path, load_or_init, load_or_init_at, save, save_at};

/// Native settings file at `~/.config/vsc/settings.toml`.
#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{Settings, StoredSettings};
    use anyhow::{Context, Result};
    use std::fs;
    use std::path::{Path, PathBuf};

    pub fn config_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("vsc")?;
        Ok(xdg_dirs.place_config_file("settings.toml")?)
    }

    /// Load settings from the default path, creating a default file if none exists.
    pub fn load_or_init() -> Result<StoredSettings> {
        load_or_init_at(&config_path()?)
    }

    pub fn load_or_init_at(path: &Path) -> Result<StoredSettings> {
        if !path.exists() {
            let defaults = StoredSettings::default();
            write_stored(path, &defaults)?;
            tracing::info!("created default settings at {}", path.display());
            return Ok(defaults);
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let stored: StoredSettings = toml::from_str(&data)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(stored)
    }

    pub fn save(settings: &Settings) -> Result<()> {
        save_at(&config_path()?, settings)
    }

    pub fn save_at(path: &Path, settings: &Settings) -> Result<()> {
        write_stored(path, &settings.to_stored())?;
        tracing::debug!("saved settings to {}", path.display());
        Ok(())
    }

    fn write_stored(path: &Path, stored: &StoredSettings) -> Result<()> {
        let toml = toml::to_string_pretty(stored)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_values() {
        let s = Settings::default();
        assert!((s.increment - 0.1).abs() < 1e-9);
        assert_eq!(s.key_combo, KeyCombo::Udar);
        assert_eq!(s.blocked_sites.patterns(), vec!["vine.com"]);
    }

    #[test]
    fn stored_defaults_parse_to_default_settings() {
        let s = Settings::from_stored(&StoredSettings::default()).unwrap();
        assert!((s.increment - DEFAULT_INCREMENT).abs() < 1e-9);
        assert_eq!(s.key_combo, KeyCombo::Udar);
        assert!(s.blocked_sites.is_blocked("https://vine.com/x"));
    }

    #[test]
    fn strict_parse_rejects_bad_fields() {
        let bad_inc = StoredSettings {
            increment: "fast".into(),
            ..StoredSettings::default()
        };
        assert_eq!(
            Settings::from_stored(&bad_inc).unwrap_err(),
            SettingsError::InvalidIncrement("fast".into())
        );

        let negative = StoredSettings {
            increment: "-0.5".into(),
            ..StoredSettings::default()
        };
        assert!(Settings::from_stored(&negative).is_err());

        let bad_combo = StoredSettings {
            key_combo: "wasd".into(),
            ..StoredSettings::default()
        };
        assert_eq!(
            Settings::from_stored(&bad_combo).unwrap_err(),
            SettingsError::UnknownKeyCombo("wasd".into())
        );
    }

    #[test]
    fn increments_below_rounding_resolution_are_rejected() {
        for raw in ["0.004", "0.009", "0"] {
            let stored = StoredSettings {
                increment: raw.into(),
                ..StoredSettings::default()
            };
            assert_eq!(
                Settings::from_stored(&stored).unwrap_err(),
                SettingsError::InvalidIncrement(raw.into())
            );
        }
        let smallest = StoredSettings {
            increment: "0.01".into(),
            ..StoredSettings::default()
        };
        let s = Settings::from_stored(&smallest).unwrap();
        let next = crate::speed::step(1.0, crate::keys::SpeedAction::Increase, s.increment);
        assert_eq!(next, 1.01);
    }

    #[test]
    fn values_from_store_accept_numbers_and_fill_gaps() {
        let stored = StoredSettings::from_values(|key| match key {
            INCREMENT_KEY => StoredValue::Number(0.25),
            KEY_COMBO_KEY => StoredValue::Text("lrar".into()),
            _ => StoredValue::Missing,
        });
        assert_eq!(stored.increment, "0.25");
        assert_eq!(stored.key_combo, "lrar");
        assert_eq!(stored.blocked_sites, DEFAULT_BLOCKED_SITES);

        let whole = StoredSettings::from_values(|key| match key {
            INCREMENT_KEY => StoredValue::Number(1.0),
            _ => StoredValue::Missing,
        });
        assert_eq!(
            whole,
            StoredSettings {
                increment: "1".into(),
                ..StoredSettings::default()
            }
        );
        assert!((Settings::from_stored(&whole).unwrap().increment - 1.0).abs() < 1e-9);

        assert_eq!(
            StoredSettings::from_values(|_| StoredValue::Missing),
            StoredSettings::default()
        );
    }

    #[test]
    fn entries_use_store_keys() {
        let keys: Vec<&str> = StoredSettings::default()
            .entries()
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(keys, vec!["increment", "keyCombo", "blockedSites"]);
    }

    #[test]
    fn saved_status_names_dropped_patterns() {
        assert_eq!(Settings::default().saved_status(), "Options saved.");
        let stored = StoredSettings {
            blocked_sites: "vine.com /(bad/ /[x/i".into(),
            ..StoredSettings::default()
        };
        let s = Settings::from_stored(&stored).unwrap();
        assert_eq!(
            s.saved_status(),
            "Options saved. Ignored invalid blacklist patterns: /(bad/, /[x/i"
        );
    }

    #[test]
    fn lossy_parse_falls_back_per_field() {
        let stored = StoredSettings {
            increment: "0".into(),
            key_combo: "pgud".into(),
            blocked_sites: "a.com b.com".into(),
        };
        let s = Settings::from_stored_lossy(&stored);
        assert!((s.increment - DEFAULT_INCREMENT).abs() < 1e-9);
        assert_eq!(s.key_combo, KeyCombo::Pgud);
        assert_eq!(s.blocked_sites.patterns(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn stored_toml_uses_camel_case_keys() {
        let toml = r#"
            increment = "0.25"
            keyCombo = "lrar"
            blockedSites = "vine.com, example.org"
        "#;
        let stored: StoredSettings = toml::from_str(toml).unwrap();
        let s = Settings::from_stored(&stored).unwrap();
        assert!((s.increment - 0.25).abs() < 1e-9);
        assert_eq!(s.key_combo, KeyCombo::Lrar);
        assert_eq!(s.blocked_sites.patterns(), vec!["vine.com", "example.org"]);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let stored: StoredSettings = toml::from_str(r#"keyCombo = "pgud""#).unwrap();
        assert_eq!(stored.increment, "0.1");
        assert_eq!(stored.blocked_sites, "vine.com");
        assert_eq!(stored.key_combo, "pgud");
    }

    #[test]
    fn settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vsc").join("settings.toml");

        let first = load_or_init_at(&path).unwrap();
        assert_eq!(first, StoredSettings::default());
        assert!(path.exists());

        let mut settings = Settings::from_stored(&first).unwrap();
        settings.increment = 0.5;
        settings.key_combo = KeyCombo::Lrar;
        save_at(&path, &settings).unwrap();

        let reloaded = Settings::from_stored(&load_or_init_at(&path).unwrap()).unwrap();
        assert!((reloaded.increment - 0.5).abs() < 1e-9);
        assert_eq!(reloaded.key_combo, KeyCombo::Lrar);
    }
}
