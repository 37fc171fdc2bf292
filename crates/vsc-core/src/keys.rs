//! Key-combo schemes: which keys speed a video up or down.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SettingsError;

/// Direction of a speed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedAction {
    Increase,
    Decrease,
}

/// Keys the controls care about. Everything else is [`Key::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            other => Key::Other(other.to_string()),
        }
    }

    /// Map a legacy `KeyboardEvent.keyCode`, for hosts that leave `key` empty.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            33 => Key::PageUp,
            34 => Key::PageDown,
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            other => Key::Other(format!("keyCode:{other}")),
        }
    }
}

/// Named keyboard scheme. The stored names are the short codes (`udar` = up/down arrows, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCombo {
    #[default]
    Udar,
    Lrar,
    Pgud,
}

impl KeyCombo {
    pub const ALL: [KeyCombo; 3] = [KeyCombo::Udar, KeyCombo::Lrar, KeyCombo::Pgud];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyCombo::Udar => "udar",
            KeyCombo::Lrar => "lrar",
            KeyCombo::Pgud => "pgud",
        }
    }

    /// `(increase, decrease)` keys for this scheme.
    pub fn bindings(self) -> (Key, Key) {
        match self {
            KeyCombo::Udar => (Key::ArrowUp, Key::ArrowDown),
            KeyCombo::Lrar => (Key::ArrowRight, Key::ArrowLeft),
            KeyCombo::Pgud => (Key::PageUp, Key::PageDown),
        }
    }

    /// The speed action bound to `key`, or `None` when the scheme ignores it.
    pub fn action_for(self, key: &Key) -> Option<SpeedAction> {
        let (up, down) = self.bindings();
        if *key == up {
            Some(SpeedAction::Increase)
        } else if *key == down {
            Some(SpeedAction::Decrease)
        } else {
            None
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyCombo {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udar" => Ok(KeyCombo::Udar),
            "lrar" => Ok(KeyCombo::Lrar),
            "pgud" => Ok(KeyCombo::Pgud),
            _ => Err(SettingsError::UnknownKeyCombo(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lrar_maps_left_and_right_only() {
        let combo = KeyCombo::Lrar;
        assert_eq!(combo.action_for(&Key::ArrowLeft), Some(SpeedAction::Decrease));
        assert_eq!(combo.action_for(&Key::ArrowRight), Some(SpeedAction::Increase));
        assert_eq!(combo.action_for(&Key::ArrowUp), None);
        assert_eq!(combo.action_for(&Key::PageDown), None);
    }

    #[test]
    fn udar_maps_up_and_down_only() {
        let combo = KeyCombo::Udar;
        assert_eq!(combo.action_for(&Key::ArrowUp), Some(SpeedAction::Increase));
        assert_eq!(combo.action_for(&Key::ArrowDown), Some(SpeedAction::Decrease));
        assert_eq!(combo.action_for(&Key::ArrowLeft), None);
    }

    #[test]
    fn pgud_maps_page_keys_only() {
        let combo = KeyCombo::Pgud;
        assert_eq!(combo.action_for(&Key::PageUp), Some(SpeedAction::Increase));
        assert_eq!(combo.action_for(&Key::PageDown), Some(SpeedAction::Decrease));
        assert_eq!(combo.action_for(&Key::ArrowDown), None);
        assert_eq!(combo.action_for(&Key::Other("a".into())), None);
    }

    #[test]
    fn dom_key_and_key_code_agree() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Key::from_key_code(37));
        assert_eq!(Key::from_dom_key("PageUp"), Key::from_key_code(33));
        assert_eq!(Key::from_dom_key("Down"), Key::ArrowDown);
        assert_eq!(Key::from_dom_key("x"), Key::Other("x".into()));
    }

    #[test]
    fn parse_key_combo_names() {
        assert_eq!("udar".parse::<KeyCombo>().unwrap(), KeyCombo::Udar);
        assert_eq!(" LRAR ".parse::<KeyCombo>().unwrap(), KeyCombo::Lrar);
        assert_eq!("pgud".parse::<KeyCombo>().unwrap(), KeyCombo::Pgud);
        assert!("wasd".parse::<KeyCombo>().is_err());
    }
}
