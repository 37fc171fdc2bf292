//! Tests for `config show|set|reset`.

use super::parse;
use crate::cli::{CliCommand, ConfigAction};

#[test]
fn cli_parse_config_show() {
    match parse(&["vsc", "config", "show"]) {
        CliCommand::Config {
            action: ConfigAction::Show,
        } => {}
        _ => panic!("expected Config Show"),
    }
}

#[test]
fn cli_parse_config_set_all_fields() {
    match parse(&[
        "vsc",
        "config",
        "set",
        "--increment",
        "0.25",
        "--key-combo",
        "lrar",
        "--blocked-sites",
        "vine.com, example.org",
    ]) {
        CliCommand::Config {
            action:
                ConfigAction::Set {
                    increment,
                    key_combo,
                    blocked_sites,
                },
        } => {
            assert_eq!(increment.as_deref(), Some("0.25"));
            assert_eq!(key_combo.as_deref(), Some("lrar"));
            assert_eq!(blocked_sites.as_deref(), Some("vine.com, example.org"));
        }
        _ => panic!("expected Config Set"),
    }
}

#[test]
fn cli_parse_config_set_partial() {
    match parse(&["vsc", "config", "set", "--key-combo", "pgud"]) {
        CliCommand::Config {
            action:
                ConfigAction::Set {
                    increment,
                    key_combo,
                    blocked_sites,
                },
        } => {
            assert!(increment.is_none());
            assert_eq!(key_combo.as_deref(), Some("pgud"));
            assert!(blocked_sites.is_none());
        }
        _ => panic!("expected Config Set"),
    }
}

#[test]
fn cli_parse_config_reset() {
    match parse(&["vsc", "config", "reset"]) {
        CliCommand::Config {
            action: ConfigAction::Reset,
        } => {}
        _ => panic!("expected Config Reset"),
    }
}
