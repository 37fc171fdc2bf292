//! Tests for check, keys, step, completions and the global --settings flag.

use super::parse;
use crate::cli::{Cli, CliCommand, Direction};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_check() {
    match parse(&["vsc", "check", "https://vine.com/v/abc"]) {
        CliCommand::Check { url } => assert_eq!(url, "https://vine.com/v/abc"),
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_keys() {
    match parse(&["vsc", "keys"]) {
        CliCommand::Keys => {}
        _ => panic!("expected Keys"),
    }
}

#[test]
fn cli_parse_step_defaults_to_one() {
    match parse(&["vsc", "step", "1.5", "--down"]) {
        CliCommand::Step {
            rate,
            direction,
            times,
        } => {
            assert!((rate - 1.5).abs() < 1e-9);
            assert_eq!(direction.direction(), Direction::Down);
            assert_eq!(times, 1);
        }
        _ => panic!("expected Step"),
    }
}

#[test]
fn cli_parse_step_times() {
    match parse(&["vsc", "step", "1", "--up", "--times", "4"]) {
        CliCommand::Step {
            direction, times, ..
        } => {
            assert_eq!(direction.direction(), Direction::Up);
            assert_eq!(times, 4);
        }
        _ => panic!("expected Step"),
    }
}

#[test]
fn cli_parse_step_needs_exactly_one_direction() {
    assert!(Cli::try_parse_from(["vsc", "step", "1"]).is_err());
    assert!(Cli::try_parse_from(["vsc", "step", "1", "--up", "--down"]).is_err());
    assert!(Cli::try_parse_from(["vsc", "step", "1", "up"]).is_err());
}

#[test]
fn cli_parse_completions() {
    match parse(&["vsc", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_global_settings_path() {
    let cli = Cli::try_parse_from(["vsc", "keys", "--settings", "/tmp/vsc.toml"]).unwrap();
    assert_eq!(cli.settings, Some(PathBuf::from("/tmp/vsc.toml")));
    assert!(matches!(cli.command, CliCommand::Keys));
}
