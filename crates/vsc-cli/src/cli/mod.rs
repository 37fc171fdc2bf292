//! CLI for the VSC video speed controls.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use vsc_core::config;

use commands::{
    run_check, run_completions, run_config_reset, run_config_set, run_config_show, run_keys,
    run_step,
};

/// Top-level CLI for the VSC companion tool.
#[derive(Debug, Parser)]
#[command(name = "vsc")]
#[command(about = "VSC: inspect and edit video speed control settings", long_about = None)]
pub struct Cli {
    /// Settings file to use instead of ~/.config/vsc/settings.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Tell whether controls would be injected on a page URL.
    Check {
        /// Full page URL, e.g. https://vine.com/v/abc.
        url: String,
    },

    /// Show or change the stored settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the keys bound to increase/decrease for the configured key combo.
    Keys,

    /// Preview the readout after repeated speed steps.
    Step {
        /// Starting playback rate.
        rate: f64,
        #[command(flatten)]
        direction: StepDirection,
        /// Number of steps.
        #[arg(long, default_value = "1", value_name = "N")]
        times: u32,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the stored settings.
    Show,

    /// Change one or more settings; unspecified ones keep their value.
    Set {
        /// Playback-rate step, e.g. 0.25.
        #[arg(long)]
        increment: Option<String>,
        /// Key scheme: udar, lrar or pgud.
        #[arg(long)]
        key_combo: Option<String>,
        /// Blocked sites, separated by commas, spaces or newlines.
        #[arg(long)]
        blocked_sites: Option<String>,
    },

    /// Restore the default settings.
    Reset,
}

/// Exactly one of `--up` / `--down`.
#[derive(Debug, Clone, Copy, Args)]
#[group(required = true, multiple = false)]
pub struct StepDirection {
    /// Step towards faster playback.
    #[arg(long)]
    pub up: bool,
    /// Step towards slower playback.
    #[arg(long)]
    pub down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl StepDirection {
    pub fn direction(self) -> Direction {
        if self.down {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let path = match cli.settings {
            Some(path) => path,
            None => config::config_path()?,
        };
        tracing::debug!("using settings at {}", path.display());

        match cli.command {
            CliCommand::Check { url } => run_check(&path, &url)?,
            CliCommand::Config { action } => match action {
                ConfigAction::Show => run_config_show(&path)?,
                ConfigAction::Set {
                    increment,
                    key_combo,
                    blocked_sites,
                } => run_config_set(&path, increment, key_combo, blocked_sites)?,
                ConfigAction::Reset => run_config_reset(&path)?,
            },
            CliCommand::Keys => run_keys(&path)?,
            CliCommand::Step {
                rate,
                direction,
                times,
            } => run_step(&path, rate, direction.direction(), times)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
