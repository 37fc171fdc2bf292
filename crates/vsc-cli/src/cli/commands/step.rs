//! `vsc step <rate> --up|--down` – preview speed steps with the configured increment.

use anyhow::Result;
use std::path::Path;
use vsc_core::keys::SpeedAction;
use vsc_core::speed;

use super::effective_settings;
use crate::cli::Direction;

pub fn run_step(path: &Path, rate: f64, direction: Direction, times: u32) -> Result<()> {
    let settings = effective_settings(path)?;
    for line in step_readouts(rate, direction, settings.increment, times) {
        println!("{line}");
    }
    Ok(())
}

/// Readout before stepping, then after each step.
pub(crate) fn step_readouts(
    rate: f64,
    direction: Direction,
    increment: f64,
    times: u32,
) -> Vec<String> {
    let action = match direction {
        Direction::Up => SpeedAction::Increase,
        Direction::Down => SpeedAction::Decrease,
    };
    let mut current = speed::round2(rate).clamp(speed::MIN_RATE, speed::MAX_RATE);
    let mut lines = vec![speed::format_rate(current)];
    for _ in 0..times {
        current = speed::step(current, action, increment);
        lines.push(speed::format_rate(current));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readouts_follow_each_step() {
        assert_eq!(
            step_readouts(1.0, Direction::Up, 0.25, 3),
            vec!["1.00", "1.25", "1.50", "1.75"]
        );
        assert_eq!(
            step_readouts(0.2, Direction::Down, 0.1, 2),
            vec!["0.20", "0.10", "0.07"]
        );
    }
}
