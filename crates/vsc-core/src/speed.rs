//! Playback-rate arithmetic shared by buttons, keys and the readout.

use crate::keys::SpeedAction;

/// Slowest rate browsers accept for `playbackRate`.
pub const MIN_RATE: f64 = 0.07;
/// Fastest rate browsers accept for `playbackRate`.
pub const MAX_RATE: f64 = 16.0;
/// Extra vertical correction applied when a dragged bar is dropped.
pub const DRAG_OFFSET_PX: f64 = 10.0;

/// Round to two decimal places so repeated steps do not drift.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Apply one step of `increment` in the given direction.
///
/// The result is rounded to two decimals and clamped to `[MIN_RATE, MAX_RATE]`.
pub fn step(rate: f64, action: SpeedAction, increment: f64) -> f64 {
    let delta = match action {
        SpeedAction::Increase => increment,
        SpeedAction::Decrease => -increment,
    };
    round2(rate + delta).clamp(MIN_RATE, MAX_RATE)
}

/// Readout text: the rate with exactly two decimals.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}", rate)
}

/// Where a bar dropped at `(x, y)` ends up on the page.
pub fn drag_position(x: f64, y: f64, bar_height: f64) -> (f64, f64) {
    (x.max(0.0), (y - bar_height - DRAG_OFFSET_PX).max(0.0))
}
