//! The page a control lives in.
//!
//! [`Host`] is the seam between the control logic and a concrete DOM. The
//! browser build implements it over `web-sys`; [`memory::MemoryPage`] is a
//! scriptable in-memory page used by tests.

pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::control::ControlHandle;

/// Failures while mutating the page. None of them are fatal: the scanner
/// simply retries on its next tick.
#[derive(Debug, Error)]
pub enum HostError {
    /// The video has no parent node to insert the bar into.
    #[error("video element is not attached to the page")]
    Detached,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

/// Where keyboard focus sits relative to one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Video,
    Bar,
    Elsewhere,
}

/// DOM operations needed by the scanner and the video controls.
///
/// `Video` is a non-owning handle: the page owns the element's lifetime.
pub trait Host: Sized + 'static {
    type Video: Clone + PartialEq + fmt::Debug;
    type Bar: fmt::Debug;

    /// URL of the current page, checked against the blacklist.
    fn page_url(&self) -> String;

    /// Every video element currently in the page, in document order.
    fn videos(&self) -> Vec<Self::Video>;

    /// Whether the video carries the "already augmented" marker.
    fn is_marked(&self, video: &Self::Video) -> bool;
    fn mark(&self, video: &Self::Video);
    fn unmark(&self, video: &Self::Video);

    fn playback_rate(&self, video: &Self::Video) -> f64;
    fn set_playback_rate(&self, video: &Self::Video, rate: f64);
    fn is_playing(&self, video: &Self::Video) -> bool;
    fn focus_video(&self, video: &Self::Video);

    /// Build a control bar and insert it immediately before `video`.
    fn insert_bar(&self, video: &Self::Video) -> Result<Self::Bar, HostError>;
    fn set_readout(&self, bar: &Self::Bar, text: &str);
    fn bar_height(&self, bar: &Self::Bar) -> f64;
    fn move_bar(&self, bar: &Self::Bar, x: f64, y: f64);

    /// Whether both the video and its bar are still part of the page.
    fn is_attached(&self, video: &Self::Video, bar: &Self::Bar) -> bool;

    /// Route the bar's input events (and the video's rate changes) to `control`.
    fn attach_listeners(&self, control: &ControlHandle<Self>) -> Result<(), HostError>;

    /// Detach every listener added for this bar and take the bar out of the page.
    /// Must be a no-op when the bar's parent no longer exists.
    fn remove_bar(&self, bar: &Self::Bar);
}
