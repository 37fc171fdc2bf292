//! Per-video speed control.
//!
//! A control owns one bar (decrease, readout, increase, close) inserted just
//! before its video. It moves through
//! `Uninitialized -> Rendered -> Active -> Disposed`; `Disposed` is final and
//! a disposed control ignores every event.

mod event;

pub use event::{BarTarget, ControlEvent, Propagation};

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Settings;
use crate::host::{Focus, Host, HostError};
use crate::keys::SpeedAction;
use crate::speed;

/// Shared handle; listeners keep `Weak` copies of it.
pub type ControlHandle<H> = Rc<RefCell<VideoControl<H>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Uninitialized,
    Rendered,
    Active,
    Disposed,
}

pub struct VideoControl<H: Host> {
    host: Rc<H>,
    video: H::Video,
    bar: Option<H::Bar>,
    settings: Rc<Settings>,
    state: ControlState,
}

impl<H: Host> VideoControl<H> {
    /// Build, render and activate a control for `video`.
    ///
    /// Returns `Ok(None)` without touching the page when the current URL is
    /// blacklisted or the video already has a control.
    pub fn create(
        host: Rc<H>,
        video: H::Video,
        settings: Rc<Settings>,
    ) -> Result<Option<ControlHandle<H>>, HostError> {
        let url = host.page_url();
        if let Some(pattern) = settings.blocked_sites.matching(&url) {
            tracing::warn!(pattern, "page is blacklisted, not adding speed controls");
            return Ok(None);
        }
        if host.is_marked(&video) {
            return Ok(None);
        }

        let mut control = Self {
            host,
            video,
            bar: None,
            settings,
            state: ControlState::Uninitialized,
        };
        control.render()?;

        let handle = Rc::new(RefCell::new(control));
        Self::activate(&handle)?;
        Ok(Some(handle))
    }

    fn render(&mut self) -> Result<(), HostError> {
        let bar = self.host.insert_bar(&self.video)?;
        self.host.mark(&self.video);
        self.bar = Some(bar);
        self.state = ControlState::Rendered;
        self.refresh_readout();
        tracing::debug!(video = ?self.video, "speed control rendered");
        Ok(())
    }

    fn activate(handle: &ControlHandle<H>) -> Result<(), HostError> {
        let host = Rc::clone(&handle.borrow().host);
        if let Err(e) = host.attach_listeners(handle) {
            handle.borrow_mut().dispose();
            return Err(e);
        }
        handle.borrow_mut().state = ControlState::Active;
        Ok(())
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.state == ControlState::Disposed
    }

    pub fn video(&self) -> &H::Video {
        &self.video
    }

    /// The bar, until the control is disposed.
    pub fn bar(&self) -> Option<&H::Bar> {
        self.bar.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in freshly loaded settings (used by reconciliation).
    pub fn set_settings(&mut self, settings: Rc<Settings>) {
        self.settings = settings;
    }

    /// Readout text for the video's current rate.
    pub fn speed_text(&self) -> String {
        speed::format_rate(self.host.playback_rate(&self.video))
    }

    pub fn increase_speed(&mut self) {
        self.change_speed(SpeedAction::Increase);
    }

    pub fn decrease_speed(&mut self) {
        self.change_speed(SpeedAction::Decrease);
    }

    fn change_speed(&mut self, action: SpeedAction) {
        if self.is_disposed() {
            return;
        }
        let current = self.host.playback_rate(&self.video);
        let next = speed::step(current, action, self.settings.increment);
        self.host.set_playback_rate(&self.video, next);
        self.refresh_readout();
    }

    pub fn refresh_readout(&self) {
        if let Some(bar) = &self.bar {
            self.host.set_readout(bar, &self.speed_text());
        }
    }

    /// Move the bar to where a drag ended.
    pub fn reposition(&self, x: f64, y: f64) {
        if let Some(bar) = &self.bar {
            let (left, top) = speed::drag_position(x, y, self.host.bar_height(bar));
            self.host.move_bar(bar, left, top);
        }
    }

    /// Handle one input event. Only an active control reacts.
    pub fn handle(&mut self, event: ControlEvent) -> Propagation {
        if self.state != ControlState::Active {
            return Propagation::Continue;
        }
        match event {
            ControlEvent::Click(target) => {
                match target {
                    BarTarget::Decrease => self.decrease_speed(),
                    BarTarget::Increase => self.increase_speed(),
                    BarTarget::Close => self.dispose(),
                    BarTarget::Bar => {}
                }
                Propagation::Swallow
            }
            ControlEvent::DoubleClick => Propagation::Swallow,
            ControlEvent::DragEnd { x, y } => {
                self.reposition(x, y);
                Propagation::Continue
            }
            ControlEvent::Key { key, focus } => {
                if focus == Focus::Elsewhere || !self.host.is_playing(&self.video) {
                    return Propagation::Continue;
                }
                match self.settings.key_combo.action_for(&key) {
                    Some(action) => self.change_speed(action),
                    None => self.host.focus_video(&self.video),
                }
                Propagation::PreventDefault
            }
            ControlEvent::RateChanged => {
                self.refresh_readout();
                Propagation::Continue
            }
        }
    }

    /// True once the page has dropped the video or the bar out from under an
    /// undisposed control.
    pub fn is_orphaned(&self) -> bool {
        match &self.bar {
            Some(bar) => !self.host.is_attached(&self.video, bar),
            None => false,
        }
    }

    /// Dispose an orphaned control and clear the video's marker, so the video
    /// gets a fresh control if the page puts it back.
    pub fn release(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.dispose();
        self.host.unmark(&self.video);
    }

    /// Detach listeners and remove the bar. Idempotent.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        if let Some(bar) = self.bar.take() {
            self.host.remove_bar(&bar);
        }
        self.state = ControlState::Disposed;
        tracing::debug!(video = ?self.video, "speed control disposed");
    }
}
