//! Page scanning and settings reconciliation for one content-script session.
//!
//! [`ContentScript::scan_and_attach`] is the single discovery path. The
//! browser binding calls it once at start, on every [`SCAN_INTERVAL_MS`]
//! tick and whenever a mutation record brings in a `<video>`; it is
//! idempotent, so overlapping triggers are harmless.

use std::rc::Rc;

use crate::config::Settings;
use crate::control::VideoControl;
use crate::host::Host;
use crate::registry::Registry;

/// Period of the fallback scan that catches videos no mutation record reported.
pub const SCAN_INTERVAL_MS: u32 = 1000;

/// True when an inserted node is a `<video>` or holds one.
///
/// `node_name` is the DOM `nodeName`; `nested_videos` counts `<video>`
/// descendants and is only consulted for other nodes.
pub fn brings_video(node_name: &str, nested_videos: impl FnOnce() -> u32) -> bool {
    node_name.eq_ignore_ascii_case("video") || nested_videos() > 0
}

/// Result of applying freshly loaded settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The page is blacklisted; this many existing controls were disposed.
    Blocked { disposed: usize },
    /// The page is allowed; this many new controls were attached.
    Allowed { attached: usize },
}

pub struct ContentScript<H: Host> {
    host: Rc<H>,
    settings: Rc<Settings>,
    registry: Registry<H>,
    warned_blocked: bool,
}

impl<H: Host> ContentScript<H> {
    pub fn new(host: Rc<H>, settings: Settings) -> Self {
        Self {
            host,
            settings: Rc::new(settings),
            registry: Registry::new(),
            warned_blocked: false,
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry<H> {
        &self.registry
    }

    /// The blacklist pattern that blocks the current page, if any.
    pub fn blocking_pattern(&self) -> Option<String> {
        self.settings
            .blocked_sites
            .matching(&self.host.page_url())
            .map(str::to_string)
    }

    pub fn is_blocked(&self) -> bool {
        self.blocking_pattern().is_some()
    }

    /// Attach a control to every unmarked video. Returns how many were attached.
    pub fn scan_and_attach(&mut self) -> usize {
        self.registry.prune();

        if let Some(pattern) = self.blocking_pattern() {
            if !self.warned_blocked {
                tracing::warn!(pattern = %pattern, "page is blacklisted, speed controls disabled");
                self.warned_blocked = true;
            }
            return 0;
        }

        let mut attached = 0;
        for video in self.host.videos() {
            if self.host.is_marked(&video) {
                continue;
            }
            match VideoControl::create(Rc::clone(&self.host), video, Rc::clone(&self.settings)) {
                Ok(Some(control)) => {
                    self.registry.register(control);
                    attached += 1;
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("speed control not attached, retrying next scan: {}", e),
            }
        }
        if attached > 0 {
            tracing::debug!(attached, live = self.registry.live(), "scan attached controls");
        }
        attached
    }

    /// Replace the settings and bring the page in line with them.
    ///
    /// Controls created before the settings arrived are disposed when the page
    /// turns out to be blacklisted; otherwise they pick up the new settings.
    pub fn apply_settings(&mut self, settings: Settings) -> Reconciliation {
        self.settings = Rc::new(settings);
        self.warned_blocked = false;

        if self.is_blocked() {
            let disposed = self.registry.dispose_all();
            if disposed > 0 {
                tracing::info!(disposed, "removed speed controls from blacklisted page");
            }
            // Logs the blacklist warning once.
            self.scan_and_attach();
            return Reconciliation::Blocked { disposed };
        }

        self.registry.update_settings(&self.settings);
        let attached = self.scan_and_attach();
        Reconciliation::Allowed { attached }
    }

    /// Dispose every control, e.g. when the page unloads.
    pub fn shutdown(&mut self) -> usize {
        self.registry.dispose_all()
    }
}
