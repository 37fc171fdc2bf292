//! Helpers for driving a content-script session over the in-memory page.

use std::rc::Rc;

use vsc_core::blacklist::Blacklist;
use vsc_core::config::Settings;
use vsc_core::host::memory::{MemoryPage, VideoId};
use vsc_core::keys::KeyCombo;
use vsc_core::scanner::ContentScript;

/// A page at `url` with `videos` paused videos, and a session with default settings.
pub fn session(
    url: &str,
    videos: usize,
) -> (Rc<MemoryPage>, Vec<VideoId>, ContentScript<MemoryPage>) {
    let page = Rc::new(MemoryPage::new(url));
    let ids = (0..videos).map(|_| page.add_video()).collect();
    let script = ContentScript::new(Rc::clone(&page), Settings::default());
    (page, ids, script)
}

pub fn settings(increment: f64, key_combo: KeyCombo, blocked: &str) -> Settings {
    Settings {
        increment,
        key_combo,
        blocked_sites: Blacklist::parse(blocked),
    }
}
