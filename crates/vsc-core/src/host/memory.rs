//! In-memory page: videos, bars, focus and listeners without a browser.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::{Focus, Host, HostError};
use crate::control::{ControlEvent, ControlHandle, Propagation, VideoControl};
use crate::keys::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Video(VideoId),
    Bar(BarId),
}

#[derive(Debug)]
struct VideoNode {
    rate: f64,
    playing: bool,
    marked: bool,
}

#[derive(Debug)]
struct BarNode {
    video: VideoId,
    readout: String,
    position: Option<(f64, f64)>,
}

type Listener = Weak<RefCell<VideoControl<MemoryPage>>>;

/// A page whose nodes live in a flat document-order list.
#[derive(Debug, Default)]
pub struct MemoryPage {
    url: RefCell<String>,
    videos: RefCell<Vec<VideoNode>>,
    bars: RefCell<Vec<BarNode>>,
    order: RefCell<Vec<Node>>,
    listeners: RefCell<HashMap<BarId, Listener>>,
    focused: Cell<Option<VideoId>>,
}

impl MemoryPage {
    /// Height reported for every bar.
    pub const BAR_HEIGHT: f64 = 30.0;

    pub fn new(url: &str) -> Self {
        Self {
            url: RefCell::new(url.to_string()),
            ..Self::default()
        }
    }

    pub fn set_url(&self, url: &str) {
        *self.url.borrow_mut() = url.to_string();
    }

    /// Append a paused video at normal speed.
    pub fn add_video(&self) -> VideoId {
        let mut videos = self.videos.borrow_mut();
        let id = VideoId(videos.len());
        videos.push(VideoNode {
            rate: 1.0,
            playing: false,
            marked: false,
        });
        self.order.borrow_mut().push(Node::Video(id));
        id
    }

    /// Take the video out of the page; a bar next to it stays.
    pub fn remove_video(&self, video: VideoId) {
        self.order.borrow_mut().retain(|n| *n != Node::Video(video));
    }

    /// Put a removed video back at the end of the page, keeping its state.
    pub fn reinsert_video(&self, video: VideoId) {
        let mut order = self.order.borrow_mut();
        if !order.contains(&Node::Video(video)) {
            order.push(Node::Video(video));
        }
    }

    /// Remove the video together with its bar, as when their shared parent is removed.
    pub fn remove_video_with_bar(&self, video: VideoId) {
        let bars = self.bars.borrow();
        self.order.borrow_mut().retain(|n| match n {
            Node::Video(v) => *v != video,
            Node::Bar(b) => bars[b.0].video != video,
        });
    }

    pub fn set_playing(&self, video: VideoId, playing: bool) {
        self.videos.borrow_mut()[video.0].playing = playing;
    }

    pub fn is_focused(&self, video: VideoId) -> bool {
        self.focused.get() == Some(video)
    }

    /// Bars currently in the page.
    pub fn bars(&self) -> Vec<BarId> {
        self.order
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Node::Bar(b) => Some(*b),
                Node::Video(_) => None,
            })
            .collect()
    }

    pub fn bar_for(&self, video: VideoId) -> Option<BarId> {
        let bars = self.bars.borrow();
        self.bars().into_iter().find(|b| bars[b.0].video == video)
    }

    fn in_page(&self, node: Node) -> bool {
        self.order.borrow().contains(&node)
    }

    /// Readout text of a bar still in the page.
    pub fn readout(&self, bar: BarId) -> Option<String> {
        if !self.in_page(Node::Bar(bar)) {
            return None;
        }
        Some(self.bars.borrow()[bar.0].readout.clone())
    }

    pub fn bar_position(&self, bar: BarId) -> Option<(f64, f64)> {
        self.bars.borrow()[bar.0].position
    }

    /// True when `bar` sits immediately before `video` in document order.
    pub fn bar_precedes(&self, bar: BarId, video: VideoId) -> bool {
        let order = self.order.borrow();
        order
            .windows(2)
            .any(|w| w[0] == Node::Bar(bar) && w[1] == Node::Video(video))
    }

    pub fn has_listeners(&self, bar: BarId) -> bool {
        self.listeners.borrow().contains_key(&bar)
    }

    /// Deliver an event to the control listening on `bar`, if any.
    pub fn dispatch(&self, bar: BarId, event: ControlEvent) -> Option<Propagation> {
        let listener = self.listeners.borrow().get(&bar).cloned()?;
        let control = listener.upgrade()?;
        let outcome = control.borrow_mut().handle(event);
        Some(outcome)
    }

    /// Document-wide keydown with focus on `focused` (or nowhere in particular).
    pub fn press_key(&self, key: Key, focused: Option<VideoId>) -> Vec<Propagation> {
        self.focused.set(focused);
        let targets: Vec<(BarId, VideoId)> = {
            let bars = self.bars.borrow();
            self.listeners
                .borrow()
                .keys()
                .map(|b| (*b, bars[b.0].video))
                .collect()
        };
        targets
            .into_iter()
            .filter_map(|(bar, video)| {
                let focus = if focused == Some(video) {
                    Focus::Video
                } else {
                    Focus::Elsewhere
                };
                self.dispatch(
                    bar,
                    ControlEvent::Key {
                        key: key.clone(),
                        focus,
                    },
                )
            })
            .collect()
    }

    /// Change the rate behind the controls' back and fire `ratechange`.
    pub fn set_rate_externally(&self, video: VideoId, rate: f64) {
        self.videos.borrow_mut()[video.0].rate = rate;
        if let Some(bar) = self.bar_for(video) {
            self.dispatch(bar, ControlEvent::RateChanged);
        }
    }
}

impl Host for MemoryPage {
    type Video = VideoId;
    type Bar = BarId;

    fn page_url(&self) -> String {
        self.url.borrow().clone()
    }

    fn videos(&self) -> Vec<VideoId> {
        self.order
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Node::Video(v) => Some(*v),
                Node::Bar(_) => None,
            })
            .collect()
    }

    fn is_marked(&self, video: &VideoId) -> bool {
        self.videos.borrow()[video.0].marked
    }

    fn mark(&self, video: &VideoId) {
        self.videos.borrow_mut()[video.0].marked = true;
    }

    fn unmark(&self, video: &VideoId) {
        self.videos.borrow_mut()[video.0].marked = false;
    }

    fn playback_rate(&self, video: &VideoId) -> f64 {
        self.videos.borrow()[video.0].rate
    }

    fn set_playback_rate(&self, video: &VideoId, rate: f64) {
        self.videos.borrow_mut()[video.0].rate = rate;
    }

    fn is_playing(&self, video: &VideoId) -> bool {
        self.videos.borrow()[video.0].playing
    }

    fn focus_video(&self, video: &VideoId) {
        self.focused.set(Some(*video));
    }

    fn insert_bar(&self, video: &VideoId) -> Result<BarId, HostError> {
        let mut order = self.order.borrow_mut();
        let index = order
            .iter()
            .position(|n| *n == Node::Video(*video))
            .ok_or(HostError::Detached)?;

        let mut bars = self.bars.borrow_mut();
        let id = BarId(bars.len());
        bars.push(BarNode {
            video: *video,
            readout: String::new(),
            position: None,
        });
        order.insert(index, Node::Bar(id));
        Ok(id)
    }

    fn set_readout(&self, bar: &BarId, text: &str) {
        self.bars.borrow_mut()[bar.0].readout = text.to_string();
    }

    fn bar_height(&self, _bar: &BarId) -> f64 {
        Self::BAR_HEIGHT
    }

    fn move_bar(&self, bar: &BarId, x: f64, y: f64) {
        self.bars.borrow_mut()[bar.0].position = Some((x, y));
    }

    fn is_attached(&self, video: &VideoId, bar: &BarId) -> bool {
        self.in_page(Node::Video(*video)) && self.in_page(Node::Bar(*bar))
    }

    fn attach_listeners(&self, control: &ControlHandle<Self>) -> Result<(), HostError> {
        let bar = control
            .borrow()
            .bar()
            .copied()
            .ok_or_else(|| HostError::Dom("control has no bar".to_string()))?;
        self.listeners.borrow_mut().insert(bar, Rc::downgrade(control));
        Ok(())
    }

    fn remove_bar(&self, bar: &BarId) {
        self.listeners.borrow_mut().remove(bar);
        self.order.borrow_mut().retain(|n| *n != Node::Bar(*bar));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_bar_goes_before_its_video() {
        let page = MemoryPage::new("https://example.com/");
        let first = page.add_video();
        let second = page.add_video();
        let bar = page.insert_bar(&second).unwrap();
        assert!(page.bar_precedes(bar, second));
        assert!(!page.bar_precedes(bar, first));
        assert_eq!(page.videos(), vec![first, second]);
    }

    #[test]
    fn remove_bar_twice_is_harmless() {
        let page = MemoryPage::new("https://example.com/");
        let video = page.add_video();
        let bar = page.insert_bar(&video).unwrap();
        page.remove_video_with_bar(video);
        assert!(page.bars().is_empty());
        page.remove_bar(&bar);
        page.remove_bar(&bar);
        assert!(page.readout(bar).is_none());
    }

    #[test]
    fn attachment_needs_both_video_and_bar() {
        let page = MemoryPage::new("https://example.com/");
        let video = page.add_video();
        let bar = page.insert_bar(&video).unwrap();
        assert!(page.is_attached(&video, &bar));

        page.remove_video(video);
        assert!(!page.is_attached(&video, &bar));
        page.reinsert_video(video);
        assert!(page.is_attached(&video, &bar));

        page.remove_bar(&bar);
        assert!(!page.is_attached(&video, &bar));
    }
}
