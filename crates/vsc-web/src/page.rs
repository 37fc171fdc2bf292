//! [`Host`] over the live DOM.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use vsc_core::control::{BarTarget, ControlEvent, ControlHandle, Propagation, VideoControl};
use vsc_core::host::{Focus, Host, HostError};
use vsc_core::keys::Key;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, DragEvent, Event, EventTarget, HtmlElement, HtmlVideoElement, KeyboardEvent, Node,
    Window,
};

/// Boolean attribute set on every video that has (or had) a control.
pub const MARKER_ATTR: &str = "data-vsc-controlled";
/// Class of the injected bar; styled by `extension/vsc.css`.
pub const BAR_CLASS: &str = "vsc-controller";

thread_local! {
    // Listeners removed while one of them was running; dropped on the next scan tick.
    static RETIRED: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
}

/// Drop listener closures parked by [`WebPage::remove_bar`].
pub fn drop_retired_listeners() {
    RETIRED.with(|retired| retired.borrow_mut().clear());
}

#[derive(Debug)]
struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback_and_bool(
            kind,
            callback.as_ref().unchecked_ref(),
            capture,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            capture,
            callback,
        })
    }

    fn remove(&self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// The injected bar and the listeners wired to it.
#[derive(Debug)]
pub struct WebBar {
    container: HtmlElement,
    readout: HtmlElement,
    decrease: HtmlElement,
    increase: HtmlElement,
    close: HtmlElement,
    listeners: RefCell<Vec<Listener>>,
}

pub struct WebPage {
    window: Window,
    document: Document,
}

fn dom_err(e: JsValue) -> HostError {
    HostError::Dom(format!("{:?}", e))
}

impl WebPage {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(
        &self,
        tag: &str,
        class: &str,
        text: Option<&str>,
    ) -> Result<HtmlElement, HostError> {
        let el = self
            .document
            .create_element(tag)
            .map_err(dom_err)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::Dom(format!("<{tag}> is not an HtmlElement")))?;
        el.set_class_name(class);
        el.set_text_content(text);
        Ok(el)
    }
}

/// Where focus sits relative to one control.
fn focus_of(document: &Document, video: &HtmlVideoElement, container: &HtmlElement) -> Focus {
    let Some(active) = document.active_element() else {
        return Focus::Elsewhere;
    };
    let active_js: &JsValue = active.as_ref();
    let video_js: &JsValue = video.as_ref();
    if active_js == video_js {
        Focus::Video
    } else if container.contains(Some(active.as_ref())) {
        Focus::Bar
    } else {
        Focus::Elsewhere
    }
}

/// Hand an input to the control behind `control` and apply its verdict to `event`.
fn deliver(control: &Weak<RefCell<VideoControl<WebPage>>>, event: &Event, input: ControlEvent) {
    let Some(handle) = control.upgrade() else {
        return;
    };
    // A re-entrant event (e.g. focus() firing handlers) is simply dropped.
    let Ok(mut ctl) = handle.try_borrow_mut() else {
        return;
    };
    match ctl.handle(input) {
        Propagation::Continue => {}
        Propagation::PreventDefault => event.prevent_default(),
        Propagation::Swallow => {
            event.prevent_default();
            event.stop_propagation();
        }
    }
}

fn key_of(event: &KeyboardEvent) -> Key {
    let key = event.key();
    if key.is_empty() || key == "Unidentified" {
        Key::from_key_code(event.key_code())
    } else {
        Key::from_dom_key(&key)
    }
}

impl Host for WebPage {
    type Video = HtmlVideoElement;
    type Bar = WebBar;

    fn page_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn videos(&self) -> Vec<HtmlVideoElement> {
        let collection = self.document.get_elements_by_tag_name("video");
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .filter_map(|el| el.dyn_into::<HtmlVideoElement>().ok())
            .collect()
    }

    fn is_marked(&self, video: &HtmlVideoElement) -> bool {
        video.has_attribute(MARKER_ATTR)
    }

    fn mark(&self, video: &HtmlVideoElement) {
        let _ = video.set_attribute(MARKER_ATTR, "");
    }

    fn unmark(&self, video: &HtmlVideoElement) {
        let _ = video.remove_attribute(MARKER_ATTR);
    }

    fn playback_rate(&self, video: &HtmlVideoElement) -> f64 {
        video.playback_rate()
    }

    fn set_playback_rate(&self, video: &HtmlVideoElement, rate: f64) {
        video.set_playback_rate(rate);
    }

    fn is_playing(&self, video: &HtmlVideoElement) -> bool {
        !video.paused() && !video.ended()
    }

    fn focus_video(&self, video: &HtmlVideoElement) {
        let _ = video.focus();
    }

    fn insert_bar(&self, video: &HtmlVideoElement) -> Result<WebBar, HostError> {
        let parent = video.parent_node().ok_or(HostError::Detached)?;

        let container = self.element("div", BAR_CLASS, None)?;
        container.set_draggable(true);
        let decrease = self.element("button", "vsc-btn decrease", Some("-"))?;
        let readout = self.element("span", "speed-indicator", None)?;
        let increase = self.element("button", "vsc-btn increase", Some("+"))?;
        let close = self.element("button", "vsc-close-button", Some("close"))?;
        for child in [&decrease, &readout, &increase, &close] {
            container.append_child(child).map_err(dom_err)?;
        }

        parent
            .insert_before(&container, Some(video.as_ref()))
            .map_err(dom_err)?;

        Ok(WebBar {
            container,
            readout,
            decrease,
            increase,
            close,
            listeners: RefCell::new(Vec::new()),
        })
    }

    fn set_readout(&self, bar: &WebBar, text: &str) {
        bar.readout.set_text_content(Some(text));
    }

    fn bar_height(&self, bar: &WebBar) -> f64 {
        f64::from(bar.container.offset_height())
    }

    fn move_bar(&self, bar: &WebBar, x: f64, y: f64) {
        let style = bar.container.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{x}px"));
        let _ = style.set_property("top", &format!("{y}px"));
    }

    fn is_attached(&self, video: &HtmlVideoElement, bar: &WebBar) -> bool {
        video.is_connected() && bar.container.is_connected()
    }

    fn attach_listeners(&self, control: &ControlHandle<Self>) -> Result<(), HostError> {
        let ctl = control.borrow();
        let bar = ctl
            .bar()
            .ok_or_else(|| HostError::Dom("control has no bar".to_string()))?;
        let video = ctl.video().clone();
        let weak = Rc::downgrade(control);
        let container: &EventTarget = bar.container.as_ref();
        // Registered on the bar as soon as they are added, so a failure part-way
        // leaves nothing behind once the control is disposed.
        let mut listeners = bar.listeners.borrow_mut();

        let targets: [(EventTarget, BarTarget); 3] = [
            (bar.decrease.clone().into(), BarTarget::Decrease),
            (bar.increase.clone().into(), BarTarget::Increase),
            (bar.close.clone().into(), BarTarget::Close),
        ];
        let on_click = {
            let weak = weak.clone();
            move |event: Event| {
                let target = event
                    .target()
                    .and_then(|t| targets.iter().find(|(el, _)| *el == t).map(|(_, b)| *b))
                    .unwrap_or(BarTarget::Bar);
                deliver(&weak, &event, ControlEvent::Click(target));
            }
        };
        listeners.push(Listener::add(container, "click", true, on_click).map_err(dom_err)?);

        let on_dblclick = {
            let weak = weak.clone();
            move |event: Event| deliver(&weak, &event, ControlEvent::DoubleClick)
        };
        listeners.push(Listener::add(container, "dblclick", true, on_dblclick).map_err(dom_err)?);

        let on_dragend = {
            let weak = weak.clone();
            move |event: Event| {
                if let Some(drag) = event.dyn_ref::<DragEvent>() {
                    let (x, y) = (f64::from(drag.page_x()), f64::from(drag.page_y()));
                    deliver(&weak, &event, ControlEvent::DragEnd { x, y });
                }
            }
        };
        listeners.push(Listener::add(container, "dragend", false, on_dragend).map_err(dom_err)?);

        let on_keydown = {
            let weak = weak.clone();
            let document = self.document.clone();
            let video = video.clone();
            let bar_el = bar.container.clone();
            move |event: Event| {
                if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
                    let focus = focus_of(&document, &video, &bar_el);
                    let key = key_of(key_event);
                    deliver(&weak, &event, ControlEvent::Key { key, focus });
                }
            }
        };
        let document: &EventTarget = self.document.as_ref();
        listeners.push(Listener::add(document, "keydown", true, on_keydown).map_err(dom_err)?);

        let on_ratechange = move |event: Event| deliver(&weak, &event, ControlEvent::RateChanged);
        let video_target: &EventTarget = video.as_ref();
        listeners
            .push(Listener::add(video_target, "ratechange", false, on_ratechange).map_err(dom_err)?);
        Ok(())
    }

    fn remove_bar(&self, bar: &WebBar) {
        let listeners: Vec<Listener> = bar.listeners.borrow_mut().drain(..).collect();
        for listener in &listeners {
            listener.remove();
        }
        // The close button's own click handler may be the one running right now.
        RETIRED.with(|retired| retired.borrow_mut().extend(listeners));

        if let Some(parent) = bar.container.parent_node() {
            let _ = parent.remove_child(&bar.container);
        }
    }
}
