//! Content-script runtime: triggers for the scanner and the settings load.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use vsc_core::config::Settings;
use vsc_core::scanner::{self, ContentScript, SCAN_INTERVAL_MS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

use crate::page::{self, WebPage};
use crate::storage;

type Session = Rc<RefCell<ContentScript<WebPage>>>;

pub fn start() -> Result<(), JsValue> {
    let page = Rc::new(WebPage::new()?);
    // Defaults until chrome.storage answers; the reload reconciles.
    let session: Session = Rc::new(RefCell::new(ContentScript::new(
        Rc::clone(&page),
        Settings::default(),
    )));

    scan(&session);
    start_interval(&page, &session)?;
    observe_insertions(&page, &session)?;

    spawn_local(reload_settings(Rc::clone(&session)));
    let on_change = Rc::clone(&session);
    storage::on_changed(move || spawn_local(reload_settings(Rc::clone(&on_change))))?;

    tracing::debug!("content script started");
    Ok(())
}

fn scan(session: &Session) {
    page::drop_retired_listeners();
    match session.try_borrow_mut() {
        Ok(mut script) => {
            script.scan_and_attach();
        }
        Err(_) => tracing::debug!("scan skipped, session busy"),
    }
}

async fn reload_settings(session: Session) {
    match storage::load().await {
        Ok(stored) => {
            let settings = Settings::from_stored_lossy(&stored);
            let outcome = session.borrow_mut().apply_settings(settings);
            tracing::debug!(?outcome, "settings applied");
        }
        Err(e) => tracing::warn!("could not load settings, keeping defaults: {:?}", e),
    }
}

fn start_interval(page: &WebPage, session: &Session) -> Result<(), JsValue> {
    let session = Rc::clone(session);
    let tick = Closure::wrap(Box::new(move || scan(&session)) as Box<dyn FnMut()>);
    page.window()
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            SCAN_INTERVAL_MS as i32,
        )?;
    tick.forget();
    Ok(())
}

fn adds_video(record: &MutationRecord) -> bool {
    let nodes = record.added_nodes();
    (0..nodes.length()).filter_map(|i| nodes.item(i)).any(|node| {
        scanner::brings_video(&node.node_name(), || {
            node.dyn_ref::<Element>()
                .map_or(0, |el| el.get_elements_by_tag_name("video").length())
        })
    })
}

fn observe_insertions(page: &WebPage, session: &Session) -> Result<(), JsValue> {
    let session = Rc::clone(session);
    let on_mutation = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
        let inserted = records
            .iter()
            .filter_map(|r| r.dyn_into::<MutationRecord>().ok())
            .any(|r| adds_video(&r));
        if inserted {
            scan(&session);
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);

    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    let root = page
        .document()
        .document_element()
        .ok_or_else(|| JsValue::from_str("no document element"))?;
    observer.observe_with_options(&root, &init)?;
    on_mutation.forget();
    Ok(())
}
