//! Options page: restore the stored settings into the form, save them back.

use js_sys::Reflect;
use vsc_core::config::{Settings, StoredSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::storage;

/// How long "Options saved." stays visible.
const STATUS_CLEAR_MS: i32 = 750;

const INCREMENT_FIELD: &str = "increment";
const KEY_COMBO_FIELD: &str = "keyCombo";
const BLACKLIST_FIELD: &str = "blacklist";

pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    spawn_local(restore_options(document.clone()));

    let save_button = by_id(&document, "save")?;
    let on_save = Closure::wrap(Box::new(move |_event: Event| {
        spawn_local(save_options(document.clone()));
    }) as Box<dyn FnMut(_)>);
    save_button.add_event_listener_with_callback("click", on_save.as_ref().unchecked_ref())?;
    on_save.forget();
    Ok(())
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

// Works for <input>, <select> and <textarea> alike.
fn field_value(document: &Document, id: &str) -> Result<String, JsValue> {
    let el = by_id(document, id)?;
    Ok(Reflect::get(&el, &"value".into())?
        .as_string()
        .unwrap_or_default())
}

fn set_field_value(document: &Document, id: &str, value: &str) -> Result<(), JsValue> {
    let el = by_id(document, id)?;
    Reflect::set(&el, &"value".into(), &value.into())?;
    Ok(())
}

fn set_status(document: &Document, text: &str) {
    if let Ok(status) = by_id(document, "status") {
        status.set_text_content(Some(text));
    }
}

async fn restore_options(document: Document) {
    let stored = match storage::load().await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("could not load settings: {:?}", e);
            StoredSettings::default()
        }
    };
    let filled = set_field_value(&document, INCREMENT_FIELD, &stored.increment)
        .and_then(|_| set_field_value(&document, KEY_COMBO_FIELD, &stored.key_combo))
        .and_then(|_| set_field_value(&document, BLACKLIST_FIELD, &stored.blocked_sites));
    if let Err(e) = filled {
        tracing::warn!("options form incomplete: {:?}", e);
    }
}

fn read_form(document: &Document) -> Result<StoredSettings, JsValue> {
    Ok(StoredSettings {
        increment: field_value(document, INCREMENT_FIELD)?,
        key_combo: field_value(document, KEY_COMBO_FIELD)?,
        blocked_sites: field_value(document, BLACKLIST_FIELD)?,
    })
}

async fn save_options(document: Document) {
    let stored = match read_form(&document) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("options form incomplete: {:?}", e);
            return;
        }
    };
    let settings = match Settings::from_stored(&stored) {
        Ok(settings) => settings,
        Err(e) => {
            set_status(&document, &e.to_string());
            return;
        }
    };
    if let Err(e) = storage::save(&settings).await {
        tracing::warn!("saving settings failed: {:?}", e);
        set_status(&document, "Saving failed.");
        return;
    }

    // Update status to let the user know options were saved.
    set_status(&document, &settings.saved_status());
    let clear = Closure::once_into_js(move || set_status(&document, ""));
    if let Some(window) = web_sys::window() {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            clear.unchecked_ref(),
            STATUS_CLEAR_MS,
        );
    }
}
