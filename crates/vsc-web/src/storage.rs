//! `chrome.storage.sync` as the settings provider.

use js_sys::{Object, Promise, Reflect};
use vsc_core::config::{Settings, StoredSettings, StoredValue};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(defaults: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    fn on_changed_add_listener(callback: &Closure<dyn FnMut(JsValue, JsValue)>) -> Result<(), JsValue>;
}

fn to_js(stored: &StoredSettings) -> Result<JsValue, JsValue> {
    let items = Object::new();
    for (key, value) in stored.entries() {
        Reflect::set(&items, &key.into(), &value.into())?;
    }
    Ok(items.into())
}

fn read_value(items: &JsValue, key: &str) -> StoredValue {
    let value = Reflect::get(items, &key.into()).unwrap_or(JsValue::UNDEFINED);
    if let Some(s) = value.as_string() {
        StoredValue::Text(s)
    } else if let Some(n) = value.as_f64() {
        StoredValue::Number(n)
    } else {
        StoredValue::Missing
    }
}

fn from_js(items: &JsValue) -> StoredSettings {
    StoredSettings::from_values(|key| read_value(items, key))
}

/// Stored settings, with defaults for unset keys.
pub async fn load() -> Result<StoredSettings, JsValue> {
    let defaults = to_js(&StoredSettings::default())?;
    let items = JsFuture::from(sync_get(&defaults)?).await?;
    Ok(from_js(&items))
}

pub async fn save(settings: &Settings) -> Result<(), JsValue> {
    let items = to_js(&settings.to_stored())?;
    JsFuture::from(sync_set(&items)?).await?;
    tracing::debug!("settings saved to chrome.storage.sync");
    Ok(())
}

/// Call `on_change` whenever the synced settings change.
pub fn on_changed(mut on_change: impl FnMut() + 'static) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(move |_changes: JsValue, area: JsValue| {
        if area.as_string().as_deref() == Some("sync") {
            on_change();
        }
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    on_changed_add_listener(&callback)?;
    callback.forget();
    Ok(())
}
