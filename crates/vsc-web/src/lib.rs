//! Browser side of VSC: the content script that puts speed controls on
//! videos, and the options page that edits the stored settings.
//!
//! Build with `wasm-pack build --target web crates/vsc-web`, then load
//! `crates/vsc-web/extension/` (with the generated `pkg/`) as an unpacked
//! extension.

mod content;
mod logging;
mod options;
pub mod page;
mod storage;

use wasm_bindgen::prelude::*;

// Panic hook and console logging for every page that loads the module.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init_console_logging();
}

/// Entry point for the content script.
#[wasm_bindgen]
pub fn start_content_script() -> Result<(), JsValue> {
    content::start()
}

/// Entry point for `options.html`.
#[wasm_bindgen]
pub fn start_options_page() -> Result<(), JsValue> {
    options::start()
}
