use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use vaidhya_client::{ClientConfig, SessionClient};

mod chat_ui;
mod dom;
mod markdown;
mod render;
mod storage;
mod transport;
mod utils;

pub use storage::LocalStorageStore;
pub use transport::GlooTransport;

/// Initialize the WASM module
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());

    log::info!("Vaidhya widget loaded");
}

/// Mount the chat widget on the current page
///
/// `api_url` overrides the backend base URL baked in at build time.
#[wasm_bindgen]
pub async fn init_chat_widget(api_url: Option<String>) -> Result<(), JsValue> {
    let config = ClientConfig::resolve(utils::resolve_api_url(api_url, option_env!("VAIDHYA_API_URL")));
    log::info!("Initializing chat widget against {}", config.base_url);

    let client = SessionClient::new(
        config,
        Rc::new(GlooTransport::new()),
        Rc::new(LocalStorageStore::new()),
    );

    chat_ui::ChatWidget::new(document()?, client).start().await
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
