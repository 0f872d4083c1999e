/// Tab Grab - Chrome Extension for copying and exporting tab URLs
/// Built with Rust + WASM + Yew

mod domain;
mod extract;
mod format;
mod operations;
mod settings;
mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the link extractor for JavaScript access
#[wasm_bindgen]
pub fn extract_links(text: &str) -> Vec<String> {
    extract::extract_urls(text)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsApp>::new().render();
}
