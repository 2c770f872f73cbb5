//! Error types for the browser host.

use thiserror::Error;

/// Result type for browser host operations.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while attaching to the page.
#[derive(Error, Debug)]
pub enum DomError {
    /// No global `window` (running outside a browser main thread).
    #[error("no global window")]
    NoWindow,

    /// The window has no document.
    #[error("window has no document")]
    NoDocument,

    /// No element with the given id.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// The element exists but is not an `HTMLElement`.
    #[error("element #{0} is not an HTMLElement")]
    NotHtmlElement(String),

    /// A JavaScript call threw.
    #[error("JavaScript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for DomError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        DomError::Js(format!("{value:?}"))
    }
}
