//! Error taxonomy. Only setup can fail; runtime media problems are handled
//! locally by the music player and never surface here.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum RevealError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("canvas has no 2d context")]
    NoContext2d,
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for RevealError {
    fn from(value: JsValue) -> Self {
        RevealError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<RevealError> for JsValue {
    fn from(err: RevealError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
