use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Js(String),
    #[error("{0}")]
    Relay(String),
    #[error("Unexpected response from server (status {0})")]
    UnexpectedReply(u16),
    #[error("Local storage is unavailable")]
    StorageUnavailable,
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        ClientError::Js(message)
    }
}
