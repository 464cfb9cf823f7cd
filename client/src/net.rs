use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

use curious_ink_shared::relay::PREDICT_PATH;
use curious_ink_shared::{PredictRequest, RelayReply};

use crate::error::ClientError;

/// Sends the canvas image and prompt to the relay and returns the raw reply.
pub async fn predict_image(
    window: &Window,
    image_data: &str,
    prompt: &str,
) -> Result<String, ClientError> {
    let body = serde_json::to_string(&PredictRequest {
        prompt: prompt.to_string(),
        image_data: image_data.to_string(),
    })
    .map_err(|error| ClientError::Js(error.to_string()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(PREDICT_PATH, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let status = response.status();
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    match serde_json::from_str::<RelayReply>(&text) {
        Ok(RelayReply::Text(reply)) if response.ok() => Ok(reply.text),
        Ok(RelayReply::Error(reply)) => {
            web_sys::console::error_1(
                &format!(
                    "HTTP request failed with status code {}: {}",
                    reply.error.code.unwrap_or(status),
                    reply.error.message
                )
                .into(),
            );
            Err(ClientError::Relay(reply.error.message))
        }
        _ => Err(ClientError::UnexpectedReply(status)),
    }
}
