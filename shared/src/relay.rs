//! Wire format of the prediction relay.

use serde::{Deserialize, Serialize};

pub const PREDICT_PATH: &str = "/api/predictImage";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictRequest {
    pub prompt: String,
    /// Base64 PNG without a data-URL prefix.
    #[serde(rename = "imageData")]
    pub image_data: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictResponse {
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: Option<u16>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                code,
            },
        }
    }
}

/// Either body the relay may answer with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RelayReply {
    Text(PredictResponse),
    Error(ErrorResponse),
}

/// Strips a `data:image/png;base64,` prefix if present.
pub fn strip_data_url_prefix(data: &str) -> &str {
    data.strip_prefix(PNG_DATA_URL_PREFIX).unwrap_or(data)
}
