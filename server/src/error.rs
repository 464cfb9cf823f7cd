use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use curious_ink_shared::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("imageData must not be empty")]
    EmptyImage,
    #[error("Failed to reach the model provider: {0}")]
    Transport(String),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("Unexpected model response: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest { status, .. } => *status,
            RelayError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::EmptyImage => StatusCode::BAD_REQUEST,
            RelayError::Transport(_) | RelayError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RelayError::InvalidResponse(error.to_string())
        } else {
            RelayError::Transport(error.to_string())
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        RelayError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse::new(self.to_string(), Some(status.as_u16()));
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(RelayError::EmptyImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Upstream {
                status: 429,
                message: "quota".into()
            }
            .status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RelayError::Upstream {
                status: 42,
                message: "odd".into()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
