use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use curious_ink_shared::relay::strip_data_url_prefix;
use curious_ink_shared::{PredictRequest, PredictResponse};

use crate::error::RelayError;
use crate::state::AppState;

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn message_handler() -> &'static str {
    "Hello from the relay!"
}

pub async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, RelayError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(%rejection, "Rejected prediction request");
        RelayError::from(rejection)
    })?;
    let image_data = strip_data_url_prefix(request.image_data.trim());
    if image_data.is_empty() {
        return Err(RelayError::EmptyImage);
    }
    tracing::info!(
        prompt_len = request.prompt.len(),
        image_len = image_data.len(),
        "Relaying prediction request"
    );
    match state.predictor.predict(&request.prompt, image_data).await {
        Ok(text) => {
            tracing::info!(text_len = text.len(), "Prediction complete");
            Ok(Json(PredictResponse { text }))
        }
        Err(error) => {
            tracing::warn!(%error, status = %error.status(), "Prediction failed");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use curious_ink_shared::relay::PREDICT_PATH;
    use curious_ink_shared::{ErrorResponse, PredictResponse};
    use tower::ServiceExt;

    use crate::build_router;
    use crate::error::RelayError;
    use crate::predictor::Predictor;
    use crate::state::AppState;

    #[derive(Default)]
    struct Recorded {
        calls: Mutex<Vec<(String, String)>>,
    }

    struct EchoPredictor(std::sync::Arc<Recorded>);

    #[async_trait]
    impl Predictor for EchoPredictor {
        async fn predict(&self, prompt: &str, image_data: &str) -> Result<String, RelayError> {
            self.0
                .calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), image_data.to_string()));
            Ok(format!("```json\n[\"{prompt}\"]\n```"))
        }
    }

    struct FailingPredictor;

    #[async_trait]
    impl Predictor for FailingPredictor {
        async fn predict(&self, _: &str, _: &str) -> Result<String, RelayError> {
            Err(RelayError::Upstream {
                status: 429,
                message: "Resource has been exhausted".into(),
            })
        }
    }

    fn router(predictor: impl Predictor + 'static) -> Router {
        build_router(
            AppState::new(predictor),
            PathBuf::from("/nonexistent-public-dir"),
        )
    }

    fn predict_request(body: &str) -> Request<Body> {
        Request::post(PREDICT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn relays_text_from_predictor() {
        let recorded = std::sync::Arc::new(Recorded::default());
        let app = router(EchoPredictor(recorded.clone()));
        let response = app
            .oneshot(predict_request(
                r#"{"prompt":"cat","imageData":"data:image/png;base64,AAAA"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PredictResponse = body_json(response).await;
        assert_eq!(body.text, "```json\n[\"cat\"]\n```");
        assert_eq!(
            *recorded.calls.lock().unwrap(),
            vec![("cat".to_string(), "AAAA".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let recorded = std::sync::Arc::new(Recorded::default());
        let app = router(EchoPredictor(recorded.clone()));
        let response = app
            .oneshot(predict_request(r#"{"prompt":"cat","imageData":"  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error.message, "imageData must not be empty");
        assert_eq!(body.error.code, Some(400));
        assert!(recorded.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn predictor_failure_becomes_error_body() {
        let response = router(FailingPredictor)
            .oneshot(predict_request(r#"{"prompt":"cat","imageData":"AAAA"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error.message, "Resource has been exhausted");
        assert_eq!(body.error.code, Some(429));
    }

    #[tokio::test]
    async fn missing_field_is_a_json_error() {
        let response = router(FailingPredictor)
            .oneshot(predict_request(r#"{"prompt":"cat"}"#))
            .await
            .unwrap();
        let status = response.status();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body: ErrorResponse = body_json(response).await;
        assert!(body.error.message.contains("imageData"));
        assert_eq!(body.error.code, Some(status.as_u16()));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_json_error() {
        let response = router(FailingPredictor)
            .oneshot(predict_request("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error.code, Some(400));
    }

    #[tokio::test]
    async fn message_and_ping_routes() {
        let app = router(FailingPredictor);
        let response = app
            .clone()
            .oneshot(Request::get("/message").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Hello from the relay!");

        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
