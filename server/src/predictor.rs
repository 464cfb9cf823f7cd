use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

pub const DEFAULT_MODEL: &str = "gemini-pro-vision";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const IMAGE_MIME_TYPE: &str = "image/png";

#[async_trait]
pub trait Predictor: Send + Sync {
    /// Raw model text for `prompt` about the base64 PNG `image_data`.
    async fn predict(&self, prompt: &str, image_data: &str) -> Result<String, RelayError>;
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: String,
}

fn generate_request<'a>(prompt: &'a str, image_data: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::Image {
                    inline_data: InlineData {
                        mime_type: IMAGE_MIME_TYPE,
                        data: image_data,
                    },
                },
            ],
        }],
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(response: GenerateResponse) -> Result<String, RelayError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::InvalidResponse("no candidates returned".into()))?;
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

fn upstream_error(status: u16, body: &str) -> RelayError {
    let message = serde_json::from_str::<ProviderError>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| format!("Model provider returned status {status}"));
    RelayError::Upstream { status, message }
}

pub struct GeminiPredictor {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiPredictor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Predictor for GeminiPredictor {
    async fn predict(&self, prompt: &str, image_data: &str) -> Result<String, RelayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(RelayError::MissingApiKey)?;
        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", api_key)])
            .json(&generate_request(prompt, image_data))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(status.as_u16(), &body));
        }
        let parsed = response.json::<GenerateResponse>().await?;
        response_text(parsed)
    }
}
