//! OpenAI-compatible vision backend.
//!
//! Works with any endpoint speaking the chat-completions protocol that
//! accepts image content parts (OpenAI cloud, Azure OpenAI, Ollama in
//! compatibility mode, vLLM).

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use platelog_core::defaults::{
    ENV_OPENAI_API_KEY, ENV_OPENAI_BASE_URL, ENV_OPENAI_TIMEOUT, ENV_OPENAI_VISION_MODEL,
    OPENAI_URL, VISION_MODEL, VISION_TIMEOUT_SECS,
};
use platelog_core::{Error, Result};

use crate::vision::VisionBackend;

/// Instruction sent with every capture. The model is asked for the plate
/// alone; chatty replies are cleaned up by normalization anyway.
const PLATE_PROMPT: &str = "Extract only the text of the vehicle license plate visible in this \
     image. Return just the plate, with no additional text, comments, or extra symbols.";

/// Configuration for the OpenAI-compatible vision backend.
#[derive(Debug, Clone)]
pub struct OpenAiVisionConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Vision-capable model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// OpenAI-compatible vision backend.
pub struct OpenAiVisionBackend {
    client: Client,
    config: OpenAiVisionConfig,
}

impl OpenAiVisionBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAiVisionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing vision backend: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    /// Returns `None` when `OPENAI_API_KEY` is not set (remote tier disabled).
    pub fn from_env() -> Result<Option<Self>> {
        let api_key = match std::env::var(ENV_OPENAI_API_KEY) {
            Ok(key) if !key.is_empty() => key,
            _ => return Ok(None),
        };

        let config = OpenAiVisionConfig {
            base_url: std::env::var(ENV_OPENAI_BASE_URL).unwrap_or_else(|_| OPENAI_URL.to_string()),
            api_key,
            model: std::env::var(ENV_OPENAI_VISION_MODEL)
                .unwrap_or_else(|_| VISION_MODEL.to_string()),
            timeout_seconds: std::env::var(ENV_OPENAI_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(VISION_TIMEOUT_SECS),
        };

        Self::new(config).map(Some)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAiVisionConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl VisionBackend for OpenAiVisionBackend {
    async fn read_plate(&self, image_data: &[u8], mime_type: &str) -> Result<String> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_data);
        let data_url = format!("data:{};base64,{}", mime_type, image_b64);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: PLATE_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: Some(50),
        };

        debug!(
            model = %self.config.model,
            image_bytes = image_data.len(),
            "Sending plate-read request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_timeout() || e.is_connect() {
                    VisionErrorCode::Network
                } else {
                    VisionErrorCode::Unknown
                };
                warn!(code = ?code, "Vision request failed: {}", e);
                Error::Vision(format!("{:?}: {}", code, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAiErrorResponse = response.json().await.unwrap_or_default();
            let code = VisionErrorCode::from_response(status.as_u16(), &body.error.error_type);
            warn!(
                code = ?code,
                %status,
                "Vision API rejected plate-read: {}",
                body.error.message
            );
            return Err(Error::Vision(format!(
                "{:?}: API returned {}: {}",
                code, status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response.json().await.map_err(|e| {
            warn!(code = ?VisionErrorCode::MalformedResponse, "Bad vision response: {}", e);
            Error::Vision(format!(
                "{:?}: failed to parse response: {}",
                VisionErrorCode::MalformedResponse,
                e
            ))
        })?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(reply_len = content.len(), "Vision reply received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Failure classification for the remote tier, surfaced in logs. Every code
/// degrades to the local tier; none blocks record creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionErrorCode {
    /// Invalid authentication credentials.
    Authentication,
    /// Rate limit exceeded.
    RateLimit,
    /// Model not found or not available.
    ModelNotFound,
    /// Server-side error.
    Server,
    /// Connection or timeout failure before any response.
    Network,
    /// Response body did not match the expected shape.
    MalformedResponse,
    /// Unknown error.
    Unknown,
}

impl VisionErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401 | 403, _) => Self::Authentication,
            (429, _) => Self::RateLimit,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (500..=599, _) => Self::Server,
            _ => Self::Unknown,
        }
    }
}

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiErrorResponse {
    #[serde(default)]
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: String,
}

impl Default for OpenAiError {
    fn default() -> Self {
        Self {
            message: "Unknown error".to_string(),
            error_type: "unknown".to_string(),
        }
    }
}
