//! Client for any endpoint implementing the OpenAI REST shape.
//!
//! Uses `POST {base}/chat/completions` for text and
//! `POST {base}/images/generations` for images.

use crate::http::{check_status, download_bytes, read_json, transport_error, trim_base};
use crate::{CompletionRequest, ImageBackend, ImageRequest, Submission, TextGenerator};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_error::{ProviderError, ProviderErrorKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "openai-compatible";
const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    response_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// OpenAI-compatible client for one base URL, key and model.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleClient {
    /// Create a client on the shared connection pool.
    ///
    /// `base_url` should include the version segment (`https://api.openai.com/v1`).
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}{}", trim_base(&self.base_url), path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        check_status(PROVIDER, response).await
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self.post("/chat/completions", &body).await?;
        let parsed: ChatResponse = read_json(PROVIDER, response).await?;
        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::MissingContent {
                provider: PROVIDER.to_string(),
                message: "response missing choices".to_string(),
            })
        })?;
        let text = choice.message.content.unwrap_or_default();
        debug!(chars = text.len(), "Received completion");
        Ok(text)
    }
}

#[async_trait]
impl ImageBackend for OpenAiCompatibleClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn submit(&self, request: &ImageRequest) -> Result<Submission, ProviderError> {
        let body = ImagesRequest {
            model: &self.model,
            prompt: &request.prompt,
            size: request.hints.size.as_deref().unwrap_or(DEFAULT_IMAGE_SIZE),
            response_format: "b64_json",
            aspect_ratio: request.hints.aspect_ratio.as_deref(),
        };

        let response = self.post("/images/generations", &body).await?;
        let parsed: ImagesResponse = read_json(PROVIDER, response).await?;
        let missing = || {
            ProviderError::new(ProviderErrorKind::MissingContent {
                provider: PROVIDER.to_string(),
                message: "images response contained neither b64_json nor url".to_string(),
            })
        };
        let datum = parsed.data.into_iter().next().ok_or_else(missing)?;

        if let Some(b64) = datum.b64_json.filter(|s| !s.is_empty()) {
            let bytes = STANDARD.decode(b64.as_bytes()).map_err(|e| {
                ProviderError::new(ProviderErrorKind::ResponseParsing {
                    provider: PROVIDER.to_string(),
                    message: format!("invalid base64 image data: {}", e),
                })
            })?;
            return Ok(Submission::Inline(bytes));
        }
        match datum.url.filter(|s| !s.is_empty()) {
            Some(url) => Ok(Submission::Ready(url)),
            None => Err(missing()),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        download_bytes(&self.client, PROVIDER, url).await
    }
}
