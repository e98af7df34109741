//! Native Gemini REST client (`models/{model}:generateContent`).
//!
//! Text calls request `application/json` output. Image calls set
//! `generationConfig.imageConfig` and read the first inline image part, so
//! image submissions always complete synchronously.

use crate::http::{check_status, download_bytes, read_json, transport_error, trim_base};
use crate::{CompletionRequest, ImageBackend, ImageRequest, Submission, TextGenerator};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_error::{ProviderError, ProviderErrorKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }
}

fn text_part(text: &str) -> Part {
    Part {
        text: Some(text.to_string()),
        inline_data: None,
    }
}

/// Gemini REST client for one model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client on the shared connection pool.
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

    async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            trim_base(&self.base_url),
            self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        read_json(PROVIDER, response).await
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![text_part(&request.system_prompt)],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![text_part(&request.user_prompt)],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(request.temperature),
                max_output_tokens: Some(request.max_tokens),
                response_mime_type: request
                    .json_mode
                    .then(|| "application/json".to_string()),
                image_config: None,
            }),
        };

        let response = self.generate_content(&body).await?;
        let text: String = response
            .parts()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        debug!(chars = text.len(), "Received completion");
        Ok(text)
    }
}

#[async_trait]
impl ImageBackend for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn submit(&self, request: &ImageRequest) -> Result<Submission, ProviderError> {
        let hints = &request.hints;
        let image_config = (hints.aspect_ratio.is_some() || hints.size.is_some()).then(|| {
            ImageConfig {
                aspect_ratio: hints.aspect_ratio.clone(),
                image_size: hints.size.clone(),
            }
        });
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                role: None,
                parts: vec![text_part(&request.prompt)],
            }],
            generation_config: image_config.map(|image_config| GenerationConfig {
                image_config: Some(image_config),
                ..Default::default()
            }),
        };

        let response = self.generate_content(&body).await?;
        let inline = response
            .parts()
            .find_map(|p| p.inline_data.as_ref().filter(|d| !d.data.is_empty()))
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::MissingContent {
                    provider: PROVIDER.to_string(),
                    message: "response contained no inline image data".to_string(),
                })
            })?;

        let bytes = STANDARD.decode(inline.data.as_bytes()).map_err(|e| {
            ProviderError::new(ProviderErrorKind::ResponseParsing {
                provider: PROVIDER.to_string(),
                message: format!("invalid base64 image data: {}", e),
            })
        })?;
        debug!(
            bytes = bytes.len(),
            mime = inline.mime_type.as_deref().unwrap_or("unknown"),
            "Received inline image"
        );
        Ok(Submission::Inline(bytes))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        download_bytes(&self.client, PROVIDER, url).await
    }
}
