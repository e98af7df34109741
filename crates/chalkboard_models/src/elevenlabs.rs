//! Narration providers.

use crate::http::{trim_base, truncate};
use crate::{NarrationConfig, NarrationProvider};
use async_trait::async_trait;
use chalkboard_error::NarrationError;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs text-to-speech client.
#[derive(Debug, Clone)]
pub struct ElevenLabsNarrator {
    client: Client,
    base_url: String,
    api_key: String,
    voice_id: String,
    model_id: String,
    output_format: String,
}

impl ElevenLabsNarrator {
    /// Create a narrator from configuration and an explicit key.
    pub fn new(client: Client, config: &NarrationConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
        }
    }
}

#[async_trait]
impl NarrationProvider for ElevenLabsNarrator {
    #[instrument(skip(self, segments), fields(voice = %self.voice_id, segments = segments.len()))]
    async fn narrate(&self, segments: &[String]) -> Result<Vec<u8>, NarrationError> {
        let script = segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if script.is_empty() {
            return Err(NarrationError::new("no narration text to synthesize", None));
        }

        let url = format!(
            "{}/v1/text-to-speech/{}",
            trim_base(&self.base_url),
            self.voice_id
        );
        let response = self
            .client
            .post(&url)
            .query(&[("output_format", self.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&SpeechRequest {
                text: &script,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Narration request failed");
                NarrationError::new(format!("ElevenLabs request failed: {}", e), None)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "ElevenLabs returned error status");
            return Err(NarrationError::new(
                format!("ElevenLabs API error: {}", truncate(&body, 300)),
                Some(status.as_u16()),
            ));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| NarrationError::new(format!("Failed to read audio: {}", e), None))?;
        info!(bytes = audio.len(), chars = script.len(), "Narration synthesized");
        Ok(audio.to_vec())
    }
}

/// Narrator used when no text-to-speech key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

#[async_trait]
impl NarrationProvider for SilentNarrator {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn narrate(&self, _segments: &[String]) -> Result<Vec<u8>, NarrationError> {
        debug!("Narration disabled; returning empty audio");
        Ok(Vec::new())
    }
}

/// Pick a narrator: a non-empty per-request key wins, then the configured key,
/// otherwise narration is silent.
pub fn narrator_for(
    client: Client,
    config: &NarrationConfig,
    key_override: Option<&str>,
) -> Arc<dyn NarrationProvider> {
    let key = key_override
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or_else(|| Some(config.api_key.trim()).filter(|k| !k.is_empty()));
    match key {
        Some(key) => Arc::new(ElevenLabsNarrator::new(client, config, key)),
        None => {
            info!("No narration key configured; audio will be empty");
            Arc::new(SilentNarrator)
        }
    }
}
