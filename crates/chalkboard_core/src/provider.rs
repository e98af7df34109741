//! Provider selection types.
//!
//! Two layers live here:
//! - [`AiProviderConfig`] is the camelCase wire shape a client sends per
//!   request. It may carry several optional provider blocks at once.
//! - [`ProviderSelection`] is the closed union the pipeline works with. Exactly
//!   one variant is active, and conversion from the wire shape reads only the
//!   block named by the `provider` tag.

use chalkboard_error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default image-tool model (standard tier).
pub const DEFAULT_IMAGE_TOOL_MODEL: &str = "nano-banana-image-api";

/// Which backend family serves a request.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum ProviderKind {
    /// Native-SDK provider (Gemini)
    #[default]
    #[serde(rename = "gemini")]
    #[strum(serialize = "gemini")]
    Native,
    /// Any endpoint implementing the OpenAI REST shape
    #[serde(rename = "openaiCompatible")]
    #[strum(serialize = "openai-compatible")]
    OpenAiCompatible,
    /// Asynchronous image-tool REST API (submit / poll / download)
    #[serde(rename = "sjinn")]
    #[strum(serialize = "image-tool")]
    ImageTool,
}

/// Optional image-generation hints.
///
/// OpenAI-compatible providers read `size` as pixel dimensions (`1024x1024`);
/// the image tool reads it as a resolution tier (`1K`, `2K`). Providers that
/// do not understand a hint ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHints {
    /// Size or resolution hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Aspect ratio hint (`16:9`, `1:1`, `auto`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Native-model variant. Key and model fall back to process defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeModelConfig {
    /// API key override
    pub api_key: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Image hints
    pub hints: ImageHints,
}

/// OpenAI-compatible variant. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiCompatibleConfig {
    /// Base URL including the version segment (`https://api.openai.com/v1`)
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Image hints
    pub hints: ImageHints,
}

/// Image-tool variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageToolConfig {
    /// Base URL of the tool API (`https://sjinn.ai`)
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Tool type / model
    pub model: String,
    /// Reference images passed to the tool
    pub image_list: Vec<String>,
    /// Image hints
    pub hints: ImageHints,
}

/// Closed union of provider choices; exactly one is active per request.
///
/// # Examples
///
/// ```
/// use chalkboard_core::{NativeModelConfig, ProviderKind, ProviderSelection};
///
/// let selection = ProviderSelection::Native(NativeModelConfig::default());
/// assert_eq!(selection.kind(), ProviderKind::Native);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum ProviderSelection {
    /// Native-model provider
    Native(NativeModelConfig),
    /// OpenAI-compatible REST provider
    OpenAiCompatible(OpenAiCompatibleConfig),
    /// Asynchronous image-tool provider
    ImageTool(ImageToolConfig),
}

impl ProviderSelection {
    /// Backend family of the active variant.
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderSelection::Native(_) => ProviderKind::Native,
            ProviderSelection::OpenAiCompatible(_) => ProviderKind::OpenAiCompatible,
            ProviderSelection::ImageTool(_) => ProviderKind::ImageTool,
        }
    }

    /// Image hints of the active variant.
    pub fn hints(&self) -> &ImageHints {
        match self {
            ProviderSelection::Native(c) => &c.hints,
            ProviderSelection::OpenAiCompatible(c) => &c.hints,
            ProviderSelection::ImageTool(c) => &c.hints,
        }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::Native(NativeModelConfig::default())
    }
}

/// Wire block for the native provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiBlock {
    /// API key override
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model override
    #[serde(default)]
    pub model: Option<String>,
}

/// Wire block for OpenAI-compatible endpoints.
///
/// Fields are optional on the wire so a missing one can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiBlock {
    /// Base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model
    #[serde(default)]
    pub model: Option<String>,
}

/// Wire block for the image tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SjinnBlock {
    /// Base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Tool type
    #[serde(default)]
    pub model: Option<String>,
    /// Reference images
    #[serde(default)]
    pub image_list: Vec<String>,
}

/// Per-request provider configuration as sent over the wire.
///
/// # Examples
///
/// ```
/// use chalkboard_core::{AiProviderConfig, ProviderSelection};
///
/// let wire: AiProviderConfig = serde_json::from_str(r#"{
///     "provider": "openaiCompatible",
///     "openaiCompatible": {"baseUrl": "https://api.example.com/v1", "apiKey": "sk-1", "model": "gpt-4o"},
///     "gemini": {"apiKey": "ignored"}
/// }"#).unwrap();
///
/// let selection = ProviderSelection::try_from(&wire).unwrap();
/// assert!(matches!(selection, ProviderSelection::OpenAiCompatible(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProviderConfig {
    /// Active provider tag
    #[serde(default)]
    pub provider: ProviderKind,
    /// Native block
    #[serde(default)]
    pub gemini: Option<GeminiBlock>,
    /// OpenAI-compatible block
    #[serde(default)]
    pub openai_compatible: Option<OpenAiBlock>,
    /// Image-tool block
    #[serde(default)]
    pub sjinn: Option<SjinnBlock>,
    /// Size hint
    #[serde(default)]
    pub image_size: Option<String>,
    /// Aspect ratio hint
    #[serde(default)]
    pub image_aspect_ratio: Option<String>,
}

fn required(value: &Option<String>, block: &str, field: &str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::missing_field(block, field)),
    }
}

impl TryFrom<&AiProviderConfig> for ProviderSelection {
    type Error = ConfigError;

    fn try_from(wire: &AiProviderConfig) -> Result<Self, Self::Error> {
        let hints = ImageHints {
            size: wire.image_size.clone(),
            aspect_ratio: wire.image_aspect_ratio.clone(),
        };

        match wire.provider {
            ProviderKind::Native => {
                let block = wire.gemini.clone().unwrap_or_default();
                Ok(ProviderSelection::Native(NativeModelConfig {
                    api_key: block.api_key,
                    model: block.model,
                    hints,
                }))
            }
            ProviderKind::OpenAiCompatible => {
                let block = wire
                    .openai_compatible
                    .as_ref()
                    .ok_or_else(|| ConfigError::new("openaiCompatible block is required"))?;
                Ok(ProviderSelection::OpenAiCompatible(OpenAiCompatibleConfig {
                    base_url: required(&block.base_url, "openaiCompatible", "baseUrl")?,
                    api_key: required(&block.api_key, "openaiCompatible", "apiKey")?,
                    model: required(&block.model, "openaiCompatible", "model")?,
                    hints,
                }))
            }
            ProviderKind::ImageTool => {
                let block = wire
                    .sjinn
                    .as_ref()
                    .ok_or_else(|| ConfigError::new("sjinn block is required"))?;
                Ok(ProviderSelection::ImageTool(ImageToolConfig {
                    base_url: required(&block.base_url, "sjinn", "baseUrl")?,
                    api_key: required(&block.api_key, "sjinn", "apiKey")?,
                    model: block
                        .model
                        .clone()
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_IMAGE_TOOL_MODEL.to_string()),
                    image_list: block.image_list.clone(),
                    hints,
                }))
            }
        }
    }
}

/// Optional per-stage provider configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAgentsConfig {
    /// Topic extraction stage
    #[serde(default)]
    pub librarian: Option<AiProviderConfig>,
    /// Image prompt planning stage
    #[serde(default)]
    pub image_steering: Option<AiProviderConfig>,
    /// Lesson direction stage
    #[serde(default)]
    pub ai_director: Option<AiProviderConfig>,
    /// Image synthesis stage
    #[serde(default)]
    pub image_generation: Option<AiProviderConfig>,
}

impl AiAgentsConfig {
    fn select(config: &Option<AiProviderConfig>) -> Result<Option<ProviderSelection>, ConfigError> {
        config.as_ref().map(ProviderSelection::try_from).transpose()
    }

    /// Selection for topic extraction, if overridden.
    pub fn librarian_selection(&self) -> Result<Option<ProviderSelection>, ConfigError> {
        Self::select(&self.librarian)
    }

    /// Selection for image prompt planning, if overridden.
    pub fn image_steering_selection(&self) -> Result<Option<ProviderSelection>, ConfigError> {
        Self::select(&self.image_steering)
    }

    /// Selection for lesson direction, if overridden.
    pub fn director_selection(&self) -> Result<Option<ProviderSelection>, ConfigError> {
        Self::select(&self.ai_director)
    }

    /// Selection for image synthesis, if overridden.
    pub fn image_generation_selection(&self) -> Result<Option<ProviderSelection>, ConfigError> {
        Self::select(&self.image_generation)
    }
}
