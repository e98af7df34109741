//! Credential and model resolution.
//!
//! Turns an optional [`ProviderSelection`] plus process-wide defaults into a
//! concrete [`ResolvedProvider`] that a backend can be built from.

use crate::{ImageHints, ProviderKind, ProviderSelection};
use chalkboard_error::ConfigError;
use derive_getters::Getters;
use tracing::debug;

/// Base URL of the native model REST API.
pub const NATIVE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// What the resolved provider will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ModelPurpose {
    /// Structured text generation
    Text,
    /// Image synthesis
    Image,
}

/// Process-wide defaults for the native provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct ProviderDefaults {
    /// Default native API key
    api_key: String,
    /// Default text model
    text_model: String,
    /// Default image model
    image_model: String,
}

impl ProviderDefaults {
    /// Create defaults from a key and the two model names.
    pub fn new(
        api_key: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        }
    }
}

/// Fully resolved provider, ready for backend construction.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ResolvedProvider {
    #[setters(skip)]
    kind: ProviderKind,
    #[setters(into)]
    base_url: String,
    #[setters(skip)]
    api_key: String,
    #[setters(skip)]
    model: String,
    image_list: Vec<String>,
    hints: ImageHints,
}

impl ResolvedProvider {
    /// Create a resolved provider without image list or hints.
    pub fn new(
        kind: ProviderKind,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            image_list: Vec::new(),
            hints: ImageHints::default(),
        }
    }
}

/// Resolve a selection against the defaults for a given purpose.
///
/// An absent selection means the native provider with default key and model.
/// Native key and model overrides win when present and non-empty.
///
/// # Errors
///
/// Returns [`ConfigError`] when the effective key is empty, when an
/// OpenAI-compatible field is empty, or when the image tool is asked to
/// produce text.
///
/// # Examples
///
/// ```
/// use chalkboard_core::{ModelPurpose, ProviderDefaults, resolve_provider};
///
/// let defaults = ProviderDefaults::new("key-1", "gemini-2.5-flash", "gemini-2.5-flash-image");
/// let resolved = resolve_provider(None, &defaults, ModelPurpose::Image).unwrap();
/// assert_eq!(resolved.model(), "gemini-2.5-flash-image");
/// assert_eq!(resolved.api_key(), "key-1");
/// ```
pub fn resolve_provider(
    selection: Option<&ProviderSelection>,
    defaults: &ProviderDefaults,
    purpose: ModelPurpose,
) -> Result<ResolvedProvider, ConfigError> {
    let fallback = ProviderSelection::default();
    let selection = selection.unwrap_or(&fallback);

    let resolved = match selection {
        ProviderSelection::Native(native) => {
            let api_key = non_empty(native.api_key.as_deref())
                .unwrap_or(defaults.api_key.trim())
                .to_string();
            if api_key.is_empty() {
                return Err(ConfigError::missing_field("gemini", "apiKey"));
            }
            let default_model = match purpose {
                ModelPurpose::Text => &defaults.text_model,
                ModelPurpose::Image => &defaults.image_model,
            };
            let model = non_empty(native.model.as_deref())
                .unwrap_or(default_model.trim())
                .to_string();
            if model.is_empty() {
                return Err(ConfigError::missing_field("gemini", "model"));
            }
            ResolvedProvider {
                kind: ProviderKind::Native,
                base_url: NATIVE_BASE_URL.to_string(),
                api_key,
                model,
                image_list: Vec::new(),
                hints: native.hints.clone(),
            }
        }
        ProviderSelection::OpenAiCompatible(cfg) => ResolvedProvider {
            kind: ProviderKind::OpenAiCompatible,
            base_url: require(&cfg.base_url, "openaiCompatible", "baseUrl")?,
            api_key: require(&cfg.api_key, "openaiCompatible", "apiKey")?,
            model: require(&cfg.model, "openaiCompatible", "model")?,
            image_list: Vec::new(),
            hints: cfg.hints.clone(),
        },
        ProviderSelection::ImageTool(cfg) => {
            if purpose == ModelPurpose::Text {
                return Err(ConfigError::new(
                    "image-tool provider cannot serve text generation",
                ));
            }
            ResolvedProvider {
                kind: ProviderKind::ImageTool,
                base_url: require(&cfg.base_url, "sjinn", "baseUrl")?,
                api_key: require(&cfg.api_key, "sjinn", "apiKey")?,
                model: non_empty(Some(&cfg.model))
                    .unwrap_or(crate::DEFAULT_IMAGE_TOOL_MODEL)
                    .to_string(),
                image_list: cfg.image_list.clone(),
                hints: cfg.hints.clone(),
            }
        }
    };

    debug!(
        kind = %resolved.kind,
        model = %resolved.model,
        purpose = %purpose,
        "Resolved provider"
    );
    Ok(resolved)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require(value: &str, block: &str, field: &str) -> Result<String, ConfigError> {
    non_empty(Some(value))
        .map(str::to_string)
        .ok_or_else(|| ConfigError::missing_field(block, field))
}
