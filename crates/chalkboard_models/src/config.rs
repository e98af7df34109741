//! Layered configuration.
//!
//! Sources, lowest to highest precedence:
//! - Bundled defaults (include_str! from chalkboard.toml)
//! - `~/.config/chalkboard/chalkboard.toml`
//! - `./chalkboard.toml`
//! - Environment variables prefixed `CHALKBOARD__` (e.g. `CHALKBOARD__HTTP__REQUEST_TIMEOUT_SECS`)
//!
//! Provider keys also fall back to the conventional `GEMINI_API_KEY` and
//! `ELEVENLABS_API_KEY` variables when left empty.

use chalkboard_core::{AiProviderConfig, ContentBounds, ProviderDefaults, ProviderKind};
use chalkboard_error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../chalkboard.toml");

/// Process-wide provider defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Native model API key
    #[serde(default)]
    pub gemini_api_key: String,
    /// Default text model
    pub text_model: String,
    /// Default image model
    pub image_model: String,
    /// Default image-tool base URL
    pub image_tool_base_url: String,
    /// Default image-tool model
    pub image_tool_model: String,
}

impl ProvidersConfig {
    /// Defaults handed to the credential resolver.
    pub fn defaults(&self) -> ProviderDefaults {
        ProviderDefaults::new(&self.gemini_api_key, &self.text_model, &self.image_model)
    }

    /// Fill a missing image-tool base URL or model from these defaults.
    ///
    /// The API key is never filled; it must come from the request.
    pub fn fill_image_tool_defaults(&self, wire: &mut AiProviderConfig) {
        if wire.provider != ProviderKind::ImageTool {
            return;
        }
        let block = wire.sjinn.get_or_insert_with(Default::default);
        if block.base_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            block.base_url = Some(self.image_tool_base_url.clone());
        }
        if block.model.as_deref().is_none_or(|m| m.trim().is_empty()) {
            block.model = Some(self.image_tool_model.clone());
        }
    }
}

/// HTTP client timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout
    pub connect_timeout_secs: u64,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

/// Bounded exponential backoff for asynchronous image jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// First wait between polls
    pub initial_interval_ms: u64,
    /// Growth factor per attempt
    pub factor: f64,
    /// Wait cap
    pub max_interval_ms: u64,
    /// Poll attempts before timing out
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 2_000,
            factor: 1.5,
            max_interval_ms: 5_000,
            max_attempts: 25,
        }
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// ElevenLabs API key; empty disables narration
    #[serde(default)]
    pub api_key: String,
    /// Voice identifier
    pub voice_id: String,
    /// Speech model
    pub model_id: String,
    /// API base URL
    pub base_url: String,
    /// Output encoding
    pub output_format: String,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            base_url: "https://api.elevenlabs.io".to_string(),
            output_format: "mp3_44100_128".to_string(),
        }
    }
}

/// Source text length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Minimum characters
    pub min_chars: usize,
    /// Maximum characters
    pub max_chars: usize,
}

impl ContentConfig {
    /// Bounds for [`chalkboard_core::SourceText`].
    pub fn bounds(&self) -> ContentBounds {
        ContentBounds {
            min_chars: self.min_chars,
            max_chars: self.max_chars,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        let bounds = ContentBounds::default();
        Self {
            min_chars: bounds.min_chars,
            max_chars: bounds.max_chars,
        }
    }
}

/// Color-key thresholds on the 0-180 hue / 0-255 saturation and value scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyingConfig {
    /// Highest saturation still counted as white
    pub white_saturation_max: u8,
    /// Lowest value still counted as white
    pub white_value_min: u8,
    /// Protected cool accent hue band, inclusive
    pub cool_hue: [u8; 2],
    /// Protected warm accent hue band, inclusive
    pub warm_hue: [u8; 2],
}

impl Default for KeyingConfig {
    fn default() -> Self {
        Self {
            white_saturation_max: 40,
            white_value_min: 200,
            cool_hue: [80, 100],
            warm_hue: [5, 25],
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```no_run
/// use chalkboard_models::ChalkboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ChalkboardConfig::load()?;
/// println!("text model: {}", config.providers.text_model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChalkboardConfig {
    /// Provider defaults
    pub providers: ProvidersConfig,
    /// HTTP timeouts
    #[serde(default)]
    pub http: HttpConfig,
    /// Image job polling
    #[serde(default)]
    pub polling: PollingConfig,
    /// Narration
    #[serde(default)]
    pub narration: NarrationConfig,
    /// Source text bounds
    #[serde(default)]
    pub content: ContentConfig,
    /// Background keying thresholds
    #[serde(default)]
    pub keying: KeyingConfig,
}

impl ChalkboardConfig {
    /// Load with full precedence (bundled, home, current dir, environment).
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration: env > ./chalkboard.toml > home > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::home_dir() {
            let home_config = config_dir.join(".config/chalkboard/chalkboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("chalkboard").required(false))
            .add_source(
                Environment::with_prefix("CHALKBOARD")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Load bundled defaults overlaid with one explicit file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Parse a TOML string overlaid on bundled defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Fill empty keys from conventional environment variables.
    pub fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.providers.gemini_api_key.trim().is_empty() {
            if let Some(key) = lookup("GEMINI_API_KEY") {
                self.providers.gemini_api_key = key;
            }
        }
        if self.narration.api_key.trim().is_empty() {
            if let Some(key) = lookup("ELEVENLABS_API_KEY") {
                self.narration.api_key = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config = ChalkboardConfig::from_toml_str("").unwrap();
        assert!(!config.providers.text_model.is_empty());
        assert_eq!(config.content.min_chars, 100);
        assert_eq!(config.content.max_chars, 50_000);
        assert_eq!(config.keying.cool_hue, [80, 100]);
    }

    #[test]
    fn image_tool_defaults_fill_gaps_but_not_key() {
        let config = ChalkboardConfig::from_toml_str("").unwrap();
        let mut wire: AiProviderConfig =
            serde_json::from_str(r#"{"provider": "sjinn", "sjinn": {"apiKey": "k"}}"#).unwrap();
        config.providers.fill_image_tool_defaults(&mut wire);

        let block = wire.sjinn.unwrap();
        assert_eq!(block.base_url.as_deref(), Some("https://sjinn.ai"));
        assert_eq!(block.model.as_deref(), Some("nano-banana-image-api"));
        assert_eq!(block.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let config = ChalkboardConfig::from_toml_str(
            r#"
[polling]
initial_interval_ms = 10
factor = 2.0
max_interval_ms = 40
max_attempts = 3
"#,
        )
        .unwrap();
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.http.request_timeout_secs, 120);
    }

    #[test]
    fn env_fallback_only_fills_empty_keys() {
        let mut config = ChalkboardConfig::from_toml_str(
            r#"
[providers]
gemini_api_key = "from-file"
"#,
        )
        .unwrap();
        config.narration.api_key.clear();
        config.apply_env_fallbacks(|name| Some(format!("env-{}", name)));
        assert_eq!(config.providers.gemini_api_key, "from-file");
        assert_eq!(config.narration.api_key, "env-ELEVENLABS_API_KEY");
    }
}
