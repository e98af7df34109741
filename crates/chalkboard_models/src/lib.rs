//! Provider clients for Chalkboard.
//!
//! Every backend implements one or more capability traits:
//!
//! - [`TextGenerator`] - Gemini REST and OpenAI-compatible chat completions
//! - [`ImageBackend`] - Gemini inline images, OpenAI-compatible images, and the
//!   asynchronous image tool (submit / poll / download)
//! - [`NarrationProvider`] - ElevenLabs, or silence when no key is configured
//!
//! All clients share one `reqwest::Client` built from [`HttpConfig`], and are
//! constructed through a [`ProviderFactory`].
//!
//! # Example
//!
//! ```no_run
//! use chalkboard_core::{ModelPurpose, resolve_provider};
//! use chalkboard_models::{
//!     ChalkboardConfig, CompletionRequest, HttpProviderFactory, ProviderFactory, build_client,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ChalkboardConfig::load()?;
//! let factory = HttpProviderFactory::new(build_client(&config.http)?, config.narration.clone());
//! let resolved = resolve_provider(None, &config.providers.defaults(), ModelPurpose::Text)?;
//! let generator = factory.text_generator(&resolved)?;
//!
//! let text = generator
//!     .complete(&CompletionRequest {
//!         system_prompt: "Reply with JSON.".into(),
//!         user_prompt: "{\"ping\": true}".into(),
//!         json_mode: true,
//!         temperature: 0.2,
//!         max_tokens: 256,
//!     })
//!     .await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod elevenlabs;
mod factory;
mod gemini;
mod http;
mod image_tool;
mod openai_compat;
mod traits;

pub use config::{
    ChalkboardConfig, ContentConfig, HttpConfig, KeyingConfig, NarrationConfig, PollingConfig,
    ProvidersConfig,
};
pub use elevenlabs::{ElevenLabsNarrator, SilentNarrator, narrator_for};
pub use factory::{HttpProviderFactory, ProviderFactory};
pub use gemini::GeminiClient;
pub use http::build_client;
pub use image_tool::{ImageToolClient, PRO_TOOL_MODEL, estimated_credits};
pub use openai_compat::OpenAiCompatibleClient;
pub use traits::{
    CompletionRequest, ImageBackend, ImageRequest, JobHandle, JobStatus, NarrationProvider,
    Submission, TextGenerator,
};
