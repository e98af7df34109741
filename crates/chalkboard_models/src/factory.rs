//! Backend construction from resolved providers.

use crate::{
    GeminiClient, ImageBackend, ImageToolClient, NarrationConfig, NarrationProvider,
    OpenAiCompatibleClient, TextGenerator, narrator_for,
};
use chalkboard_core::{ProviderKind, ResolvedProvider};
use chalkboard_error::ConfigError;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Builds capability objects for resolved providers.
///
/// The pipeline only talks to this trait, so tests can swap in stubs.
pub trait ProviderFactory: Send + Sync {
    /// Text generator for a resolved provider.
    fn text_generator(
        &self,
        resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn TextGenerator>, ConfigError>;

    /// Image backend for a resolved provider.
    fn image_backend(
        &self,
        resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn ImageBackend>, ConfigError>;

    /// Narrator, honoring an optional per-request key.
    fn narrator(&self, key_override: Option<&str>) -> Arc<dyn NarrationProvider>;
}

/// Factory producing HTTP clients on one shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpProviderFactory {
    client: Client,
    narration: NarrationConfig,
}

impl HttpProviderFactory {
    /// Create a factory around a shared client.
    pub fn new(client: Client, narration: NarrationConfig) -> Self {
        Self { client, narration }
    }

    /// The shared client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn text_generator(
        &self,
        resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn TextGenerator>, ConfigError> {
        debug!(kind = %resolved.kind(), model = %resolved.model(), "Building text generator");
        match resolved.kind() {
            ProviderKind::Native => Ok(Arc::new(GeminiClient::new(
                self.client.clone(),
                resolved.base_url(),
                resolved.api_key(),
                resolved.model(),
            ))),
            ProviderKind::OpenAiCompatible => Ok(Arc::new(OpenAiCompatibleClient::new(
                self.client.clone(),
                resolved.base_url(),
                resolved.api_key(),
                resolved.model(),
            ))),
            ProviderKind::ImageTool => Err(ConfigError::new(
                "image-tool provider cannot serve text generation",
            )),
        }
    }

    fn image_backend(
        &self,
        resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn ImageBackend>, ConfigError> {
        debug!(kind = %resolved.kind(), model = %resolved.model(), "Building image backend");
        let backend: Arc<dyn ImageBackend> = match resolved.kind() {
            ProviderKind::Native => Arc::new(GeminiClient::new(
                self.client.clone(),
                resolved.base_url(),
                resolved.api_key(),
                resolved.model(),
            )),
            ProviderKind::OpenAiCompatible => Arc::new(OpenAiCompatibleClient::new(
                self.client.clone(),
                resolved.base_url(),
                resolved.api_key(),
                resolved.model(),
            )),
            ProviderKind::ImageTool => Arc::new(ImageToolClient::new(
                self.client.clone(),
                resolved.base_url(),
                resolved.api_key(),
                resolved.model(),
                resolved.image_list().clone(),
            )),
        };
        Ok(backend)
    }

    fn narrator(&self, key_override: Option<&str>) -> Arc<dyn NarrationProvider> {
        narrator_for(self.client.clone(), &self.narration, key_override)
    }
}
