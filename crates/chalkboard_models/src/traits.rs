//! Capability traits implemented by provider clients.
//!
//! Backends are hidden behind three small traits so that the generation
//! engine and the asset pipeline never branch on provider kind.

use async_trait::async_trait;
use chalkboard_core::{GenerationRequest, ImageHints};
use chalkboard_error::{NarrationError, ProviderError, ProviderErrorKind};

/// Provider-agnostic text completion input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system_prompt: String,
    /// User prompt
    pub user_prompt: String,
    /// Ask for a JSON response where the backend supports it
    pub json_mode: bool,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
}

impl From<&GenerationRequest> for CompletionRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            system_prompt: request.system_prompt().clone(),
            user_prompt: request.user_payload().clone(),
            json_mode: true,
            temperature: *request.temperature(),
            max_tokens: *request.max_output_tokens(),
        }
    }
}

/// Text completion capability.
///
/// Implementations return the raw model text, which may be empty. Deciding
/// whether empty text is a failure is the caller's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name for logs and errors.
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;

    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// One image synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Prompt text
    pub prompt: String,
    /// Size and aspect hints
    pub hints: ImageHints,
}

/// Opaque handle for an asynchronous image job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}", _0)]
pub struct JobHandle(pub String);

/// Result of submitting an image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Image bytes returned synchronously
    Inline(Vec<u8>),
    /// Image is ready at a location; no polling needed
    Ready(String),
    /// Asynchronous job that must be polled
    Job(JobHandle),
}

/// Status of an asynchronous image job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still running
    Pending,
    /// Finished; image available at `output_url`
    Succeeded {
        /// Location of the image
        output_url: String,
    },
    /// Finished unsuccessfully
    Failed(String),
}

/// Image synthesis capability.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Short provider name for logs and errors.
    fn provider_name(&self) -> &'static str;

    /// Submit a prompt.
    async fn submit(&self, request: &ImageRequest) -> Result<Submission, ProviderError>;

    /// Query an asynchronous job.
    ///
    /// Backends that never return [`Submission::Job`] keep the default.
    async fn poll(&self, job: &JobHandle) -> Result<JobStatus, ProviderError> {
        Err(ProviderError::new(ProviderErrorKind::InvalidRequest {
            provider: self.provider_name().to_string(),
            message: format!("job polling is not supported (job {})", job),
        }))
    }

    /// Fetch image bytes from an output location.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Narration (text-to-speech) capability.
#[async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Whether this provider actually produces audio.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Synthesize ordered narration segments into one audio payload.
    ///
    /// An empty result means narration is unavailable and is not an error.
    async fn narrate(&self, segments: &[String]) -> Result<Vec<u8>, NarrationError>;
}
