//! Generate, validate, retry.
//!
//! One call chain is at most `1 + MAX_RETRIES` provider calls. Each attempt
//! dispatches the identical request; only the attempt counter changes, so the
//! model's own nondeterminism is what repairs a bad response.

use crate::extract_json;
use crate::schema::{OutputSchema, Violation};
use chalkboard_core::GenerationRequest;
use chalkboard_error::{GenerationError, GenerationErrorKind, RetryableError};
use chalkboard_models::{CompletionRequest, TextGenerator};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Extra attempts allowed after the first.
pub const MAX_RETRIES: u32 = 1;

/// Outcome of a single attempt.
#[derive(Debug)]
enum AttemptFailure {
    /// Worth one more try, budget permitting
    Retryable(GenerationErrorKind),
    /// Report immediately
    Fatal(GenerationErrorKind),
}

/// Structured generation engine.
///
/// Stateless; one instance can serve every stage and request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationEngine;

impl GenerationEngine {
    /// Create an engine.
    pub fn new() -> Self {
        Self
    }

    /// Run `request` against `generator` until `schema` accepts the output or
    /// the retry budget is spent.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` at once when the provider rejects the key
    /// - `Provider` at once for other non-retryable provider failures
    /// - `EmptyResponse`, `MalformedJson`, `SchemaViolation`, `WrongCount` or
    ///   `Provider` after the retry is also spent
    #[instrument(
        skip_all,
        fields(schema = schema.name(), provider = generator.provider_name(), model = generator.model_name())
    )]
    pub async fn generate<S: OutputSchema>(
        &self,
        generator: &dyn TextGenerator,
        request: GenerationRequest,
        schema: &S,
    ) -> Result<S::Output, GenerationError> {
        let mut request = request;
        loop {
            let attempt = *request.attempt();
            let started = Instant::now();
            let outcome = self.attempt(generator, &request, schema).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(output) => {
                    info!(attempt, elapsed_ms, "Structured generation succeeded");
                    return Ok(output);
                }
                Err(AttemptFailure::Fatal(kind)) => {
                    error!(attempt, elapsed_ms, error = %kind, "Structured generation failed");
                    return Err(GenerationError::new(kind, attempt + 1));
                }
                Err(AttemptFailure::Retryable(kind)) if attempt < MAX_RETRIES => {
                    warn!(attempt, elapsed_ms, error = %kind, "Retrying structured generation");
                    request = request.next_attempt();
                }
                Err(AttemptFailure::Retryable(kind)) => {
                    error!(
                        attempt,
                        elapsed_ms,
                        error = %kind,
                        "Structured generation failed after retry"
                    );
                    return Err(GenerationError::new(kind, attempt + 1));
                }
            }
        }
    }

    async fn attempt<S: OutputSchema>(
        &self,
        generator: &dyn TextGenerator,
        request: &GenerationRequest,
        schema: &S,
    ) -> Result<S::Output, AttemptFailure> {
        let name = schema.name().to_string();
        let completion = CompletionRequest::from(request);

        let text = match generator.complete(&completion).await {
            Ok(text) => text,
            Err(e) if e.kind.is_credential_failure() => {
                return Err(AttemptFailure::Fatal(
                    GenerationErrorKind::InvalidCredentials(e.kind.to_string()),
                ));
            }
            Err(e) if e.is_retryable() => {
                return Err(AttemptFailure::Retryable(GenerationErrorKind::Provider(
                    e.kind.to_string(),
                )));
            }
            Err(e) => {
                return Err(AttemptFailure::Fatal(GenerationErrorKind::Provider(
                    e.kind.to_string(),
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(AttemptFailure::Retryable(
                GenerationErrorKind::EmptyResponse { schema: name },
            ));
        }
        debug!(chars = text.len(), "Received model text");

        let value = extract_json(&text).map_err(|message| {
            AttemptFailure::Retryable(GenerationErrorKind::MalformedJson {
                schema: name.clone(),
                message,
                raw: text.clone(),
            })
        })?;

        schema.validate(value).map_err(|violation| {
            AttemptFailure::Retryable(match violation {
                Violation::Invalid(message) => GenerationErrorKind::SchemaViolation {
                    schema: name.clone(),
                    message,
                    raw: text.clone(),
                },
                Violation::WrongCount {
                    item,
                    expected,
                    actual,
                } => GenerationErrorKind::WrongCount {
                    item,
                    expected,
                    actual,
                    raw: text.clone(),
                },
            })
        })
    }
}
