//! Structured generation request.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One structured generation call, as handed to the engine.
///
/// `attempt` is 0 on the first call and 1 on the single retry; every other
/// field is identical between the two.
///
/// # Examples
///
/// ```
/// use chalkboard_core::GenerationRequestBuilder;
///
/// let request = GenerationRequestBuilder::default()
///     .system_prompt("You are a librarian.")
///     .user_payload("Source text")
///     .schema("topics")
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.attempt(), 0);
/// assert_eq!(*request.temperature(), 0.7);
/// let retry = request.next_attempt();
/// assert_eq!(*retry.attempt(), 1);
/// assert_eq!(retry.user_payload(), request.user_payload());
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// System instruction
    system_prompt: String,
    /// User content
    user_payload: String,
    /// Target schema name, used in errors and logs
    schema: String,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
    /// Maximum output tokens
    #[builder(default = "8192")]
    max_output_tokens: u32,
    /// Zero-based attempt counter
    #[builder(default)]
    attempt: u32,
}

impl GenerationRequest {
    /// Request with default sampling settings and a zero attempt counter.
    pub fn new(
        system_prompt: impl Into<String>,
        user_payload: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_payload: user_payload.into(),
            schema: schema.into(),
            temperature: 0.7,
            max_output_tokens: 8192,
            attempt: 0,
        }
    }

    /// Same request with a different temperature.
    pub fn with_temperature(self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self
        }
    }

    /// Copy of this request with the attempt counter incremented.
    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}
