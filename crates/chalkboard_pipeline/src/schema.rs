//! Output schemas for structured generation.

use serde_json::Value;

/// Why a parsed response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Violation {
    /// Structure, type, bound or domain rule failure
    #[display("{}", _0)]
    Invalid(String),
    /// Wrong number of items
    #[display("expected {} {}, got {}", expected, item, actual)]
    WrongCount {
        /// What was counted
        item: String,
        /// Required count
        expected: usize,
        /// Returned count
        actual: usize,
    },
}

impl Violation {
    /// Shorthand for [`Violation::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Violation::Invalid(message.into())
    }
}

/// A target schema: turns recovered JSON into a checked value.
///
/// Implementations deserialize, check bounds and cross-field rules, and may
/// normalize (assign ids, truncate). Every rejection is retryable.
pub trait OutputSchema: Send + Sync {
    /// Validated output type.
    type Output: Send;

    /// Schema name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Validate and normalize a parsed response.
    fn validate(&self, value: Value) -> Result<Self::Output, Violation>;
}

/// Deserialize into `T`, reporting serde's message as a violation.
pub fn deserialize<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, Violation> {
    serde_json::from_value(value).map_err(|e| Violation::invalid(e.to_string()))
}

/// Reject blank strings.
pub fn require_text(field: &str, value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        Err(Violation::invalid(format!("{} must be non-empty", field)))
    } else {
        Ok(())
    }
}
