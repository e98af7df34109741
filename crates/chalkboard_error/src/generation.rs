//! Structured generation (generate → validate → retry) error types.

/// Terminal failure conditions of a structured generation call.
///
/// `EmptyResponse`, `MalformedJson`, `SchemaViolation` and `WrongCount` are
/// the retryable failure classes; they only surface here once the retry
/// budget is exhausted. Each carries the offending raw model text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Provider returned no text
    #[display("{} generation returned an empty response", schema)]
    EmptyResponse {
        /// Target schema name
        schema: String,
    },
    /// Response text could not be parsed as JSON, even after recovery
    #[display("{} generation returned malformed JSON: {}", schema, message)]
    MalformedJson {
        /// Target schema name
        schema: String,
        /// Parser error message
        message: String,
        /// Raw model output
        raw: String,
    },
    /// Parsed JSON violated the target schema or a domain rule
    #[display("{} generation violated its schema: {}", schema, message)]
    SchemaViolation {
        /// Target schema name
        schema: String,
        /// Violation description
        message: String,
        /// Raw model output
        raw: String,
    },
    /// The model returned the wrong number of items
    #[display("Invalid {} count: {}. Expected exactly {}.", item, actual, expected)]
    WrongCount {
        /// What was counted
        item: String,
        /// Required count
        expected: usize,
        /// Count returned by the model
        actual: usize,
        /// Raw model output
        raw: String,
    },
    /// Provider rejected the credentials; never retried
    #[display("Provider API key is invalid or not configured: {}", _0)]
    InvalidCredentials(String),
    /// Provider failed for a non-credential reason
    #[display("Provider call failed: {}", _0)]
    Provider(String),
}

impl GenerationErrorKind {
    /// Offending raw model text, when the failure was caused by model output.
    pub fn raw(&self) -> Option<&str> {
        match self {
            GenerationErrorKind::MalformedJson { raw, .. }
            | GenerationErrorKind::SchemaViolation { raw, .. }
            | GenerationErrorKind::WrongCount { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationErrorKind::EmptyResponse { .. } => "EMPTY_RESPONSE",
            GenerationErrorKind::MalformedJson { .. } => "MALFORMED_JSON",
            GenerationErrorKind::SchemaViolation { .. } => "SCHEMA_VIOLATION",
            GenerationErrorKind::WrongCount { .. } => "INVALID_IMAGE_PROMPT_COUNT",
            GenerationErrorKind::InvalidCredentials(_) => "INVALID_API_KEY",
            GenerationErrorKind::Provider(_) => "PROVIDER_ERROR",
        }
    }
}

/// Structured generation error with attempt count and location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(
///     GenerationErrorKind::EmptyResponse { schema: "topics".to_string() },
///     2,
/// );
/// assert_eq!(err.attempts, 2);
/// assert_eq!(err.kind.code(), "EMPTY_RESPONSE");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} after {} attempt(s) at line {} in {}", kind, attempts, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Total provider calls made before giving up
    pub attempts: u32,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind, attempts: u32) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }
}
