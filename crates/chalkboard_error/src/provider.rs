//! Provider (text, image, narration backend) error types and retry classification.

/// Signals in provider error text that indicate a credential problem.
const CREDENTIAL_SIGNALS: &[&str] = &[
    "api key",
    "api_key",
    "apikey",
    "permission",
    "unauthorized",
    "unauthenticated",
    "forbidden",
    "invalid_api_key",
    "api_key_invalid",
];

/// Provider-level error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// The provider rejected the request with an HTTP status
    #[display("{} returned HTTP {}: {}", provider, status, message)]
    Api {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },
    /// Connection or transport failure
    #[display("{} network error: {}", provider, message)]
    Network {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
    /// The request exceeded its timeout
    #[display("{} request timed out", _0)]
    Timeout(String),
    /// The response body could not be decoded
    #[display("{} response could not be parsed: {}", provider, message)]
    ResponseParsing {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
    /// The response was well-formed but missing the expected payload
    #[display("{} response missing content: {}", provider, message)]
    MissingContent {
        /// Provider name
        provider: String,
        /// What was missing
        message: String,
    },
    /// The request could not be built (empty prompt, empty key, ...)
    #[display("Invalid request to {}: {}", provider, message)]
    InvalidRequest {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl ProviderErrorKind {
    /// Whether this error indicates invalid or insufficient credentials.
    ///
    /// Detected from HTTP 401/403 or from key/permission signals in the
    /// provider's error text.
    pub fn is_credential_failure(&self) -> bool {
        let text = match self {
            ProviderErrorKind::Api {
                status, message, ..
            } => {
                if matches!(*status, 401 | 403) {
                    return true;
                }
                message
            }
            ProviderErrorKind::InvalidRequest { message, .. } => message,
            _ => return false,
        };
        let lowered = text.to_lowercase();
        CREDENTIAL_SIGNALS.iter().any(|s| lowered.contains(s))
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        if self.is_credential_failure() {
            return false;
        }
        match self {
            ProviderErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ProviderErrorKind::Network { .. } => true,
            ProviderErrorKind::Timeout(_) => true,
            ProviderErrorKind::ResponseParsing { .. } => true,
            ProviderErrorKind::MissingContent { .. } => true,
            ProviderErrorKind::InvalidRequest { .. } => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Api {
///     provider: "openai-compatible".to_string(),
///     status: 401,
///     message: "Incorrect API key provided".to_string(),
/// });
/// assert!(err.kind.is_credential_failure());
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        if self.kind.is_credential_failure() {
            return "INVALID_API_KEY";
        }
        match self.kind {
            ProviderErrorKind::Api { .. } => "PROVIDER_API_ERROR",
            ProviderErrorKind::Network { .. } => "PROVIDER_NETWORK_ERROR",
            ProviderErrorKind::Timeout(_) => "PROVIDER_TIMEOUT",
            ProviderErrorKind::ResponseParsing { .. } => "PROVIDER_RESPONSE_INVALID",
            ProviderErrorKind::MissingContent { .. } => "PROVIDER_RESPONSE_EMPTY",
            ProviderErrorKind::InvalidRequest { .. } => "PROVIDER_INVALID_REQUEST",
        }
    }
}

/// Trait for errors that support retry classification.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit), or
/// network timeouts return true. Permanent errors like 401 (unauthorized) or
/// 400 (bad request) return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ProviderErrorKind {
        ProviderErrorKind::Api {
            provider: "gemini".to_string(),
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_credential_detection_by_status() {
        assert!(api(401, "nope").is_credential_failure());
        assert!(api(403, "nope").is_credential_failure());
        assert!(!api(500, "boom").is_credential_failure());
    }

    #[test]
    fn test_credential_detection_by_text() {
        assert!(api(400, "API key not valid. Please pass a valid API key.").is_credential_failure());
        assert!(api(400, "PERMISSION_DENIED").is_credential_failure());
        assert!(!api(400, "Invalid JSON payload").is_credential_failure());
    }

    #[test]
    fn test_retry_classification() {
        assert!(api(503, "overloaded").is_retryable());
        assert!(api(429, "slow down").is_retryable());
        assert!(!api(400, "bad request").is_retryable());
        assert!(!api(401, "unauthorized").is_retryable());
        assert!(ProviderErrorKind::Timeout("gemini".to_string()).is_retryable());
    }
}
