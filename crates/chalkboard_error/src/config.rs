//! Configuration error types.

/// Configuration error with source location.
///
/// Raised for missing or invalid credentials, missing provider fields, and
/// unreadable configuration files. Configuration errors are never retried.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use chalkboard_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing required field: apiKey");
    /// assert!(err.message.contains("apiKey"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an error naming a missing field of a provider block.
    #[track_caller]
    pub fn missing_field(block: &str, field: &str) -> Self {
        Self::new(format!("{}.{} is required", block, field))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        "CONFIGURATION_ERROR"
    }
}
