//! Narration (text-to-speech) error types.

/// Narration provider failure with location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::NarrationError;
///
/// let err = NarrationError::new("ElevenLabs returned HTTP 500", Some(500));
/// assert_eq!(err.status, Some(500));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Narration Error: {} at line {} in {}", message, line, file)]
pub struct NarrationError {
    /// Error message
    pub message: String,
    /// HTTP status, when the provider answered
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NarrationError {
    /// Create a new NarrationError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self.status {
            Some(401) | Some(403) => "INVALID_API_KEY",
            _ => "AUDIO_GENERATION_ERROR",
        }
    }
}
