//! Local I/O error types.

/// File system error with source location.
///
/// Raised when reading inputs or writing lesson artifacts.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("I/O Error: {} at line {} in {}", message, line, file)]
pub struct IoError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IoError {
    /// Create a new IoError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use chalkboard_error::IoError;
    ///
    /// let err = IoError::new("out/manifest.json: permission denied");
    /// assert!(err.message.contains("permission denied"));
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

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        "IO_ERROR"
    }
}
