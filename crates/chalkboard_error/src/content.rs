//! Source content error types.

/// Source text contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ContentErrorKind {
    /// Text shorter than the configured minimum
    #[display("Extracted content too short ({} chars). Minimum required: {} chars", length, min)]
    TooShort {
        /// Measured length in characters
        length: usize,
        /// Minimum length
        min: usize,
    },
    /// Text longer than the configured maximum
    #[display("Extracted content too long ({} chars). Maximum allowed: {} chars", length, max)]
    TooLong {
        /// Measured length in characters
        length: usize,
        /// Maximum length
        max: usize,
    },
    /// Source file could not be read
    #[display("Failed to read source: {}", _0)]
    Read(String),
}

/// Content error with location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ContentError, ContentErrorKind};
///
/// let err = ContentError::new(ContentErrorKind::TooShort { length: 12, min: 100 });
/// assert_eq!(err.code(), "CONTENT_TOO_SHORT");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Content Error: {} at line {} in {}", kind, line, file)]
pub struct ContentError {
    /// The kind of error that occurred
    pub kind: ContentErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ContentError {
    /// Create a new content error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self.kind {
            ContentErrorKind::TooShort { .. } => "CONTENT_TOO_SHORT",
            ContentErrorKind::TooLong { .. } => "CONTENT_TOO_LONG",
            ContentErrorKind::Read(_) => "CONTENT_EXTRACTION_FAILED",
        }
    }
}
