//! Audio duration reconciliation error types.

/// Reconciliation failure conditions.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ReconcileErrorKind {
    /// Narration is longer than the manifest allows
    #[display(
        "Narration audio ({:.2}s) exceeds planned duration ({:.2}s) beyond tolerance ({:.2}s)",
        actual,
        declared,
        tolerance
    )]
    AudioTooLong {
        /// Measured audio duration in seconds
        actual: f64,
        /// Manifest duration in seconds
        declared: f64,
        /// Allowed overshoot in seconds
        tolerance: f64,
    },
    /// Audio container metadata could not be read
    #[display("Failed to measure audio duration: {}", _0)]
    Probe(String),
}

/// Reconciliation error with location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ReconcileError, ReconcileErrorKind};
///
/// let err = ReconcileError::new(ReconcileErrorKind::AudioTooLong {
///     actual: 111.0,
///     declared: 100.0,
///     tolerance: 10.0,
/// });
/// assert_eq!(err.code(), "AUDIO_TOO_LONG");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reconcile Error: {} at line {} in {}", kind, line, file)]
pub struct ReconcileError {
    /// The kind of error that occurred
    pub kind: ReconcileErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ReconcileError {
    /// Create a new reconcile error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ReconcileErrorKind) -> Self {
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
            ReconcileErrorKind::AudioTooLong { .. } => "AUDIO_TOO_LONG",
            ReconcileErrorKind::Probe(_) => "AUDIO_PROBE_FAILED",
        }
    }
}
