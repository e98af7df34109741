//! Asset synthesis pipeline error types.

/// Stage of the per-asset state machine at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetStage {
    /// Job submission
    #[display("submit")]
    Submit,
    /// Status polling
    #[display("poll")]
    Poll,
    /// Output download
    #[display("download")]
    Download,
    /// Decode and background keying
    #[display("process")]
    Process,
}

/// Asset pipeline failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// The backend rejected or failed the submission
    #[display("Asset {} submission failed: {}", index, message)]
    Submit {
        /// Prompt index
        index: usize,
        /// Error message
        message: String,
    },
    /// A status query failed or the job reported failure
    #[display("Asset {} job failed: {}", index, message)]
    JobFailed {
        /// Prompt index
        index: usize,
        /// Error message
        message: String,
    },
    /// The job did not finish within the polling budget
    #[display("Asset {} timed out after {} polls ({} ms)", index, attempts, waited_ms)]
    Timeout {
        /// Prompt index
        index: usize,
        /// Polls performed
        attempts: u32,
        /// Total time spent waiting
        waited_ms: u64,
    },
    /// Fetching the output bytes failed
    #[display("Asset {} download failed: {}", index, message)]
    Download {
        /// Prompt index
        index: usize,
        /// Error message
        message: String,
    },
    /// Decoding, keying or encoding failed
    #[display("Image processing error for asset {}: {}", index, message)]
    Processing {
        /// Prompt index
        index: usize,
        /// Error message
        message: String,
    },
    /// The backend rejected the credentials
    #[display("Image provider API key is invalid: {}", _0)]
    InvalidCredentials(String),
    /// A worker task panicked or was cancelled
    #[display("Asset {} task aborted: {}", index, message)]
    Aborted {
        /// Prompt index
        index: usize,
        /// Join error message
        message: String,
    },
}

impl AssetErrorKind {
    /// Pipeline stage this failure belongs to.
    pub fn stage(&self) -> AssetStage {
        match self {
            AssetErrorKind::Submit { .. } | AssetErrorKind::InvalidCredentials(_) => {
                AssetStage::Submit
            }
            AssetErrorKind::JobFailed { .. } | AssetErrorKind::Timeout { .. } => AssetStage::Poll,
            AssetErrorKind::Download { .. } => AssetStage::Download,
            AssetErrorKind::Processing { .. } | AssetErrorKind::Aborted { .. } => {
                AssetStage::Process
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AssetErrorKind::Submit { .. } => "ASSET_SUBMIT_FAILED",
            AssetErrorKind::JobFailed { .. } => "ASSET_JOB_FAILED",
            AssetErrorKind::Timeout { .. } => "ASSET_TIMEOUT",
            AssetErrorKind::Download { .. } => "ASSET_DOWNLOAD_FAILED",
            AssetErrorKind::Processing { .. } => "IMAGE_PROCESSING_ERROR",
            AssetErrorKind::InvalidCredentials(_) => "INVALID_API_KEY",
            AssetErrorKind::Aborted { .. } => "ASSET_ABORTED",
        }
    }
}

/// Asset error with location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{AssetError, AssetErrorKind, AssetStage};
///
/// let err = AssetError::new(AssetErrorKind::Timeout { index: 3, attempts: 30, waited_ms: 120_000 });
/// assert_eq!(err.kind.stage(), AssetStage::Poll);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
