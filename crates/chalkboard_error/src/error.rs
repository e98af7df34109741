//! Top-level error wrapper types.

use crate::{
    AssetError, ConfigError, ContentError, GenerationError, IoError, ManifestError,
    NarrationError, ProviderError, ReconcileError,
};

/// Every error condition the Chalkboard pipeline can surface.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ChalkboardError, IoError};
///
/// let io_err = IoError::new("out/manifest.json: permission denied");
/// let err: ChalkboardError = io_err.into();
/// assert!(format!("{}", err).contains("I/O Error"));
/// assert_eq!(err.code(), "IO_ERROR");
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ChalkboardErrorKind {
    /// Local file I/O error
    #[from(IoError)]
    Io(IoError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Source content error
    #[from(ContentError)]
    Content(ContentError),
    /// Provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Structured generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Manifest validation error
    #[from(ManifestError)]
    Manifest(ManifestError),
    /// Asset pipeline error
    #[from(AssetError)]
    Asset(AssetError),
    /// Narration error
    #[from(NarrationError)]
    Narration(NarrationError),
    /// Duration reconciliation error
    #[from(ReconcileError)]
    Reconcile(ReconcileError),
}

/// Chalkboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ChalkboardResult, ConfigError};
///
/// fn might_fail() -> ChalkboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Chalkboard Error: {}", _0)]
pub struct ChalkboardError(Box<ChalkboardErrorKind>);

impl ChalkboardError {
    /// Create a new error from a kind.
    pub fn new(kind: ChalkboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ChalkboardErrorKind {
        &self.0
    }

    /// Stable machine-readable code of the underlying error.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ChalkboardErrorKind::Io(e) => e.code(),
            ChalkboardErrorKind::Config(e) => e.code(),
            ChalkboardErrorKind::Content(e) => e.code(),
            ChalkboardErrorKind::Provider(e) => e.code(),
            ChalkboardErrorKind::Generation(e) => e.kind.code(),
            ChalkboardErrorKind::Manifest(e) => e.kind.code(),
            ChalkboardErrorKind::Asset(e) => e.kind.code(),
            ChalkboardErrorKind::Narration(e) => e.code(),
            ChalkboardErrorKind::Reconcile(e) => e.code(),
        }
    }
}

// Generic From implementation for any type that converts to ChalkboardErrorKind
impl<T> From<T> for ChalkboardError
where
    T: Into<ChalkboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Chalkboard operations.
pub type ChalkboardResult<T> = std::result::Result<T, ChalkboardError>;
