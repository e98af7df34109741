//! Error types for the Chalkboard library.
//!
//! This crate provides the foundation error types used throughout the Chalkboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Every kind also exposes a stable machine-readable `code()` so callers at the
//! HTTP or CLI boundary can report failures without matching on display text.
//!
//! # Examples
//!
//! ```
//! use chalkboard_error::{ChalkboardResult, ConfigError};
//!
//! fn load() -> ChalkboardResult<String> {
//!     Err(ConfigError::new("openaiCompatible.baseUrl is required"))?
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(err.code(), "CONFIGURATION_ERROR");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod content;
mod error;
mod generation;
mod io;
mod manifest;
mod narration;
mod provider;
mod reconcile;

pub use asset::{AssetError, AssetErrorKind, AssetStage};
pub use config::ConfigError;
pub use content::{ContentError, ContentErrorKind};
pub use error::{ChalkboardError, ChalkboardErrorKind, ChalkboardResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use io::IoError;
pub use manifest::{ManifestError, ManifestErrorKind};
pub use narration::NarrationError;
pub use provider::{ProviderError, ProviderErrorKind, RetryableError};
pub use reconcile::{ReconcileError, ReconcileErrorKind};
