//! Lesson manifest validation error types.

/// Named manifest validation rules.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ManifestErrorKind {
    /// `lessonDurationSec` outside `(0, max]`
    #[display("Lesson duration ({}s) must be greater than 0 and at most {}s", duration, max)]
    Duration {
        /// Declared duration in seconds
        duration: f64,
        /// Maximum allowed duration in seconds
        max: f64,
    },
    /// Scene count outside `[1, max]`
    #[display("Scene count ({}) must be between 1 and {}", count, max)]
    SceneCount {
        /// Number of scenes
        count: usize,
        /// Maximum allowed scenes
        max: usize,
    },
    /// A visual event references a checkpoint absent from the scene's voiceover
    #[display(
        "Checkpoint mismatch in scene {} ({}): event checkpoint IDs {:?} do not exist in voiceover segments",
        scene_number,
        scene_id,
        missing
    )]
    CheckpointMismatch {
        /// 1-based scene position
        scene_number: usize,
        /// Scene identifier
        scene_id: String,
        /// Event checkpoint ids with no voiceover segment, sorted
        missing: Vec<String>,
    },
    /// A visual event references an asset that was not supplied to generation
    #[display("Unknown asset '{}' in scene {} ({})", asset_id, scene_number, scene_id)]
    UnknownAsset {
        /// 1-based scene position
        scene_number: usize,
        /// Scene identifier
        scene_id: String,
        /// Offending asset id
        asset_id: String,
    },
    /// A visual event has an empty asset id
    #[display("Empty asset ID in scene {} ({})", scene_number, scene_id)]
    EmptyAssetId {
        /// 1-based scene position
        scene_number: usize,
        /// Scene identifier
        scene_id: String,
    },
    /// A scene has no voiceover segment with spoken text
    #[display("Scene {} ({}) has no narration text", scene_number, scene_id)]
    SilentScene {
        /// 1-based scene position
        scene_number: usize,
        /// Scene identifier
        scene_id: String,
    },
    /// No scene carries an interaction other than `none`
    #[display("Lesson must contain at least one scene with an interaction type other than 'none'")]
    MissingInteraction,
}

impl ManifestErrorKind {
    /// Short rule name, stable across releases.
    pub fn rule(&self) -> &'static str {
        match self {
            ManifestErrorKind::Duration { .. } => "duration",
            ManifestErrorKind::SceneCount { .. } => "sceneCount",
            ManifestErrorKind::CheckpointMismatch { .. } => "checkpointSubset",
            ManifestErrorKind::UnknownAsset { .. } => "assetReference",
            ManifestErrorKind::EmptyAssetId { .. } => "assetReference",
            ManifestErrorKind::SilentScene { .. } => "narrationCoverage",
            ManifestErrorKind::MissingInteraction => "interactionCoverage",
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ManifestErrorKind::Duration { .. } => "INVALID_LESSON_DURATION",
            ManifestErrorKind::SceneCount { .. } => "INVALID_SCENE_COUNT",
            ManifestErrorKind::CheckpointMismatch { .. } => "CHECKPOINT_MISMATCH",
            ManifestErrorKind::UnknownAsset { .. } | ManifestErrorKind::EmptyAssetId { .. } => {
                "UNKNOWN_ASSET"
            }
            ManifestErrorKind::SilentScene { .. } => "EMPTY_NARRATION",
            ManifestErrorKind::MissingInteraction => "MISSING_INTERACTION",
        }
    }
}

/// Manifest validation error with location tracking.
///
/// # Examples
///
/// ```
/// use chalkboard_error::{ManifestError, ManifestErrorKind};
///
/// let err = ManifestError::new(ManifestErrorKind::MissingInteraction);
/// assert_eq!(err.kind.rule(), "interactionCoverage");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Manifest Error: {} at line {} in {}", kind, line, file)]
pub struct ManifestError {
    /// The violated rule
    pub kind: ManifestErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ManifestError {
    /// Create a new ManifestError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ManifestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
