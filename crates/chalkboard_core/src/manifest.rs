//! Lesson manifest data model.
//!
//! All types serialize with camelCase keys. The manifest is produced by the
//! lesson director and checked by [`crate::validate_manifest`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of visual instruction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum VisualEventType {
    /// Stroke-by-stroke draw-on
    Draw,
    /// Fade the asset in
    FadeIn,
    /// Emphasize an asset already on screen
    Highlight,
    /// Reposition an asset
    Move,
    /// Hold the frame
    Pause,
    /// Quiz overlay
    Quiz,
}

/// Semantic screen region.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Zone {
    /// Main central area
    CenterMain,
    /// Left supporting column
    LeftSupport,
    /// Right notes column
    RightNotes,
    /// Header strip
    TopHeader,
    /// Footer strip
    BottomContext,
}

/// Semantic role of a visual.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum VisualRole {
    /// Main diagram of the scene
    PrimaryDiagram,
    /// Secondary diagram
    SupportingDiagram,
    /// Small illustrative prop
    Prop,
    /// Icon
    Icon,
}

/// Relative size hint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ScaleHint {
    /// Large
    Large,
    /// Medium
    Medium,
    /// Small
    Small,
}

/// Interaction kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum InteractionType {
    /// Multiple-choice question
    Quiz,
    /// Reflective pause
    PauseAndThink,
    /// Predict a diagram label
    LabelPrediction,
    /// No interaction
    #[default]
    None,
}

/// One narration segment tied to a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceoverSegment {
    /// Narration text
    pub text: String,
    /// Synchronization checkpoint
    pub checkpoint_id: String,
}

/// Instruction to show or animate an asset at a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEvent {
    /// Event kind
    #[serde(rename = "type")]
    pub kind: VisualEventType,
    /// Positional asset identifier (`asset_0` ..)
    pub asset_id: String,
    /// Checkpoint this event fires on
    pub checkpoint_id: String,
    /// Target zone
    pub zone: Zone,
    /// Semantic role
    pub role: VisualRole,
    /// Size hint
    pub scale_hint: ScaleHint,
    /// Event-specific parameters
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Interactive element of a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Interaction kind
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// Prompt shown to the learner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Answer options
    #[serde(default)]
    pub options: Vec<String>,
    /// Correct answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl Interaction {
    /// Whether this is a real interaction (anything but `none`).
    pub fn is_active(&self) -> bool {
        self.kind != InteractionType::None
    }
}

/// One instructional beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene identifier
    pub scene_id: String,
    /// Teaching purpose
    pub purpose: String,
    /// Assets shown in this scene
    #[serde(default)]
    pub assets_used: Vec<String>,
    /// Narration segments in playback order
    pub voiceover: Vec<VoiceoverSegment>,
    /// Visual events
    pub events: Vec<VisualEvent>,
    /// The scene's interaction
    pub interaction: Interaction,
}

/// A complete lesson plan.
///
/// # Examples
///
/// ```
/// use chalkboard_core::LessonManifest;
///
/// let manifest: LessonManifest = serde_json::from_str(r#"{
///     "lessonDurationSec": 60,
///     "scenes": [{
///         "sceneId": "intro",
///         "purpose": "Hook",
///         "voiceover": [{"text": "Welcome.", "checkpointId": "c1"}],
///         "events": [],
///         "interaction": {"type": "quiz", "prompt": "Ready?"}
///     }]
/// }"#).unwrap();
///
/// assert_eq!(manifest.transcript(), vec!["Welcome.".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonManifest {
    /// Declared total duration in seconds
    #[serde(alias = "durationSec")]
    pub lesson_duration_sec: f64,
    /// Scenes in playback order
    pub scenes: Vec<Scene>,
}

impl LessonManifest {
    /// Narration segment texts in scene order.
    pub fn transcript(&self) -> Vec<String> {
        self.scenes
            .iter()
            .flat_map(|scene| scene.voiceover.iter().map(|seg| seg.text.clone()))
            .collect()
    }

    /// Narration joined into a single script for text-to-speech.
    pub fn narration_script(&self) -> String {
        self.transcript()
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total number of visual events across scenes.
    pub fn event_count(&self) -> usize {
        self.scenes.iter().map(|s| s.events.len()).sum()
    }
}
