//! Core data types for the Chalkboard lesson pipeline.
//!
//! This crate provides the data model shared by every stage: provider selection
//! and credential resolution, generation requests, topics, storyboards, the
//! lesson manifest and its validator, and the final lesson bundle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bundle;
mod content;
mod manifest;
mod provider;
mod request;
mod resolve;
mod storyboard;
mod topic;
mod validate;

pub use bundle::{GeneratedAsset, LessonBundle, ReconciliationResult, Verdict, asset_id};
pub use content::{ContentBounds, SourceText};
pub use manifest::{
    Interaction, InteractionType, LessonManifest, Scene, ScaleHint, VisualEvent, VisualEventType,
    VisualRole, VoiceoverSegment, Zone,
};
pub use provider::{
    AiAgentsConfig, AiProviderConfig, GeminiBlock, ImageHints, ImageToolConfig, NativeModelConfig,
    OpenAiBlock, OpenAiCompatibleConfig, ProviderKind, ProviderSelection, SjinnBlock,
    DEFAULT_IMAGE_TOOL_MODEL,
};
pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use resolve::{
    ModelPurpose, NATIVE_BASE_URL, ProviderDefaults, ResolvedProvider, resolve_provider,
};
pub use storyboard::{ImagePrompt, ImagePromptPlan, StoryboardOverview, REQUIRED_IMAGE_PROMPTS};
pub use topic::{Topic, TopicList};
pub use validate::{MAX_LESSON_DURATION_SEC, MAX_SCENES, validate_manifest};
