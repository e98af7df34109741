//! Lesson generation pipeline for Chalkboard.
//!
//! - [`GenerationEngine`] - generate, recover JSON, validate, retry once
//! - [`TopicExtractor`], [`ImagePromptPlanner`], [`LessonDirector`] - the three
//!   structured generators, each a prompt plus an [`OutputSchema`]
//! - [`AssetPipeline`] - concurrent submit / poll / download / key per prompt
//! - [`reconcile`] - narration length against the manifest duration
//! - [`LessonOrchestrator`] - all of the above, wired to a provider factory

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod director;
mod engine;
mod extraction;
mod lesson;
mod prompts;
mod reconcile;
mod schema;
mod storyboard;
mod topics;

pub use asset::{
    AssetPipeline, AssetState, AssetTask, Hsv, PollSchedule, is_background, key_background,
};
pub use director::{LessonDirector, ManifestSchema};
pub use engine::{GenerationEngine, MAX_RETRIES};
pub use extraction::extract_json;
pub use lesson::{AUDIO_DATA_URL_PREFIX, LessonOrchestrator, LessonRun, audio_data_url};
pub use prompts::{
    TOPIC_SYSTEM_PROMPT, director_payload, director_system_prompt, image_plan_payload,
    image_plan_system_prompt, topic_payload,
};
pub use reconcile::{
    DURATION_TOLERANCE, DurationProbe, Mp3DurationProbe, ensure_acceptable, reconcile,
    reconcile_measured,
};
pub use schema::{OutputSchema, Violation, deserialize, require_text};
pub use storyboard::{ImagePromptPlanner, PlanSchema};
pub use topics::{MAX_VISUAL_SCORE, MIN_VISUAL_SCORE, TopicExtractor, TopicSchema};
