//! Lesson director.

use crate::engine::GenerationEngine;
use crate::prompts::{director_payload, director_system_prompt};
use crate::schema::{OutputSchema, Violation, deserialize};
use chalkboard_core::{GenerationRequest, LessonManifest, validate_manifest};
use chalkboard_error::GenerationError;
use chalkboard_models::TextGenerator;
use serde_json::Value;
use tracing::{info, instrument};

/// Schema for a lesson manifest.
///
/// Runs the manifest rules on top of deserialization, so a manifest that
/// parses but breaks a cross-reference is retried like any other violation.
#[derive(Debug, Clone, Default)]
pub struct ManifestSchema {
    known_assets: Vec<String>,
}

impl ManifestSchema {
    /// Schema accepting only `known_assets` as event asset ids.
    pub fn new(known_assets: Vec<String>) -> Self {
        Self { known_assets }
    }
}

impl OutputSchema for ManifestSchema {
    type Output = LessonManifest;

    fn name(&self) -> &'static str {
        "lesson_manifest"
    }

    fn validate(&self, value: Value) -> Result<LessonManifest, Violation> {
        let manifest: LessonManifest = deserialize(value)?;
        validate_manifest(&manifest, Some(self.known_assets.as_slice()))
            .map_err(|e| Violation::invalid(format!("{} ({})", e.kind, e.kind.rule())))?;
        Ok(manifest)
    }
}

/// Writes the lesson manifest for a topic and its assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessonDirector {
    engine: GenerationEngine,
}

impl LessonDirector {
    /// Create a director.
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Produce a validated manifest referencing only `asset_ids`.
    #[instrument(skip_all, fields(assets = asset_ids.len()))]
    pub async fn direct(
        &self,
        generator: &dyn TextGenerator,
        topic_text: &str,
        asset_ids: &[String],
    ) -> Result<LessonManifest, GenerationError> {
        let schema = ManifestSchema::new(asset_ids.to_vec());
        let request = GenerationRequest::new(
            director_system_prompt(),
            director_payload(topic_text, asset_ids),
            schema.name(),
        );
        let manifest = self.engine.generate(generator, request, &schema).await?;
        info!(
            scenes = manifest.scenes.len(),
            events = manifest.event_count(),
            duration_sec = manifest.lesson_duration_sec,
            "Directed lesson"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(asset: &str, checkpoint: &str) -> Value {
        json!({
            "lessonDurationSec": 90,
            "scenes": [{
                "sceneId": "scene_1",
                "purpose": "Intro",
                "assetsUsed": [asset],
                "voiceover": [{"text": "Look at this.", "checkpointId": "c1"}],
                "events": [{
                    "type": "draw",
                    "assetId": asset,
                    "checkpointId": checkpoint,
                    "zone": "centerMain",
                    "role": "primaryDiagram",
                    "scaleHint": "large"
                }],
                "interaction": {"type": "pauseAndThink", "prompt": "What next?"}
            }]
        })
    }

    fn schema() -> ManifestSchema {
        ManifestSchema::new(vec!["asset_0".to_string(), "asset_1".to_string()])
    }

    #[test]
    fn valid_manifest_passes() {
        let manifest = schema().validate(manifest("asset_0", "c1")).unwrap();
        assert_eq!(manifest.scenes.len(), 1);
    }

    #[test]
    fn unknown_asset_is_a_violation() {
        assert!(schema().validate(manifest("asset_9", "c1")).is_err());
    }

    #[test]
    fn dangling_checkpoint_is_a_violation() {
        let err = schema().validate(manifest("asset_0", "c2")).unwrap_err();
        assert!(err.to_string().contains("c2"));
    }
}
