//! Cross-referential manifest checks.

use crate::LessonManifest;
use chalkboard_error::{ManifestError, ManifestErrorKind};
use std::collections::BTreeSet;
use tracing::debug;

/// Upper bound on `lessonDurationSec`, inclusive.
pub const MAX_LESSON_DURATION_SEC: f64 = 180.0;

/// Upper bound on scene count, inclusive.
pub const MAX_SCENES: usize = 5;

/// Check a parsed manifest against the lesson rules.
///
/// Rules, in evaluation order:
/// 1. duration in `(0, 180]`
/// 2. scene count in `[1, 5]`
/// 3. per scene: at least one voiceover segment has text; event asset ids
///    are non-empty and, when `known_assets` is given, exactly one of them;
///    event checkpoint ids are a subset of the scene's
///    voiceover checkpoint ids (voiceover-only checkpoints are fine)
/// 4. at least one scene has an interaction other than `none`
///
/// The first violated rule is reported.
pub fn validate_manifest(
    manifest: &LessonManifest,
    known_assets: Option<&[String]>,
) -> Result<(), ManifestError> {
    let duration = manifest.lesson_duration_sec;
    // NaN fails both comparisons, so test for the valid range.
    if !(duration > 0.0 && duration <= MAX_LESSON_DURATION_SEC) {
        return Err(ManifestError::new(ManifestErrorKind::Duration {
            duration,
            max: MAX_LESSON_DURATION_SEC,
        }));
    }

    let count = manifest.scenes.len();
    if count == 0 || count > MAX_SCENES {
        return Err(ManifestError::new(ManifestErrorKind::SceneCount {
            count,
            max: MAX_SCENES,
        }));
    }

    for (idx, scene) in manifest.scenes.iter().enumerate() {
        let scene_number = idx + 1;

        if scene.voiceover.iter().all(|seg| seg.text.trim().is_empty()) {
            return Err(ManifestError::new(ManifestErrorKind::SilentScene {
                scene_number,
                scene_id: scene.scene_id.clone(),
            }));
        }

        for event in &scene.events {
            let asset_id = event.asset_id.as_str();
            if asset_id.trim().is_empty() {
                return Err(ManifestError::new(ManifestErrorKind::EmptyAssetId {
                    scene_number,
                    scene_id: scene.scene_id.clone(),
                }));
            }
            let known = known_assets.is_none_or(|known| known.iter().any(|k| k == asset_id));
            if !known {
                return Err(ManifestError::new(ManifestErrorKind::UnknownAsset {
                    scene_number,
                    scene_id: scene.scene_id.clone(),
                    asset_id: asset_id.to_string(),
                }));
            }
        }

        let spoken: BTreeSet<&str> = scene
            .voiceover
            .iter()
            .map(|seg| seg.checkpoint_id.as_str())
            .collect();
        let missing: BTreeSet<&str> = scene
            .events
            .iter()
            .map(|event| event.checkpoint_id.as_str())
            .filter(|id| !spoken.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(ManifestError::new(ManifestErrorKind::CheckpointMismatch {
                scene_number,
                scene_id: scene.scene_id.clone(),
                missing: missing.into_iter().map(str::to_string).collect(),
            }));
        }
    }

    if !manifest.scenes.iter().any(|scene| scene.interaction.is_active()) {
        return Err(ManifestError::new(ManifestErrorKind::MissingInteraction));
    }

    debug!(scenes = count, duration, "Manifest passed validation");
    Ok(())
}
