//! System prompts and user payloads for the three structured generators.

use chalkboard_core::{
    InteractionType, MAX_LESSON_DURATION_SEC, MAX_SCENES, REQUIRED_IMAGE_PROMPTS, ScaleHint,
    VisualEventType, VisualRole, Zone,
};
use strum::IntoEnumIterator;

/// Topic extraction instructions.
pub const TOPIC_SYSTEM_PROMPT: &str = r#"You are a librarian preparing short video lessons.
Read the supplied source text and list the distinct teachable topics it contains.

Rules:
- Use ONLY material present in the source text. Do not add facts, examples or topics it does not contain.
- Each topic must fit a narrated lesson of two to three minutes.
- Dense sources yield more topics, thin sources fewer; return at least one.
- visualPotentialScore is a number from 1 to 10 rating how well the topic can be explained with drawings.

Respond with a single JSON object and nothing else:
{
  "topics": [
    {
      "id": "topic_1",
      "title": "Short engaging title",
      "focus": "The specific learning objective",
      "hook": "Why a learner should care",
      "visualPotentialScore": 8,
      "keyVisuals": ["visual element", "another visual element"]
    }
  ]
}"#;

/// Image planning instructions.
pub fn image_plan_system_prompt() -> String {
    format!(
        r#"You are a visual designer planning the illustrations for one short lesson.
Plan exactly {count} images, one per visual beat, in the order they appear in the lesson.

Style for every image:
- Hand-drawn black-and-white sketchnote on a plain pure white background.
- Teal and orange are the only accent colors, used sparingly to mark key parts.
- Show internal structure and labelled parts rather than icon-like simplifications.
- Never photorealistic. No background scenery, no borders, no frames.

layoutType is one of "Single", "2x2 Grid" or "Side-by-side".
Each imagePrompt is a complete, self-contained prompt for an image model.

Respond with a single JSON object and nothing else:
{{
  "storyboardOverview": {{"totalImages": {count}, "visualFlow": "How the images progress"}},
  "images": [
    {{"purpose": "What this image explains", "layoutType": "Single", "imagePrompt": "Full prompt"}}
  ]
}}"#,
        count = REQUIRED_IMAGE_PROMPTS
    )
}

fn choices<T: IntoEnumIterator + std::fmt::Display>() -> String {
    T::iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lesson direction instructions.
pub fn director_system_prompt() -> String {
    format!(
        r#"You are a lesson director turning a topic and a set of illustrations into a narrated whiteboard lesson.

Constraints:
- lessonDurationSec is greater than 0 and at most {max_duration}.
- Between 1 and {max_scenes} scenes.
- Every scene has voiceover segments, each with a checkpointId unique within the scene.
- Every visual event uses a checkpointId that appears in the same scene's voiceover.
- Every visual event uses an assetId from the supplied asset list, and nothing else.
- At least one scene has an interaction whose type is not "none".

Allowed values:
- event type: {events}
- zone: {zones}
- role: {roles}
- scaleHint: {scales}
- interaction type: {interactions}

Respond with a single JSON object and nothing else:
{{
  "lessonDurationSec": 120,
  "scenes": [
    {{
      "sceneId": "scene_1",
      "purpose": "What this scene teaches",
      "assetsUsed": ["asset_0"],
      "voiceover": [{{"text": "Narration sentence.", "checkpointId": "c1"}}],
      "events": [
        {{"type": "draw", "assetId": "asset_0", "checkpointId": "c1", "zone": "centerMain", "role": "primaryDiagram", "scaleHint": "large", "params": {{}}}}
      ],
      "interaction": {{"type": "quiz", "prompt": "Question?", "options": ["A", "B"], "correctAnswer": "A"}}
    }}
  ]
}}"#,
        max_duration = MAX_LESSON_DURATION_SEC,
        max_scenes = MAX_SCENES,
        events = choices::<VisualEventType>(),
        zones = choices::<Zone>(),
        roles = choices::<VisualRole>(),
        scales = choices::<ScaleHint>(),
        interactions = choices::<InteractionType>(),
    )
}

/// User payload for the topic extractor.
pub fn topic_payload(source_text: &str) -> String {
    format!("Source text:\n\n{}", source_text)
}

/// User payload for the image planner.
pub fn image_plan_payload(topic_text: &str) -> String {
    format!("Topic:\n\n{}", topic_text)
}

/// User payload for the lesson director.
pub fn director_payload(topic_text: &str, asset_ids: &[String]) -> String {
    format!(
        "Topic:\n\n{}\n\nAvailable assets, in storyboard order: {}",
        topic_text,
        asset_ids.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn director_prompt_lists_wire_names() {
        let prompt = director_system_prompt();
        assert!(prompt.contains("\"fadeIn\""));
        assert!(prompt.contains("\"centerMain\""));
        assert!(prompt.contains("\"pauseAndThink\""));
        assert!(prompt.contains("at most 180"));
    }

    #[test]
    fn plan_prompt_names_the_count() {
        assert!(image_plan_system_prompt().contains("exactly 5 images"));
    }

    #[test]
    fn director_payload_lists_assets() {
        let payload = director_payload("Cells", &["asset_0".into(), "asset_1".into()]);
        assert!(payload.ends_with("asset_0, asset_1"));
    }
}
