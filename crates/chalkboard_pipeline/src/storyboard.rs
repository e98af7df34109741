//! Image prompt planner.

use crate::engine::GenerationEngine;
use crate::prompts::{image_plan_payload, image_plan_system_prompt};
use crate::schema::{OutputSchema, Violation, deserialize, require_text};
use chalkboard_core::{GenerationRequest, ImagePromptPlan, REQUIRED_IMAGE_PROMPTS};
use chalkboard_error::GenerationError;
use chalkboard_models::TextGenerator;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Schema for the five-image storyboard.
///
/// Extra prompts are dropped from the end; too few is a count violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSchema;

impl OutputSchema for PlanSchema {
    type Output = ImagePromptPlan;

    fn name(&self) -> &'static str {
        "image_prompts"
    }

    fn validate(&self, value: Value) -> Result<ImagePromptPlan, Violation> {
        let mut plan: ImagePromptPlan = deserialize(value)?;

        let returned = plan.images.len();
        if returned < REQUIRED_IMAGE_PROMPTS {
            return Err(Violation::WrongCount {
                item: "image prompt".to_string(),
                expected: REQUIRED_IMAGE_PROMPTS,
                actual: returned,
            });
        }
        if returned > REQUIRED_IMAGE_PROMPTS {
            warn!(
                returned,
                kept = REQUIRED_IMAGE_PROMPTS,
                "Truncating extra image prompts"
            );
            plan.images.truncate(REQUIRED_IMAGE_PROMPTS);
        }

        for (idx, image) in plan.images.iter().enumerate() {
            require_text(&format!("images[{}].imagePrompt", idx), &image.image_prompt)?;
        }

        plan.storyboard_overview.total_images = REQUIRED_IMAGE_PROMPTS;
        Ok(plan)
    }
}

/// Plans the illustrations for one topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePromptPlanner {
    engine: GenerationEngine,
}

impl ImagePromptPlanner {
    /// Create a planner.
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Produce a storyboard with exactly five prompts.
    #[instrument(skip_all, fields(chars = topic_text.len()))]
    pub async fn plan(
        &self,
        generator: &dyn TextGenerator,
        topic_text: &str,
    ) -> Result<ImagePromptPlan, GenerationError> {
        let request = GenerationRequest::new(
            image_plan_system_prompt(),
            image_plan_payload(topic_text),
            PlanSchema.name(),
        );
        let plan = self.engine.generate(generator, request, &PlanSchema).await?;
        info!(flow = %plan.storyboard_overview.visual_flow, "Planned image prompts");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(count: usize) -> Value {
        let images: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "purpose": format!("beat {}", i),
                    "layoutType": "Single",
                    "imagePrompt": format!("prompt {}", i)
                })
            })
            .collect();
        json!({
            "storyboardOverview": {"totalImages": count, "visualFlow": "left to right"},
            "images": images
        })
    }

    #[test]
    fn exactly_five_passes() {
        let plan = PlanSchema.validate(plan(5)).unwrap();
        assert_eq!(plan.images.len(), 5);
    }

    #[test]
    fn extra_prompts_are_truncated_in_order() {
        let plan = PlanSchema.validate(plan(7)).unwrap();
        assert_eq!(
            plan.prompt_texts(),
            (0..5).map(|i| format!("prompt {}", i)).collect::<Vec<_>>()
        );
        assert_eq!(plan.storyboard_overview.total_images, 5);
    }

    #[test]
    fn too_few_is_a_count_violation() {
        assert_eq!(
            PlanSchema.validate(plan(3)).unwrap_err(),
            Violation::WrongCount {
                item: "image prompt".to_string(),
                expected: 5,
                actual: 3,
            }
        );
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut value = plan(5);
        value["images"][2]["imagePrompt"] = json!("  ");
        assert!(PlanSchema.validate(value).is_err());
    }
}
