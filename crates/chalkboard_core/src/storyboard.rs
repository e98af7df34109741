//! Image prompt plan produced for one topic.

use serde::{Deserialize, Serialize};

/// Number of image prompts every plan must contain.
pub const REQUIRED_IMAGE_PROMPTS: usize = 5;

fn default_total_images() -> usize {
    REQUIRED_IMAGE_PROMPTS
}

/// One planned illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePrompt {
    /// What the visual explains
    pub purpose: String,
    /// Layout (`Single`, `2x2 Grid`, ...)
    pub layout_type: String,
    /// Full prompt sent to the image backend
    pub image_prompt: String,
}

/// Summary of the visual progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardOverview {
    /// Always five after planning
    #[serde(default = "default_total_images")]
    pub total_images: usize,
    /// One or two lines describing the flow
    pub visual_flow: String,
}

/// Image prompt planner output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePromptPlan {
    /// Storyboard summary
    pub storyboard_overview: StoryboardOverview,
    /// Prompts in storyboard order
    pub images: Vec<ImagePrompt>,
}

impl ImagePromptPlan {
    /// Prompt texts in order.
    pub fn prompt_texts(&self) -> Vec<String> {
        self.images.iter().map(|p| p.image_prompt.clone()).collect()
    }
}
