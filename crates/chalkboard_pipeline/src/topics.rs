//! Topic extractor.

use crate::engine::GenerationEngine;
use crate::prompts::{TOPIC_SYSTEM_PROMPT, topic_payload};
use crate::schema::{OutputSchema, Violation, deserialize, require_text};
use chalkboard_core::{GenerationRequest, TopicList};
use chalkboard_error::GenerationError;
use chalkboard_models::TextGenerator;
use serde_json::Value;
use tracing::{info, instrument};

/// Lowest accepted visual potential score.
pub const MIN_VISUAL_SCORE: f64 = 1.0;
/// Highest accepted visual potential score.
pub const MAX_VISUAL_SCORE: f64 = 10.0;

/// Schema for the topic list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicSchema;

impl OutputSchema for TopicSchema {
    type Output = TopicList;

    fn name(&self) -> &'static str {
        "topics"
    }

    fn validate(&self, value: Value) -> Result<TopicList, Violation> {
        let mut list: TopicList = deserialize(value)?;
        if list.is_empty() {
            return Err(Violation::invalid("topics must contain at least one topic"));
        }

        for (idx, topic) in list.topics.iter().enumerate() {
            require_text(&format!("topics[{}].title", idx), &topic.title)?;
            require_text(&format!("topics[{}].focus", idx), &topic.focus)?;
            let score = topic.visual_potential_score;
            if !(MIN_VISUAL_SCORE..=MAX_VISUAL_SCORE).contains(&score) {
                return Err(Violation::invalid(format!(
                    "topics[{}].visualPotentialScore {} outside [{}, {}]",
                    idx, score, MIN_VISUAL_SCORE, MAX_VISUAL_SCORE
                )));
            }
        }

        list.assign_missing_ids();
        Ok(list)
    }
}

/// Extracts teachable topics from source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicExtractor {
    engine: GenerationEngine,
}

impl TopicExtractor {
    /// Create an extractor.
    pub fn new(engine: GenerationEngine) -> Self {
        Self { engine }
    }

    /// Extract at least one topic from `source_text`.
    #[instrument(skip_all, fields(chars = source_text.chars().count()))]
    pub async fn extract(
        &self,
        generator: &dyn TextGenerator,
        source_text: &str,
    ) -> Result<TopicList, GenerationError> {
        let request = GenerationRequest::new(
            TOPIC_SYSTEM_PROMPT,
            topic_payload(source_text),
            TopicSchema.name(),
        );
        let topics = self.engine.generate(generator, request, &TopicSchema).await?;
        info!(count = topics.len(), "Extracted topics");
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn topic(score: f64) -> Value {
        json!({
            "title": "Photosynthesis",
            "focus": "How light becomes sugar",
            "hook": "Every breath you take",
            "visualPotentialScore": score,
            "keyVisuals": ["chloroplast"]
        })
    }

    #[test]
    fn assigns_positional_ids() {
        let list = TopicSchema
            .validate(json!({"topics": [topic(8.0), topic(3.5)]}))
            .unwrap();
        assert_eq!(list.topics[0].id, "topic_1");
        assert_eq!(list.topics[1].id, "topic_2");
    }

    #[test]
    fn score_bounds_are_inclusive() {
        assert!(TopicSchema.validate(json!({"topics": [topic(1.0)]})).is_ok());
        assert!(TopicSchema.validate(json!({"topics": [topic(10.0)]})).is_ok());
        assert!(TopicSchema.validate(json!({"topics": [topic(0.5)]})).is_err());
        assert!(TopicSchema.validate(json!({"topics": [topic(11.0)]})).is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = TopicSchema.validate(json!({"topics": []})).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(TopicSchema.validate(json!({"topics": [{"title": "x"}]})).is_err());
        assert!(TopicSchema.validate(json!(["not", "an", "object"])).is_err());
    }
}
