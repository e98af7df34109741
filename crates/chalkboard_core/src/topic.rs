//! Topics extracted from source text.

use serde::{Deserialize, Serialize};

/// A teachable topic found in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Identifier; assigned positionally when the model omits it
    #[serde(default)]
    pub id: String,
    /// Engaging title
    pub title: String,
    /// Specific learning objective
    pub focus: String,
    /// Why this topic matters
    pub hook: String,
    /// How well the topic lends itself to visuals, 1 to 10
    pub visual_potential_score: f64,
    /// Visual elements worth drawing
    pub key_visuals: Vec<String>,
}

impl Topic {
    /// Render the topic as the plain text handed to later stages.
    pub fn as_prompt_text(&self) -> String {
        let mut text = format!("{}\n\nFocus: {}\nHook: {}", self.title, self.focus, self.hook);
        if !self.key_visuals.is_empty() {
            text.push_str("\nKey visuals: ");
            text.push_str(&self.key_visuals.join(", "));
        }
        text
    }
}

/// Topic extractor output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicList {
    /// Topics in model order
    pub topics: Vec<Topic>,
}

impl TopicList {
    /// Fill blank ids with `topic_1`, `topic_2`, ... by position.
    pub fn assign_missing_ids(&mut self) {
        for (idx, topic) in self.topics.iter_mut().enumerate() {
            if topic.id.trim().is_empty() {
                topic.id = format!("topic_{}", idx + 1);
            }
        }
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no topics were extracted.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str) -> Topic {
        Topic {
            id: id.to_string(),
            title: "Photosynthesis".into(),
            focus: "Light reactions".into(),
            hook: "Plants eat light".into(),
            visual_potential_score: 8.5,
            key_visuals: vec!["leaf".into(), "sun".into()],
        }
    }

    #[test]
    fn assigns_positional_ids_only_when_blank() {
        let mut list = TopicList {
            topics: vec![topic(""), topic("custom"), topic(" ")],
        };
        list.assign_missing_ids();
        let ids: Vec<_> = list.topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["topic_1", "custom", "topic_3"]);
    }

    #[test]
    fn prompt_text_includes_visuals() {
        let text = topic("t").as_prompt_text();
        assert!(text.starts_with("Photosynthesis"));
        assert!(text.contains("Key visuals: leaf, sun"));
    }
}
