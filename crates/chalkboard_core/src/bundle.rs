//! Final outputs of a pipeline run.

use crate::LessonManifest;
use serde::{Deserialize, Serialize};

/// Positional asset identifier for index `i` (`asset_0`, `asset_1`, ...).
pub fn asset_id(index: usize) -> String {
    format!("asset_{}", index)
}

/// A synthesized, background-keyed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAsset {
    /// Position in the storyboard
    pub index: usize,
    /// Stable identifier referenced by the manifest
    pub asset_id: String,
    /// What the visual explains
    pub purpose: String,
    /// Layout type
    pub layout_type: String,
    /// Prompt the image was generated from
    pub image_prompt: String,
    /// Transparent PNG bytes
    #[serde(skip)]
    pub png: Vec<u8>,
}

/// Outcome of the duration check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Verdict {
    /// Within tolerance, or shorter than planned
    Pass,
    /// Longer than declared duration plus tolerance
    Fail,
    /// No audio to measure; counts as a pass
    Skipped,
}

impl Verdict {
    /// Whether the lesson may proceed.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Verdict::Fail)
    }
}

/// Measured versus declared narration length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Measured audio duration, absent when skipped
    pub measured_sec: Option<f64>,
    /// Duration declared by the manifest
    pub declared_sec: f64,
    /// Allowed overrun in seconds
    pub tolerance_sec: f64,
    /// Verdict
    pub verdict: Verdict,
}

impl ReconciliationResult {
    /// Signed deviation of measured from declared, when measured.
    pub fn deviation_sec(&self) -> Option<f64> {
        self.measured_sec.map(|m| m - self.declared_sec)
    }
}

/// Everything a client needs to play a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonBundle {
    /// Validated manifest
    pub lesson_manifest: LessonManifest,
    /// Raw narration audio (MP3); empty when narration is disabled
    #[serde(skip)]
    pub audio: Vec<u8>,
    /// `data:audio/mpeg;base64,...`
    #[serde(rename = "audioUrl")]
    pub audio_data_url: String,
    /// Narration text in scene order
    pub transcript: Vec<String>,
    /// Duration check outcome
    pub reconciliation: ReconciliationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_ids_are_positional() {
        assert_eq!(asset_id(0), "asset_0");
        assert_eq!(asset_id(4), "asset_4");
    }

    #[test]
    fn only_fail_is_unacceptable() {
        assert!(Verdict::Pass.is_acceptable());
        assert!(Verdict::Skipped.is_acceptable());
        assert!(!Verdict::Fail.is_acceptable());
    }
}
