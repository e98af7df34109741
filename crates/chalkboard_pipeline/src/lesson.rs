//! End-to-end lesson orchestration.
//!
//! Stages run in order: topics, image prompts, assets (fanned out), manifest,
//! narration, duration check. Each stage resolves its own provider from the
//! request's [`AiAgentsConfig`], falling back to process defaults.

use crate::{
    AssetPipeline, DurationProbe, ImagePromptPlanner, LessonDirector, Mp3DurationProbe,
    TopicExtractor, ensure_acceptable, reconcile,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chalkboard_core::{
    AiAgentsConfig, ContentBounds, GeneratedAsset, ImagePromptPlan, LessonBundle, ModelPurpose,
    ProviderDefaults, ProviderSelection, ResolvedProvider, SourceText, Topic, TopicList, asset_id,
    resolve_provider,
};
use chalkboard_error::{ChalkboardResult, ConfigError};
use chalkboard_models::{ProviderFactory, TextGenerator};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Data URL prefix for MP3 narration.
pub const AUDIO_DATA_URL_PREFIX: &str = "data:audio/mpeg;base64,";

/// Encode narration audio as a data URL. Empty audio gives an empty payload.
pub fn audio_data_url(audio: &[u8]) -> String {
    format!("{}{}", AUDIO_DATA_URL_PREFIX, STANDARD.encode(audio))
}

/// Everything produced by a full run.
#[derive(Debug, Clone, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct LessonRun {
    /// All extracted topics
    topics: TopicList,
    /// The topic the lesson was built from
    topic: Topic,
    /// Storyboard and prompts
    plan: ImagePromptPlan,
    /// Keyed images, in storyboard order
    assets: Vec<GeneratedAsset>,
    /// Manifest, narration and duration check
    bundle: LessonBundle,
}

/// Drives the pipeline stages against providers built by a [`ProviderFactory`].
pub struct LessonOrchestrator {
    factory: Arc<dyn ProviderFactory>,
    defaults: ProviderDefaults,
    bounds: ContentBounds,
    assets: AssetPipeline,
    probe: Arc<dyn DurationProbe>,
    extractor: TopicExtractor,
    planner: ImagePromptPlanner,
    director: LessonDirector,
}

impl std::fmt::Debug for LessonOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonOrchestrator")
            .field("defaults", &self.defaults)
            .field("bounds", &self.bounds)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

impl LessonOrchestrator {
    /// Create an orchestrator measuring narration as MP3.
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        defaults: ProviderDefaults,
        bounds: ContentBounds,
        assets: AssetPipeline,
    ) -> Self {
        Self {
            factory,
            defaults,
            bounds,
            assets,
            probe: Arc::new(Mp3DurationProbe),
            extractor: TopicExtractor::default(),
            planner: ImagePromptPlanner::default(),
            director: LessonDirector::default(),
        }
    }

    /// Replace the audio duration probe.
    pub fn with_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    fn resolve(
        &self,
        selection: Option<ProviderSelection>,
        purpose: ModelPurpose,
    ) -> Result<ResolvedProvider, ConfigError> {
        let resolved = resolve_provider(selection.as_ref(), &self.defaults, purpose)?;
        info!(
            purpose = %purpose,
            kind = %resolved.kind(),
            model = %resolved.model(),
            "Resolved provider"
        );
        Ok(resolved)
    }

    fn text_generator(
        &self,
        selection: Option<ProviderSelection>,
    ) -> Result<Arc<dyn TextGenerator>, ConfigError> {
        let resolved = self.resolve(selection, ModelPurpose::Text)?;
        self.factory.text_generator(&resolved)
    }

    /// Check the source text bounds and extract topics.
    #[instrument(skip_all)]
    pub async fn analyze(
        &self,
        raw_text: &str,
        agents: &AiAgentsConfig,
    ) -> ChalkboardResult<TopicList> {
        let source = SourceText::new(raw_text, self.bounds)?;
        let generator = self.text_generator(agents.librarian_selection()?)?;
        Ok(self
            .extractor
            .extract(generator.as_ref(), source.as_str())
            .await?)
    }

    /// Plan five image prompts for a topic.
    #[instrument(skip_all)]
    pub async fn plan_prompts(
        &self,
        topic_text: &str,
        agents: &AiAgentsConfig,
    ) -> ChalkboardResult<ImagePromptPlan> {
        let generator = self.text_generator(agents.image_steering_selection()?)?;
        Ok(self.planner.plan(generator.as_ref(), topic_text).await?)
    }

    /// Synthesize one keyed image per planned prompt.
    #[instrument(skip_all, fields(prompts = plan.images.len()))]
    pub async fn synthesize_assets(
        &self,
        plan: &ImagePromptPlan,
        agents: &AiAgentsConfig,
    ) -> ChalkboardResult<Vec<GeneratedAsset>> {
        let resolved = self.resolve(agents.image_generation_selection()?, ModelPurpose::Image)?;
        let backend = self.factory.image_backend(&resolved)?;
        let pngs = self
            .assets
            .synthesize(&plan.prompt_texts(), backend, resolved.hints())
            .await?;

        Ok(plan
            .images
            .iter()
            .zip(pngs)
            .enumerate()
            .map(|(index, (prompt, png))| GeneratedAsset {
                index,
                asset_id: asset_id(index),
                purpose: prompt.purpose.clone(),
                layout_type: prompt.layout_type.clone(),
                image_prompt: prompt.image_prompt.clone(),
                png,
            })
            .collect())
    }

    /// Plan prompts for a topic and synthesize them.
    pub async fn generate_assets(
        &self,
        topic_text: &str,
        agents: &AiAgentsConfig,
    ) -> ChalkboardResult<(ImagePromptPlan, Vec<GeneratedAsset>)> {
        let plan = self.plan_prompts(topic_text, agents).await?;
        let assets = self.synthesize_assets(&plan, agents).await?;
        Ok((plan, assets))
    }

    /// Direct the lesson, narrate it and check the narration length.
    ///
    /// Narration that overruns the manifest duration by more than 10% fails
    /// the lesson. Missing narration does not.
    #[instrument(skip_all, fields(assets = asset_ids.len()))]
    pub async fn compose_lesson(
        &self,
        topic_text: &str,
        asset_ids: &[String],
        agents: &AiAgentsConfig,
        narration_key: Option<&str>,
    ) -> ChalkboardResult<LessonBundle> {
        let generator = self.text_generator(agents.director_selection()?)?;
        let manifest = self
            .director
            .direct(generator.as_ref(), topic_text, asset_ids)
            .await?;

        let transcript = manifest.transcript();
        let narrator = self.factory.narrator(narration_key);
        let audio = narrator.narrate(&transcript).await?;
        info!(
            enabled = narrator.is_enabled(),
            bytes = audio.len(),
            "Narration synthesized"
        );

        let reconciliation = reconcile(&audio, manifest.lesson_duration_sec, self.probe.as_ref())?;
        ensure_acceptable(&reconciliation)?;

        Ok(LessonBundle {
            lesson_manifest: manifest,
            audio_data_url: audio_data_url(&audio),
            audio,
            transcript,
            reconciliation,
        })
    }

    /// Run every stage for the topic at `topic_index`.
    #[instrument(skip_all, fields(topic_index = topic_index))]
    pub async fn run(
        &self,
        raw_text: &str,
        topic_index: usize,
        agents: &AiAgentsConfig,
        narration_key: Option<&str>,
    ) -> ChalkboardResult<LessonRun> {
        let topics = self.analyze(raw_text, agents).await?;
        let topic = topics.topics.get(topic_index).cloned().ok_or_else(|| {
            ConfigError::new(format!(
                "topic index {} out of range ({} topics)",
                topic_index,
                topics.len()
            ))
        })?;
        info!(id = %topic.id, title = %topic.title, "Selected topic");

        let topic_text = topic.as_prompt_text();
        let (plan, assets) = self.generate_assets(&topic_text, agents).await?;
        let asset_ids: Vec<String> = assets.iter().map(|a| a.asset_id.clone()).collect();
        let bundle = self
            .compose_lesson(&topic_text, &asset_ids, agents, narration_key)
            .await?;

        Ok(LessonRun {
            topics,
            topic,
            plan,
            assets,
            bundle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_audio_has_bare_prefix() {
        assert_eq!(audio_data_url(&[]), "data:audio/mpeg;base64,");
        assert_eq!(audio_data_url(b"hi"), "data:audio/mpeg;base64,aGk=");
    }
}
