//! End-to-end orchestration against stub providers.

mod common;

use chalkboard_core::{
    AiAgentsConfig, ContentBounds, ProviderDefaults, Verdict, validate_manifest,
};
use chalkboard_error::{ChalkboardErrorKind, ReconcileError};
use chalkboard_models::{KeyingConfig, PollingConfig};
use chalkboard_pipeline::{AssetPipeline, DurationProbe, LessonOrchestrator};
use common::{
    FixedNarrator, ScriptedGenerator, StubFactory, StubImageBackend, manifest_json, plan_json,
    topics_json,
};
use std::sync::Arc;

/// Answers each stage by looking at its system prompt.
fn stage_generator() -> ScriptedGenerator {
    ScriptedGenerator::new(|_, request| {
        let system = &request.system_prompt;
        Ok(if system.contains("librarian") {
            topics_json()
        } else if system.contains("visual designer") {
            plan_json(5)
        } else {
            manifest_json().replace("asset_1", "asset_4")
        })
    })
}

fn orchestrator(factory: StubFactory) -> LessonOrchestrator {
    LessonOrchestrator::new(
        Arc::new(factory),
        ProviderDefaults::new("test-key", "text-model", "image-model"),
        ContentBounds::default(),
        AssetPipeline::from_config(&PollingConfig::default(), &KeyingConfig::default()),
    )
}

fn source_text() -> String {
    let sentence = "Water evaporates from the ocean, condenses into clouds and falls as rain. ";
    sentence.repeat(8)[..500].to_string()
}

struct FixedProbe(f64);

impl DurationProbe for FixedProbe {
    fn duration_sec(&self, _audio: &[u8]) -> Result<f64, ReconcileError> {
        Ok(self.0)
    }
}

#[tokio::test]
async fn test_full_run_without_narration_key() -> anyhow::Result<()> {
    let generator = Arc::new(stage_generator());
    let images = Arc::new(StubImageBackend::inline());
    let orchestrator = orchestrator(StubFactory::silent(generator.clone(), images.clone()));

    let text = source_text();
    assert_eq!(text.chars().count(), 500);
    let run = orchestrator
        .run(&text, 0, &AiAgentsConfig::default(), None)
        .await?;

    assert!(!run.topics().is_empty());
    assert_eq!(run.plan().images.len(), 5);

    assert_eq!(run.assets().len(), 5);
    for (i, asset) in run.assets().iter().enumerate() {
        assert_eq!(asset.asset_id, format!("asset_{}", i));
        let img = image::load_from_memory(&asset.png)?;
        assert!(img.color().has_alpha());
    }

    let bundle = run.bundle();
    let manifest = &bundle.lesson_manifest;
    assert!(manifest.scenes.len() <= 5);
    assert!(manifest.lesson_duration_sec <= 180.0);
    let ids: Vec<String> = run.assets().iter().map(|a| a.asset_id.clone()).collect();
    validate_manifest(manifest, Some(ids.as_slice()))?;

    assert!(bundle.audio.is_empty());
    assert_eq!(bundle.audio_data_url, "data:audio/mpeg;base64,");
    assert_eq!(bundle.reconciliation.verdict, Verdict::Skipped);
    assert_eq!(bundle.transcript.len(), 3);

    // topics, prompts, manifest
    assert_eq!(generator.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_short_source_is_rejected_before_generation() {
    let generator = Arc::new(stage_generator());
    let orchestrator = orchestrator(StubFactory::silent(
        generator.clone(),
        Arc::new(StubImageBackend::inline()),
    ));

    let err = orchestrator
        .analyze("too short", &AiAgentsConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "CONTENT_TOO_SHORT");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_overlong_narration_fails_the_lesson() {
    let mut factory = StubFactory::silent(
        Arc::new(stage_generator()),
        Arc::new(StubImageBackend::inline()),
    );
    factory.narrator = Arc::new(FixedNarrator(vec![0xFF, 0xFB, 0x90, 0x00]));
    let orchestrator = orchestrator(factory).with_probe(Arc::new(FixedProbe(200.0)));

    let assets: Vec<String> = (0..5).map(|i| format!("asset_{}", i)).collect();
    let err = orchestrator
        .compose_lesson("The Water Cycle", &assets, &AiAgentsConfig::default(), Some("k"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ChalkboardErrorKind::Reconcile(_)));
    assert_eq!(err.code(), "AUDIO_TOO_LONG");
}

#[tokio::test]
async fn test_narration_within_tolerance_is_encoded() -> anyhow::Result<()> {
    let mut factory = StubFactory::silent(
        Arc::new(stage_generator()),
        Arc::new(StubImageBackend::inline()),
    );
    factory.narrator = Arc::new(FixedNarrator(b"mp3".to_vec()));
    let orchestrator = orchestrator(factory).with_probe(Arc::new(FixedProbe(130.0)));

    let assets: Vec<String> = (0..5).map(|i| format!("asset_{}", i)).collect();
    let bundle = orchestrator
        .compose_lesson("The Water Cycle", &assets, &AiAgentsConfig::default(), None)
        .await?;

    assert_eq!(bundle.reconciliation.verdict, Verdict::Pass);
    assert_eq!(bundle.reconciliation.measured_sec, Some(130.0));
    assert_eq!(bundle.audio_data_url, "data:audio/mpeg;base64,bXAz");
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_topic_index_is_config_error() {
    let orchestrator = orchestrator(StubFactory::silent(
        Arc::new(stage_generator()),
        Arc::new(StubImageBackend::inline()),
    ));

    let err = orchestrator
        .run(&source_text(), 3, &AiAgentsConfig::default(), None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "CONFIGURATION_ERROR");
}
