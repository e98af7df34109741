//! Tests for the generate / validate / retry engine and the generators on top.

mod common;

use chalkboard_error::{GenerationErrorKind, ProviderError, ProviderErrorKind};
use chalkboard_pipeline::{
    GenerationEngine, ImagePromptPlanner, LessonDirector, MAX_RETRIES, TopicExtractor,
    TopicSchema,
};
use chalkboard_core::GenerationRequest;
use common::{ScriptedGenerator, api_error, manifest_json, plan_json, topics_json};

fn request() -> GenerationRequest {
    GenerationRequest::new("system", "payload", "topics")
}

#[tokio::test]
async fn test_malformed_output_exhausts_after_exactly_two_calls() {
    let generator = ScriptedGenerator::always("this is not json at all");
    let err = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 2);
    assert_eq!(err.attempts, 1 + MAX_RETRIES);
    assert_eq!(err.kind.code(), "MALFORMED_JSON");
    assert_eq!(err.kind.raw(), Some("this is not json at all"));
}

#[tokio::test]
async fn test_retry_sends_identical_inputs() {
    let generator = ScriptedGenerator::sequence(vec!["".to_string(), topics_json()]);
    let topics = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap();

    assert_eq!(topics.len(), 1);
    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
    assert!(requests[0].json_mode);
}

#[tokio::test]
async fn test_empty_response_is_terminal_after_retry() {
    let generator = ScriptedGenerator::always("   ");
    let err = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 2);
    assert!(matches!(err.kind, GenerationErrorKind::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_fenced_response_is_recovered_first_time() {
    let fenced = format!("Here are the topics:\n```json\n{}\n```", topics_json());
    let generator = ScriptedGenerator::always(fenced);
    let topics = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
    assert_eq!(topics.topics[0].id, "topic_1");
}

#[tokio::test]
async fn test_invalid_credentials_are_never_retried() {
    let generator = ScriptedGenerator::new(|_, _| Err(api_error(401, "API key not valid")));
    let err = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 1);
    assert_eq!(err.attempts, 1);
    assert_eq!(err.kind.code(), "INVALID_API_KEY");
}

#[tokio::test]
async fn test_server_error_is_retried_once() {
    let generator = ScriptedGenerator::new(|n, _| {
        if n == 0 {
            Err(api_error(503, "overloaded"))
        } else {
            Ok(topics_json())
        }
    });
    let topics = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 2);
    assert_eq!(topics.len(), 1);
}

#[tokio::test]
async fn test_bad_request_is_terminal() {
    let generator = ScriptedGenerator::new(|_, _| {
        Err(ProviderError::new(ProviderErrorKind::Api {
            provider: "scripted".to_string(),
            status: 400,
            message: "unsupported parameter".to_string(),
        }))
    });
    let err = GenerationEngine::new()
        .generate(&generator, request(), &TopicSchema)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 1);
    assert_eq!(err.kind.code(), "PROVIDER_ERROR");
}

#[tokio::test]
async fn test_topic_extractor_sends_source_text() {
    let generator = ScriptedGenerator::always(topics_json());
    let topics = TopicExtractor::default()
        .extract(&generator, "Water evaporates from the sea.")
        .await
        .unwrap();

    assert_eq!(topics.topics[0].title, "The Water Cycle");
    assert!(generator.requests()[0]
        .user_prompt
        .contains("Water evaporates from the sea."));
}

#[tokio::test]
async fn test_planner_truncates_seven_prompts_to_first_five() {
    let generator = ScriptedGenerator::always(plan_json(7));
    let plan = ImagePromptPlanner::default()
        .plan(&generator, "The Water Cycle")
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
    assert_eq!(
        plan.prompt_texts(),
        vec!["sketch 0", "sketch 1", "sketch 2", "sketch 3", "sketch 4"]
    );
}

#[tokio::test]
async fn test_planner_short_count_retries_then_fails() {
    let generator = ScriptedGenerator::always(plan_json(4));
    let err = ImagePromptPlanner::default()
        .plan(&generator, "The Water Cycle")
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 2);
    match err.kind {
        GenerationErrorKind::WrongCount {
            expected, actual, ..
        } => {
            assert_eq!(expected, 5);
            assert_eq!(actual, 4);
        }
        other => panic!("Expected WrongCount, got {:?}", other),
    }
}

#[tokio::test]
async fn test_planner_short_then_full_recovers() {
    let generator = ScriptedGenerator::sequence(vec![plan_json(3), plan_json(5)]);
    let plan = ImagePromptPlanner::default()
        .plan(&generator, "The Water Cycle")
        .await
        .unwrap();

    assert_eq!(generator.calls(), 2);
    assert_eq!(plan.images.len(), 5);
}

#[tokio::test]
async fn test_director_rejects_unknown_asset_then_accepts_valid() {
    let bad = manifest_json().replace("asset_1", "asset_7");
    let generator = ScriptedGenerator::sequence(vec![bad, manifest_json()]);
    let assets = vec!["asset_0".to_string(), "asset_1".to_string()];

    let manifest = LessonDirector::default()
        .direct(&generator, "The Water Cycle", &assets)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 2);
    assert_eq!(manifest.scenes.len(), 2);
    assert!(generator.requests()[0].user_prompt.contains("asset_0, asset_1"));
}

#[tokio::test]
async fn test_director_cross_reference_failure_is_schema_violation() {
    let mut bad: serde_json::Value = serde_json::from_str(&manifest_json()).unwrap();
    bad["scenes"][0]["events"][0]["checkpointId"] = serde_json::json!("c9");
    let bad = bad.to_string();
    let generator = ScriptedGenerator::always(bad);
    let assets = vec!["asset_0".to_string(), "asset_1".to_string()];

    let err = LessonDirector::default()
        .direct(&generator, "The Water Cycle", &assets)
        .await
        .unwrap_err();

    assert_eq!(generator.calls(), 2);
    assert_eq!(err.kind.code(), "SCHEMA_VIOLATION");
    assert!(err.to_string().contains("c9"));
}

#[tokio::test]
async fn test_director_retries_scene_without_narration() {
    let mut silent: serde_json::Value = serde_json::from_str(&manifest_json()).unwrap();
    silent["scenes"][1]["voiceover"][0]["text"] = serde_json::json!("  ");
    let generator = ScriptedGenerator::sequence(vec![silent.to_string(), manifest_json()]);
    let assets = vec!["asset_0".to_string(), "asset_1".to_string()];

    let manifest = LessonDirector::default()
        .direct(&generator, "The Water Cycle", &assets)
        .await
        .unwrap();

    assert_eq!(generator.calls(), 2);
    assert!(manifest.transcript().iter().all(|line| !line.trim().is_empty()));
}
