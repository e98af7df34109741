//! Tests for lesson manifest validation rules.

use chalkboard_core::{
    Interaction, InteractionType, LessonManifest, Scene, ScaleHint, VisualEvent, VisualEventType,
    VisualRole, VoiceoverSegment, Zone, asset_id, validate_manifest,
};
use chalkboard_error::ManifestErrorKind;

fn segment(checkpoint: &str) -> VoiceoverSegment {
    VoiceoverSegment {
        text: format!("Narration for {}", checkpoint),
        checkpoint_id: checkpoint.to_string(),
    }
}

fn event(asset: &str, checkpoint: &str) -> VisualEvent {
    VisualEvent {
        kind: VisualEventType::Draw,
        asset_id: asset.to_string(),
        checkpoint_id: checkpoint.to_string(),
        zone: Zone::CenterMain,
        role: VisualRole::PrimaryDiagram,
        scale_hint: ScaleHint::Large,
        params: Default::default(),
    }
}

fn scene(id: &str, interaction: InteractionType) -> Scene {
    Scene {
        scene_id: id.to_string(),
        purpose: "Explain".to_string(),
        assets_used: vec![asset_id(0)],
        voiceover: vec![segment("c1"), segment("c2")],
        events: vec![event("asset_0", "c1")],
        interaction: Interaction {
            kind: interaction,
            prompt: Some("What happens next?".to_string()),
            options: vec![],
            correct_answer: None,
        },
    }
}

fn manifest(duration: f64, scenes: usize) -> LessonManifest {
    LessonManifest {
        lesson_duration_sec: duration,
        scenes: (0..scenes)
            .map(|i| {
                let kind = if i == 0 {
                    InteractionType::Quiz
                } else {
                    InteractionType::None
                };
                scene(&format!("scene_{}", i + 1), kind)
            })
            .collect(),
    }
}

fn known() -> Vec<String> {
    (0..5).map(asset_id).collect()
}

#[test]
fn test_duration_boundary_inclusive() {
    assert!(validate_manifest(&manifest(180.0, 3), None).is_ok());

    let err = validate_manifest(&manifest(180.01, 3), None).unwrap_err();
    assert!(matches!(err.kind, ManifestErrorKind::Duration { .. }));
    assert_eq!(err.kind.rule(), "duration");
}

#[test]
fn test_non_positive_duration_rejected() {
    assert!(validate_manifest(&manifest(0.0, 1), None).is_err());
    assert!(validate_manifest(&manifest(-5.0, 1), None).is_err());
    assert!(validate_manifest(&manifest(f64::NAN, 1), None).is_err());
}

#[test]
fn test_scene_count_bounds() {
    let err = validate_manifest(&manifest(60.0, 0), None).unwrap_err();
    assert_eq!(err.kind, ManifestErrorKind::SceneCount { count: 0, max: 5 });

    let err = validate_manifest(&manifest(60.0, 6), None).unwrap_err();
    assert_eq!(err.kind, ManifestErrorKind::SceneCount { count: 6, max: 5 });

    assert!(validate_manifest(&manifest(60.0, 1), None).is_ok());
    assert!(validate_manifest(&manifest(60.0, 5), None).is_ok());
}

#[test]
fn test_event_only_checkpoint_rejected() {
    let mut m = manifest(90.0, 2);
    m.scenes[1].events.push(event("asset_1", "c9"));
    m.scenes[1].events.push(event("asset_1", "c7"));

    let err = validate_manifest(&m, None).unwrap_err();
    match err.kind {
        ManifestErrorKind::CheckpointMismatch {
            scene_number,
            scene_id,
            missing,
        } => {
            assert_eq!(scene_number, 2);
            assert_eq!(scene_id, "scene_2");
            assert_eq!(missing, vec!["c7".to_string(), "c9".to_string()]);
        }
        other => panic!("Expected CheckpointMismatch, got {:?}", other),
    }
}

#[test]
fn test_voiceover_only_checkpoint_allowed() {
    let mut m = manifest(90.0, 1);
    m.scenes[0].voiceover.push(segment("narration_only"));
    m.scenes[0].events.clear();
    assert!(validate_manifest(&m, Some(known().as_slice())).is_ok());
}

#[test]
fn test_checkpoints_are_scoped_per_scene() {
    let mut m = manifest(90.0, 2);
    // c5 exists in scene 1's voiceover but the event lives in scene 2
    m.scenes[0].voiceover.push(segment("c5"));
    m.scenes[1].events.push(event("asset_2", "c5"));
    assert!(validate_manifest(&m, None).is_err());
}

#[test]
fn test_interaction_required() {
    let mut m = manifest(90.0, 3);
    m.scenes[0].interaction.kind = InteractionType::None;

    let err = validate_manifest(&m, None).unwrap_err();
    assert_eq!(err.kind, ManifestErrorKind::MissingInteraction);
    assert_eq!(err.kind.code(), "MISSING_INTERACTION");

    m.scenes[2].interaction.kind = InteractionType::PauseAndThink;
    assert!(validate_manifest(&m, None).is_ok());
}

#[test]
fn test_unknown_asset_rejected_when_assets_known() {
    let mut m = manifest(90.0, 1);
    m.scenes[0].events.push(event("asset_7", "c2"));

    assert!(validate_manifest(&m, None).is_ok());

    let err = validate_manifest(&m, Some(known().as_slice())).unwrap_err();
    assert!(matches!(
        err.kind,
        ManifestErrorKind::UnknownAsset { ref asset_id, .. } if asset_id == "asset_7"
    ));
}

#[test]
fn test_padded_asset_id_is_not_a_known_asset() {
    let mut m = manifest(90.0, 1);
    m.scenes[0].events.push(event(" asset_2 ", "c2"));

    let err = validate_manifest(&m, Some(known().as_slice())).unwrap_err();
    assert!(matches!(
        err.kind,
        ManifestErrorKind::UnknownAsset { ref asset_id, .. } if asset_id == " asset_2 "
    ));
}

#[test]
fn test_scene_without_narration_text_rejected() {
    let mut m = manifest(90.0, 2);
    for seg in &mut m.scenes[1].voiceover {
        seg.text = "   ".to_string();
    }

    let err = validate_manifest(&m, None).unwrap_err();
    assert_eq!(
        err.kind,
        ManifestErrorKind::SilentScene {
            scene_number: 2,
            scene_id: "scene_2".to_string(),
        }
    );
    assert_eq!(err.kind.code(), "EMPTY_NARRATION");

    m.scenes[1].voiceover[0].text = "Rain falls.".to_string();
    assert!(validate_manifest(&m, None).is_ok());
}

#[test]
fn test_empty_asset_id_rejected() {
    let mut m = manifest(90.0, 1);
    m.scenes[0].events.push(event("  ", "c2"));
    let err = validate_manifest(&m, None).unwrap_err();
    assert!(matches!(err.kind, ManifestErrorKind::EmptyAssetId { scene_number: 1, .. }));
}

#[test]
fn test_manifest_parses_camel_case_wire_format() {
    let json = r#"{
        "durationSec": 45.5,
        "scenes": [{
            "sceneId": "s1",
            "purpose": "Intro",
            "assetsUsed": ["asset_0"],
            "voiceover": [{"text": "Hello", "checkpointId": "c1"}],
            "events": [{
                "type": "fadeIn",
                "assetId": "asset_0",
                "checkpointId": "c1",
                "zone": "leftSupport",
                "role": "supportingDiagram",
                "scaleHint": "medium"
            }],
            "interaction": {"type": "labelPrediction", "options": ["a", "b"], "correctAnswer": "a"}
        }]
    }"#;

    let m: LessonManifest = serde_json::from_str(json).unwrap();
    assert_eq!(m.lesson_duration_sec, 45.5);
    assert_eq!(m.scenes[0].events[0].kind, VisualEventType::FadeIn);
    assert!(m.scenes[0].events[0].params.is_empty());
    assert!(validate_manifest(&m, Some(known().as_slice())).is_ok());

    let out = serde_json::to_value(&m).unwrap();
    assert_eq!(out["lessonDurationSec"], 45.5);
    assert_eq!(out["scenes"][0]["events"][0]["type"], "fadeIn");
}
