//! File input and output for command handlers.

use chalkboard::{
    AiAgentsConfig, ChalkboardConfig, ChalkboardResult, GeneratedAsset, IoError, LessonBundle,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> ChalkboardResult<String> {
    fs::read_to_string(path)
        .map_err(|e| IoError::new(format!("{}: {}", path.display(), e)).into())
}

/// Load per-stage provider overrides, filling image-tool defaults from config.
pub fn load_agents(
    path: Option<&Path>,
    config: &ChalkboardConfig,
) -> ChalkboardResult<AiAgentsConfig> {
    let Some(path) = path else {
        return Ok(AiAgentsConfig::default());
    };
    let raw = read_text(path)?;
    let mut agents: AiAgentsConfig = serde_json::from_str(&raw)
        .map_err(|e| chalkboard::ConfigError::new(format!("{}: {}", path.display(), e)))?;

    for stage in [
        &mut agents.librarian,
        &mut agents.image_steering,
        &mut agents.ai_director,
        &mut agents.image_generation,
    ] {
        if let Some(wire) = stage.as_mut() {
            config.providers.fill_image_tool_defaults(wire);
        }
    }
    debug!(path = %path.display(), "Loaded provider overrides");
    Ok(agents)
}

/// Write bytes, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> ChalkboardResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| IoError::new(format!("{}: {}", parent.display(), e)))?;
    }
    fs::write(path, bytes).map_err(|e| IoError::new(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn to_json<T: serde::Serialize>(value: &T) -> ChalkboardResult<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| IoError::new(format!("serialization failed: {}", e)).into())
}

/// Write `asset_{i}.png` for each asset plus a storyboard description.
pub fn write_assets(out: &Path, storyboard: &Value, assets: &[GeneratedAsset]) -> ChalkboardResult<()> {
    for asset in assets {
        write_bytes(&out.join(format!("{}.png", asset.asset_id)), &asset.png)?;
    }
    write_bytes(&out.join("storyboard.json"), &to_json(storyboard)?)
}

/// Write the manifest, transcript and narration audio.
pub fn write_bundle(out: &Path, bundle: &LessonBundle) -> ChalkboardResult<()> {
    write_bytes(&out.join("manifest.json"), &to_json(&bundle.lesson_manifest)?)?;
    write_bytes(
        &out.join("transcript.txt"),
        bundle.transcript.join("\n").as_bytes(),
    )?;
    write_bytes(&out.join("reconciliation.json"), &to_json(&bundle.reconciliation)?)?;
    if !bundle.audio.is_empty() {
        write_bytes(&out.join("narration.mp3"), &bundle.audio)?;
    }
    Ok(())
}
