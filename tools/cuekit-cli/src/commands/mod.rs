//! Subcommand implementations.

use std::path::Path;

use cuekit_timing_engine::SubtitleEngine;
use cuekit_track_model::EngineConfig;

pub mod convert;
pub mod embed;
pub mod info;
pub mod sync;
pub mod validate;

/// Load one subtitle file into a fresh engine as its only (default) track.
pub async fn load_track(
    config: EngineConfig,
    file: &Path,
    language: &str,
    label: Option<&str>,
) -> anyhow::Result<(SubtitleEngine, String)> {
    let label = label
        .or_else(|| file.file_stem().and_then(|s| s.to_str()))
        .unwrap_or("subtitles");

    let mut engine = SubtitleEngine::new(config);
    let track = engine.create_track(language, label, true);
    let count = engine
        .import_file(&track, file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", file.display()))?;
    tracing::debug!(file = %file.display(), count, "Subtitle file loaded");
    Ok((engine, track))
}
