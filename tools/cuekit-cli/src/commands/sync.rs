//! Re-synchronize a subtitle file.

use std::path::PathBuf;

use cuekit_formats::SubtitleFormat;
use cuekit_timing_engine::{ExportOptions, SyncParams};
use cuekit_track_model::EngineConfig;

pub async fn run(
    config: EngineConfig,
    file: PathBuf,
    offset: f64,
    speed: f64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let output_path = output.unwrap_or_else(|| file.clone());
    let format = SubtitleFormat::from_path(&output_path)
        .map_err(|e| anyhow::anyhow!("Cannot pick an output format: {e}"))?;

    let (mut engine, track_id) = super::load_track(config, &file, "und", None).await?;
    engine
        .sync_track(
            &track_id,
            SyncParams {
                offset,
                speed_factor: speed,
            },
        )
        .map_err(|e| anyhow::anyhow!("Sync failed: {e}"))?;

    engine
        .export(&ExportOptions {
            format,
            output_path: output_path.clone(),
            track_id,
            include_formatting: false,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output_path.display()))?;

    println!(
        "Synced {} entries (offset {offset:+}s, speed x{speed}): {}",
        engine.total_entries(),
        output_path.display()
    );
    Ok(())
}
