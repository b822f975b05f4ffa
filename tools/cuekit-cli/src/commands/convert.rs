//! Convert a subtitle file to another format.

use std::path::PathBuf;

use cuekit_formats::SubtitleFormat;
use cuekit_timing_engine::ExportOptions;
use cuekit_track_model::EngineConfig;

pub async fn run(
    config: EngineConfig,
    file: PathBuf,
    to: String,
    output: Option<PathBuf>,
    formatting: bool,
) -> anyhow::Result<()> {
    let format: SubtitleFormat = to
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown format: {to}. Use: srt, vtt, ass"))?;
    let output_path = output.unwrap_or_else(|| file.with_extension(format.extension()));

    let (engine, track_id) = super::load_track(config, &file, "und", None).await?;
    engine
        .export(&ExportOptions {
            format,
            output_path: output_path.clone(),
            track_id,
            include_formatting: formatting,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output_path.display()))?;

    println!(
        "Converted {} entries: {} -> {}",
        engine.total_entries(),
        file.display(),
        output_path.display()
    );
    Ok(())
}
