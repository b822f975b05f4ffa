//! Embed subtitle files into a video.

use std::path::{Path, PathBuf};

use cuekit_embed_engine::EmbedCoordinator;
use cuekit_timing_engine::EngineEvent;
use cuekit_track_model::{EmbedRequest, EngineConfig};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: EngineConfig,
    video: PathBuf,
    subtitles: PathBuf,
    output: PathBuf,
    burn_in: bool,
    language: String,
    label: Option<String>,
    extra: Vec<String>,
) -> anyhow::Result<()> {
    if !video.exists() {
        return Err(anyhow::anyhow!("Video not found: {}", video.display()));
    }
    if burn_in && !extra.is_empty() {
        return Err(anyhow::anyhow!("--extra tracks need a soft subtitle stream, not --burn-in"));
    }
    let (mut engine, track_id) =
        super::load_track(config, &subtitles, &language, label.as_deref()).await?;

    let mut extra_track_ids = Vec::with_capacity(extra.len());
    for arg in &extra {
        let (language, file) = parse_extra(arg);
        let label = file.file_stem().and_then(|s| s.to_str()).unwrap_or("subtitles");
        let track = engine.create_track(language, label, false);
        engine
            .import_file(&track, file)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", file.display()))?;
        extra_track_ids.push(track);
    }

    println!("Embedding {} into {}", subtitles.display(), video.display());
    println!("  Mode: {}", if burn_in { "burn-in" } else { "soft subtitle stream" });
    println!("  Tracks: {}", 1 + extra_track_ids.len());
    println!("  Output: {}", output.display());

    let mut rx = engine.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                EngineEvent::EmbedProgress { progress, .. } => {
                    print!("\r  Progress: {:.1}s written  ", progress.out_time_secs);
                }
                EngineEvent::EmbedComplete { .. } | EngineEvent::EmbedError { .. } => break,
                _ => {}
            }
        }
    });

    let coordinator: EmbedCoordinator = EmbedCoordinator::default();
    let mut request = EmbedRequest::new(video, output, track_id);
    request.extra_track_ids = extra_track_ids;
    request.burn_in = burn_in;
    let result = coordinator.embed_subtitles(&engine, &request).await;
    // Closing the bus lets the printer drain and exit.
    drop(engine);
    let _ = printer.await;
    let outcome = result.map_err(|e| anyhow::anyhow!("\nEmbed failed: {e}"))?;

    println!(
        "\nEmbed complete: {} ({} track(s))",
        outcome.output_path.display(),
        outcome.tracks_embedded
    );
    Ok(())
}

/// `LANG=FILE` or a bare `FILE` (language `und`).
fn parse_extra(arg: &str) -> (&str, &Path) {
    match arg.split_once('=') {
        Some((language, file)) if !language.is_empty() && !language.contains(['/', '\\']) => {
            (language, Path::new(file))
        }
        _ => ("und", Path::new(arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra_track_argument() {
        assert_eq!(parse_extra("en-US=subs/en.srt"), ("en-US", Path::new("subs/en.srt")));
        assert_eq!(parse_extra("subs/en.srt"), ("und", Path::new("subs/en.srt")));
        assert_eq!(parse_extra("./a=b.srt"), ("und", Path::new("./a=b.srt")));
    }
}
