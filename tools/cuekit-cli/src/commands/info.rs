//! Show subtitle file information.

use std::path::PathBuf;

use cuekit_common::Timecode;
use cuekit_track_model::EngineConfig;

pub async fn run(config: EngineConfig, file: PathBuf) -> anyhow::Result<()> {
    let (engine, track_id) = super::load_track(config, &file, "und", None).await?;
    let track = engine
        .track(&track_id)
        .ok_or_else(|| anyhow::anyhow!("Track not loaded"))?;

    println!("File: {}", file.display());
    println!("  Entries: {}", track.entries.len());
    if let Some(first) = track.entries.first() {
        println!(
            "  First cue: {}",
            Timecode::from_secs(first.start_time).display_millis(',')
        );
        println!(
            "  Last cue ends: {}",
            Timecode::from_secs(track.duration_secs()).display_millis(',')
        );
        let spoken: f64 = track.entries.iter().map(|e| e.duration()).sum();
        println!("  Duration: {:.1}s ({spoken:.1}s with text)", track.duration_secs());
        let longest = track
            .entries
            .iter()
            .flat_map(|e| e.lines())
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        println!("  Longest line: {longest} characters");
    }
    Ok(())
}
