//! Validate a subtitle file.

use std::path::PathBuf;

use cuekit_common::Timecode;
use cuekit_track_model::EngineConfig;

pub async fn run(config: EngineConfig, file: PathBuf) -> anyhow::Result<()> {
    println!("Validating: {}", file.display());

    let (engine, track_id) = super::load_track(config, &file, "und", None).await?;
    let report = engine
        .validate_track(&track_id)
        .ok_or_else(|| anyhow::anyhow!("Track disappeared during validation"))?;
    let track = engine
        .track(&track_id)
        .ok_or_else(|| anyhow::anyhow!("Track disappeared during validation"))?;

    let at = |entry_id| {
        track
            .entry(entry_id)
            .map(|e| Timecode::from_secs(e.start_time).display_millis(',').to_string())
            .unwrap_or_default()
    };

    println!("  Entries: {}", track.entries.len());
    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("  - [{}] {:?}: {}", at(error.entry_id), error.kind, error.message);
        }
    }
    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!(
                "  - [{}] {:?}: {}",
                at(warning.entry_id),
                warning.kind,
                warning.message
            );
        }
    }

    if report.is_valid {
        println!(
            "\nSubtitles are valid ({} warning(s)).",
            report.warnings.len()
        );
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} error(s) found in {}",
            report.errors.len(),
            file.display()
        ))
    }
}
