//! WebVTT parsing and rendering.

use std::sync::OnceLock;

use cuekit_common::Timecode;
use cuekit_track_model::{EntryDraft, SubtitleEntry};
use regex::{Captures, Regex};

/// Magic first line of every WebVTT file.
pub const HEADER: &str = "WEBVTT";

fn timing_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})\s+-->\s+(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})",
        )
        .expect("vtt timing pattern is valid")
    })
}

/// Render entries as WebVTT: header, blank line, unnumbered cue blocks.
pub fn render(entries: &[SubtitleEntry]) -> String {
    let body = entries
        .iter()
        .map(|entry| {
            format!(
                "{} --> {}\n{}",
                format_time(entry.start_time),
                format_time(entry.end_time),
                crate::cue_text(&entry.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{HEADER}\n\n{body}")
}

/// Parse WebVTT content into drafts.
///
/// Cue identifiers, cue settings after the end time, and `NOTE`/`STYLE`/
/// `REGION` blocks are ignored. Cues without text are skipped.
pub fn parse(content: &str) -> Vec<EntryDraft> {
    let content = crate::normalize_newlines(content);
    let mut drafts = Vec::new();
    let mut blocks = crate::srt::block_separator().split(content.trim());

    // The first block is the header (and any header metadata).
    match blocks.next() {
        Some(first) if first.starts_with(HEADER) => {}
        _ => {
            tracing::debug!("WebVTT content is missing its header");
            return drafts;
        }
    }

    for block in blocks {
        let lines: Vec<&str> = block.lines().collect();
        let Some(timing_idx) = lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };
        let Some(caps) = timing_line().captures(lines[timing_idx].trim()) else {
            continue;
        };
        let text = lines[timing_idx + 1..].join("\n");
        if text.trim().is_empty() {
            continue;
        }
        drafts.push(EntryDraft::new(
            captured_secs(&caps, 1),
            captured_secs(&caps, 5),
            text,
        ));
    }
    drafts
}

fn captured_secs(caps: &Captures<'_>, first: usize) -> f64 {
    let field = |i: usize| -> u64 {
        caps.get(first + i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    Timecode::from_fields(field(0), field(1), field(2), field(3))
}

/// Format seconds as VTT timestamp: HH:MM:SS.mmm
pub fn format_time(secs: f64) -> String {
    Timecode::from_secs(secs).display_millis('.').to_string()
}
