//! SubRip (SRT) parsing and rendering.
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! First caption text
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second caption text
//! with multiple lines
//! ```

use std::sync::OnceLock;

use cuekit_common::Timecode;
use cuekit_track_model::{EntryDraft, SubtitleEntry};
use regex::{Captures, Regex};

pub(crate) fn block_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("block separator pattern is valid"))
}

fn timing_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})")
            .expect("srt timing pattern is valid")
    })
}

/// Parse SRT content into drafts.
///
/// A block needs an index line (ignored), a timing line and at least one
/// text line; anything else is skipped without error.
pub fn parse(content: &str) -> Vec<EntryDraft> {
    let content = crate::normalize_newlines(content);
    let mut drafts = Vec::new();
    let mut skipped = 0usize;

    for block in block_separator().split(content.trim()) {
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() < 3 {
            skipped += 1;
            continue;
        }
        let Some(caps) = timing_line().captures(lines[1]) else {
            skipped += 1;
            continue;
        };
        drafts.push(EntryDraft::new(
            captured_secs(&caps, 1),
            captured_secs(&caps, 5),
            lines[2..].join("\n"),
        ));
    }

    if skipped > 0 {
        tracing::debug!(skipped, parsed = drafts.len(), "Skipped malformed SRT blocks");
    }
    drafts
}

/// Seconds from four consecutive capture groups starting at `first`.
fn captured_secs(caps: &Captures<'_>, first: usize) -> f64 {
    let field = |i: usize| -> u64 {
        caps.get(first + i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    Timecode::from_fields(field(0), field(1), field(2), field(3))
}

/// Render entries as SRT, numbering blocks from 1.
pub fn render(entries: &[SubtitleEntry], include_formatting: bool) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let text = if include_formatting {
                formatted_text(entry)
            } else {
                crate::cue_text(&entry.text)
            };
            format!(
                "{}\n{} --> {}\n{}",
                i + 1,
                format_time(entry.start_time),
                format_time(entry.end_time),
                text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Bold is applied first, so bold+italic renders as `<i><b>..</b></i>`.
fn formatted_text(entry: &SubtitleEntry) -> String {
    let mut text = crate::cue_text(&entry.text);
    if let Some(style) = &entry.style {
        if style.is_bold() {
            text = format!("<b>{text}</b>");
        }
        if style.is_italic() {
            text = format!("<i>{text}</i>");
        }
    }
    text
}

/// Format seconds as SRT timestamp: HH:MM:SS,mmm
pub fn format_time(secs: f64) -> String {
    Timecode::from_secs(secs).display_millis(',').to_string()
}
