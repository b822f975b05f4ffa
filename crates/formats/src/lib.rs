//! Cuekit Format Codecs
//!
//! Text grammars for subtitle tracks:
//! - **SRT:** numbered blocks, `HH:MM:SS,mmm` timecodes (import + export)
//! - **WebVTT:** `WEBVTT` header, `HH:MM:SS.mmm` timecodes (import + export)
//! - **ASS:** fixed script skeleton, `H:MM:SS.cc` timecodes (export only)
//!
//! Every grammar derives its timecodes from [`cuekit_common::Timecode`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_track_model::{EntryDraft, Track};
use serde::{Deserialize, Serialize};

pub mod ass;
pub mod srt;
pub mod vtt;

/// Supported subtitle grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Vtt,
    Ass,
}

impl SubtitleFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
        }
    }

    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> CuekitResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = CuekitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            _ => Err(CuekitError::unsupported_format(s)),
        }
    }
}

/// Export switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Wrap bold/italic SRT entries in `<b>`/`<i>` tags.
    #[serde(default)]
    pub include_formatting: bool,
}

/// Serialize a track's entries, in stored order.
pub fn render(track: &Track, format: SubtitleFormat, options: RenderOptions) -> String {
    match format {
        SubtitleFormat::Srt => srt::render(&track.entries, options.include_formatting),
        SubtitleFormat::Vtt => vtt::render(&track.entries),
        SubtitleFormat::Ass => ass::render(&track.label, &track.entries),
    }
}

/// Parse file content into entry drafts. Malformed blocks are skipped.
pub fn parse(content: &str, format: SubtitleFormat) -> CuekitResult<Vec<EntryDraft>> {
    match format {
        SubtitleFormat::Srt => Ok(srt::parse(content)),
        SubtitleFormat::Vtt => Ok(vtt::parse(content)),
        SubtitleFormat::Ass => Err(CuekitError::unsupported_format("ass (import)")),
    }
}

/// Unify line endings so block splitting only has to handle `\n`.
pub(crate) fn normalize_newlines(content: &str) -> String {
    content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Cue text with blank lines dropped, since a blank line ends an SRT or
/// WebVTT block.
pub(crate) fn cue_text(text: &str) -> String {
    let text = normalize_newlines(text);
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
