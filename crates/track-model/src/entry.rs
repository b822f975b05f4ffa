//! Subtitle entries: one time-coded caption span each.

use cuekit_common::error::{CuekitError, CuekitResult};
use serde::{Deserialize, Serialize};

/// Entry identifier, unique across every track of one engine instance.
pub type EntryId = u64;

/// Shortest span the timing clamps will leave behind (seconds).
pub const MIN_ENTRY_DURATION_SECS: f64 = 0.1;

/// Per-entry or per-track presentation override.
///
/// Every field is optional; unset fields fall back to the track style and
/// then to the engine default style at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    /// Text color as `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Numpad-style alignment (1-9) as used by ASS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<u8>,
}

impl SubtitleStyle {
    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }
}

/// Screen anchor for rendered captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    BottomCenter,
    TopCenter,
    Center,
    /// Explicit `x`/`y` coordinates.
    Custom,
}

/// Where captions sit on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitlePosition {
    pub anchor: Anchor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Vertical margin in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_v: Option<u32>,
    /// Horizontal margin in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_h: Option<u32>,
}

/// A stored caption span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    pub id: EntryId,

    /// Seconds, `>= 0`.
    pub start_time: f64,

    /// Seconds, strictly after `start_time`.
    pub end_time: f64,

    /// Caption text; may contain `\n` line breaks.
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SubtitleStyle>,
}

impl SubtitleEntry {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Lines of text as they would be displayed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Whether this span intersects the half-open range `[start, end)`.
    pub fn intersects(&self, start: f64, end: f64) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Restore `start >= 0` and `end > start` after a lossy time transform.
    pub fn clamp_timing(&mut self) {
        if self.start_time < 0.0 {
            self.start_time = 0.0;
        }
        if self.end_time <= self.start_time {
            self.end_time = self.start_time + MIN_ENTRY_DURATION_SECS;
        }
    }
}

/// Fields for a new entry; the id is assigned on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SubtitleStyle>,
}

impl EntryDraft {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: SubtitleStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Check timing and text rules, timing first.
    pub fn check(&self) -> CuekitResult<()> {
        check_timing(self.start_time, self.end_time)?;
        check_text(&self.text)
    }

    pub fn into_entry(self, id: EntryId) -> SubtitleEntry {
        SubtitleEntry {
            id,
            start_time: self.start_time,
            end_time: self.end_time,
            text: self.text,
            style: self.style,
        }
    }
}

/// Partial update for an existing entry. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub text: Option<String>,
    pub style: Option<SubtitleStyle>,
}

impl EntryPatch {
    pub fn timing(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// The entry that would result from applying this patch.
    pub fn merged(&self, entry: &SubtitleEntry) -> SubtitleEntry {
        SubtitleEntry {
            id: entry.id,
            start_time: self.start_time.unwrap_or(entry.start_time),
            end_time: self.end_time.unwrap_or(entry.end_time),
            text: self.text.clone().unwrap_or_else(|| entry.text.clone()),
            style: self.style.clone().or_else(|| entry.style.clone()),
        }
    }
}

/// `start >= 0`, `end > start`, both finite.
pub fn check_timing(start: f64, end: f64) -> CuekitResult<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
        return Err(CuekitError::invalid_timing(start, end));
    }
    Ok(())
}

/// Text must contain something other than whitespace.
pub fn check_text(text: &str) -> CuekitResult<()> {
    if text.trim().is_empty() {
        return Err(CuekitError::EmptyText);
    }
    Ok(())
}
