//! Track validation: structural errors and authoring warnings.
//!
//! Validation is read-only. Errors make a track invalid; warnings are
//! advisory. Thresholds come from [`ValidationThresholds`].

use cuekit_track_model::{EntryId, OverlapCheck, SubtitleEntry, ValidationThresholds};
use serde::{Deserialize, Serialize};

use crate::engine::SubtitleEngine;

/// Structural problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingText,
    InvalidTiming,
    Overlap,
}

/// Authoring heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ShortDuration,
    LongDuration,
    LongText,
    LargeGap,
}

/// One finding, attached to the entry it was raised for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue<K> {
    pub kind: K,
    pub message: String,
    pub entry_id: EntryId,
    /// The other entry involved in an overlap or gap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entry_id: Option<EntryId>,
}

pub type ValidationError = Issue<ErrorKind>;
pub type ValidationWarning = Issue<WarningKind>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn has_error(&self, kind: ErrorKind, entry_id: EntryId) -> bool {
        self.errors
            .iter()
            .any(|e| e.kind == kind && e.entry_id == entry_id)
    }

    pub fn has_warning(&self, kind: WarningKind, entry_id: EntryId) -> bool {
        self.warnings
            .iter()
            .any(|w| w.kind == kind && w.entry_id == entry_id)
    }
}

impl SubtitleEngine {
    /// Validate one track against the configured thresholds.
    /// Returns `None` for an unknown track.
    pub fn validate_track(&self, track_id: &str) -> Option<ValidationReport> {
        let track = self.registry.get(track_id)?;
        Some(validate_entries(&track.entries, &self.config.validation))
    }
}

/// Validate entries that are already sorted by start time.
pub fn validate_entries(
    entries: &[SubtitleEntry],
    thresholds: &ValidationThresholds,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.text.trim().is_empty() {
            errors.push(issue(ErrorKind::MissingText, "Missing text", entry, None));
        }
        if entry.end_time <= entry.start_time {
            errors.push(issue(
                ErrorKind::InvalidTiming,
                format!(
                    "End time {:.3}s is not after start time {:.3}s",
                    entry.end_time, entry.start_time
                ),
                entry,
                None,
            ));
        }

        let later = &entries[i + 1..];
        let overlap_candidates = match thresholds.overlap_check {
            OverlapCheck::Adjacent => &later[..later.len().min(1)],
            OverlapCheck::AllPairs => later,
        };
        for other in overlap_candidates {
            if entry.end_time > other.start_time {
                errors.push(issue(
                    ErrorKind::Overlap,
                    format!("Overlaps entry {}", other.id),
                    entry,
                    Some(other.id),
                ));
            } else if thresholds.overlap_check == OverlapCheck::AllPairs {
                // Sorted by start: no later entry can start before this one ends.
                break;
            }
        }

        let duration = entry.duration();
        if let Some(min) = thresholds.min_duration_seconds {
            if duration < min {
                warnings.push(issue(
                    WarningKind::ShortDuration,
                    format!("Duration {duration:.2}s is below {min}s"),
                    entry,
                    None,
                ));
            }
        }
        if let Some(max) = thresholds.max_duration_seconds {
            if duration > max {
                warnings.push(issue(
                    WarningKind::LongDuration,
                    format!("Duration {duration:.2}s is above {max}s"),
                    entry,
                    None,
                ));
            }
        }

        if let Some(max_chars) = thresholds.max_chars_per_line {
            if entry.lines().any(|l| l.chars().count() > max_chars) {
                warnings.push(issue(
                    WarningKind::LongText,
                    format!("Line longer than {max_chars} characters"),
                    entry,
                    None,
                ));
            }
        }
        if let Some(max_lines) = thresholds.max_lines {
            let lines = entry.lines().count();
            if lines > max_lines {
                warnings.push(issue(
                    WarningKind::LongText,
                    format!("{lines} lines, at most {max_lines} allowed"),
                    entry,
                    None,
                ));
            }
        }

        if let (Some(max_gap), Some(next)) = (thresholds.max_gap_seconds, entries.get(i + 1)) {
            let gap = next.start_time - entry.end_time;
            if gap > max_gap {
                warnings.push(issue(
                    WarningKind::LargeGap,
                    format!("Gap of {gap:.2}s before entry {}", next.id),
                    entry,
                    Some(next.id),
                ));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn issue<K>(
    kind: K,
    message: impl Into<String>,
    entry: &SubtitleEntry,
    related: Option<EntryId>,
) -> Issue<K> {
    Issue {
        kind,
        message: message.into(),
        entry_id: entry.id,
        related_entry_id: related,
    }
}
