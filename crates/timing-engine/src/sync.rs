//! Re-synchronization: linear time transforms over a track or one entry.
//!
//! Both transforms end with the same lossy clamp (`start >= 0`,
//! `end > start`). They do not re-run validation.

use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_track_model::{check_timing, EntryId, SubtitleEntry};
use serde::{Deserialize, Serialize};

use crate::engine::SubtitleEngine;
use crate::events::EngineEvent;

/// `new = old * speed_factor + offset`, applied to start and end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncParams {
    /// Seconds added after scaling.
    pub offset: f64,
    /// Multiplier applied to both times; must be positive.
    pub speed_factor: f64,
}

impl Default for SyncParams {
    fn default() -> Self {
        Self {
            offset: 0.0,
            speed_factor: 1.0,
        }
    }
}

impl SyncParams {
    pub fn offset(offset: f64) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    fn check(&self) -> CuekitResult<()> {
        if !self.offset.is_finite() {
            return Err(CuekitError::invalid_parameter(format!(
                "sync offset must be finite, got {}",
                self.offset
            )));
        }
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(CuekitError::invalid_parameter(format!(
                "speed factor must be a positive number, got {}",
                self.speed_factor
            )));
        }
        Ok(())
    }
}

impl SubtitleEngine {
    /// Transform every entry of a track in place.
    ///
    /// Returns `Ok(false)` for an unknown track. If any transformed entry
    /// is out of range even after the clamp, the track is left untouched and
    /// `InvalidParameter` is returned.
    pub fn sync_track(&mut self, track_id: &str, params: SyncParams) -> CuekitResult<bool> {
        params.check()?;
        let Some(track) = self.registry.get_mut(track_id) else {
            return Ok(false);
        };

        let transform = |t: f64| t * params.speed_factor + params.offset;
        let shifted = track
            .entries
            .iter()
            .map(|e| shifted_entry(e, transform(e.start_time), transform(e.end_time)))
            .collect::<CuekitResult<Vec<_>>>()?;
        track.entries = shifted;
        track.sort_entries();
        tracing::debug!(
            track_id,
            offset = params.offset,
            speed_factor = params.speed_factor,
            entries = track.entries.len(),
            "Track synced"
        );

        self.emit(EngineEvent::TrackSynced {
            track_id: track_id.to_string(),
            params,
        });
        Ok(true)
    }

    /// Shift one entry's start by `offset_start` and its end by `offset_end`.
    ///
    /// `offset_end: None` shifts the end by `offset_start` as well, moving the
    /// entry as a whole; `Some(0.0)` leaves the end where it is. Returns
    /// `Ok(false)` when the track or entry does not exist, and
    /// `InvalidParameter` for offsets that are not finite or would push a
    /// time out of range.
    pub fn adjust_entry_timing(
        &mut self,
        track_id: &str,
        entry_id: EntryId,
        offset_start: f64,
        offset_end: Option<f64>,
    ) -> CuekitResult<bool> {
        let offset_end = offset_end.unwrap_or(offset_start);
        if !offset_start.is_finite() || !offset_end.is_finite() {
            return Err(CuekitError::invalid_parameter(format!(
                "timing offsets must be finite, got {offset_start} / {offset_end}"
            )));
        }
        let Some(track) = self.registry.get_mut(track_id) else {
            return Ok(false);
        };
        let Some(entry) = track.entry_mut(entry_id) else {
            return Ok(false);
        };

        *entry = shifted_entry(
            entry,
            entry.start_time + offset_start,
            entry.end_time + offset_end,
        )?;
        let adjusted = entry.clone();
        track.sort_entries();
        tracing::debug!(
            track_id,
            entry_id,
            start = adjusted.start_time,
            end = adjusted.end_time,
            "Entry timing adjusted"
        );

        self.emit(EngineEvent::EntryAdjusted {
            track_id: track_id.to_string(),
            entry: adjusted,
        });
        Ok(true)
    }
}

/// `entry` moved to `start..end` and clamped. Times that overflowed are
/// rejected since the clamp cannot repair them.
fn shifted_entry(entry: &SubtitleEntry, start: f64, end: f64) -> CuekitResult<SubtitleEntry> {
    let mut shifted = SubtitleEntry {
        start_time: start,
        end_time: end,
        ..entry.clone()
    };
    shifted.clamp_timing();
    check_timing(shifted.start_time, shifted.end_time).map_err(|_| {
        CuekitError::invalid_parameter(format!(
            "transformed timing is out of range: {start} --> {end}"
        ))
    })?;
    Ok(shifted)
}
