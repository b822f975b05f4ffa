//! Tracks and the in-memory track registry.
//!
//! The registry owns every track of one engine instance, in creation order,
//! together with the single counter that hands out entry ids. It enforces
//! the "at most one default track" rule on every create/update path.

use serde::{Deserialize, Serialize};

use crate::entry::{EntryId, SubtitleEntry, SubtitlePosition, SubtitleStyle};

/// A named collection of entries for one language/purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque unique identifier (`track-<uuid>`).
    pub id: String,

    /// Language tag (e.g., "pt-BR"). Not checked against a locale registry.
    pub language: String,

    /// Human-readable label.
    pub label: String,

    pub is_default: bool,

    /// Entries, sorted ascending by `start_time`.
    pub entries: Vec<SubtitleEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SubtitleStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SubtitlePosition>,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl Track {
    fn new(language: impl Into<String>, label: impl Into<String>, is_default: bool) -> Self {
        Self {
            id: format!("track-{}", uuid::Uuid::new_v4().simple()),
            language: language.into(),
            label: label.into(),
            is_default,
            entries: Vec::new(),
            style: None,
            position: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn entry(&self, id: EntryId) -> Option<&SubtitleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut SubtitleEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Stable sort by start time; equal starts keep insertion order.
    pub fn sort_entries(&mut self) {
        self.entries
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Entries intersecting `[start, end)`, in stored order.
    pub fn entries_in_range(&self, start: f64, end: f64) -> Vec<&SubtitleEntry> {
        self.entries
            .iter()
            .filter(|e| e.intersects(start, end))
            .collect()
    }

    /// End time of the last-ending entry, or 0 for an empty track.
    pub fn duration_secs(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_time)
            .fold(0.0, f64::max)
    }
}

/// Partial update for track metadata. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPatch {
    pub language: Option<String>,
    pub label: Option<String>,
    pub is_default: Option<bool>,
    pub style: Option<SubtitleStyle>,
    pub position: Option<SubtitlePosition>,
}

/// In-memory collection of tracks plus the global entry-id counter.
#[derive(Debug, Clone)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
    next_entry_id: EntryId,
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_entry_id: 1,
        }
    }

    /// Create an empty track.
    ///
    /// Creating a default track clears the flag on every other track.
    pub fn create(
        &mut self,
        language: impl Into<String>,
        label: impl Into<String>,
        is_default: bool,
    ) -> &Track {
        if is_default {
            self.clear_default_flags();
        }
        self.tracks.push(Track::new(language, label, is_default));
        let idx = self.tracks.len() - 1;
        &self.tracks[idx]
    }

    /// Remove a track and its entries. Returns false if it did not exist.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != id);
        self.tracks.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// All tracks in creation order.
    pub fn list_all(&self) -> &[Track] {
        &self.tracks
    }

    /// The flagged default track, else the first-created track.
    pub fn default_track(&self) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.is_default)
            .or_else(|| self.tracks.first())
    }

    /// Apply a metadata patch. Returns false if the track does not exist.
    pub fn update(&mut self, id: &str, patch: TrackPatch) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if patch.is_default == Some(true) {
            self.clear_default_flags();
        }
        let Some(track) = self.get_mut(id) else {
            return false;
        };
        if let Some(language) = patch.language {
            track.language = language;
        }
        if let Some(label) = patch.label {
            track.label = label;
        }
        if let Some(is_default) = patch.is_default {
            track.is_default = is_default;
        }
        if let Some(style) = patch.style {
            track.style = Some(style);
        }
        if let Some(position) = patch.position {
            track.position = Some(position);
        }
        true
    }

    /// Discard every track. The entry-id counter keeps counting.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Hand out the next entry id.
    pub fn allocate_entry_id(&mut self) -> EntryId {
        let id = self.next_entry_id;
        self.next_entry_id += 1;
        id
    }

    /// Number of entries across all tracks.
    pub fn total_entries(&self) -> usize {
        self.tracks.iter().map(|t| t.entries.len()).sum()
    }

    fn clear_default_flags(&mut self) {
        for track in &mut self.tracks {
            track.is_default = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryDraft;

    #[test]
    fn test_create_assigns_prefixed_unique_ids() {
        let mut registry = TrackRegistry::new();
        let a = registry.create("pt-BR", "Português", false).id.clone();
        let b = registry.create("pt-BR", "Português", false).id.clone();
        assert!(a.starts_with("track-"));
        assert_ne!(a, b);
        assert_eq!(registry.list_all().len(), 2);
    }

    #[test]
    fn test_new_default_clears_previous_default() {
        let mut registry = TrackRegistry::new();
        let first = registry.create("en-US", "English", true).id.clone();
        let second = registry.create("es-ES", "Español", true).id.clone();

        assert!(!registry.get(&first).unwrap().is_default);
        assert!(registry.get(&second).unwrap().is_default);
        assert_eq!(registry.default_track().unwrap().id, second);
    }

    #[test]
    fn test_default_falls_back_to_first_created() {
        let mut registry = TrackRegistry::new();
        assert!(registry.default_track().is_none());
        let first = registry.create("en-US", "English", false).id.clone();
        registry.create("es-ES", "Español", false);
        assert_eq!(registry.default_track().unwrap().id, first);
    }

    #[test]
    fn test_update_default_is_exclusive() {
        let mut registry = TrackRegistry::new();
        let a = registry.create("en-US", "English", true).id.clone();
        let b = registry.create("es-ES", "Español", false).id.clone();

        assert!(registry.update(
            &b,
            TrackPatch {
                is_default: Some(true),
                label: Some("Castellano".to_string()),
                ..Default::default()
            }
        ));
        assert!(!registry.get(&a).unwrap().is_default);
        let b = registry.get(&b).unwrap();
        assert!(b.is_default);
        assert_eq!(b.label, "Castellano");
        assert_eq!(registry.list_all().iter().filter(|t| t.is_default).count(), 1);
    }

    #[test]
    fn test_update_missing_track_returns_false() {
        let mut registry = TrackRegistry::new();
        assert!(!registry.update("track-missing", TrackPatch::default()));
    }

    #[test]
    fn test_remove() {
        let mut registry = TrackRegistry::new();
        let id = registry.create("en-US", "English", false).id.clone();
        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn test_entry_ids_keep_counting_after_clear() {
        let mut registry = TrackRegistry::new();
        assert_eq!(registry.allocate_entry_id(), 1);
        assert_eq!(registry.allocate_entry_id(), 2);
        registry.clear();
        assert_eq!(registry.allocate_entry_id(), 3);
    }

    #[test]
    fn test_sort_entries_is_stable() {
        let mut registry = TrackRegistry::new();
        let id = registry.create("en-US", "English", false).id.clone();
        let track = registry.get_mut(&id).unwrap();
        track.entries.push(EntryDraft::new(5.0, 6.0, "b").into_entry(1));
        track.entries.push(EntryDraft::new(1.0, 2.0, "a").into_entry(2));
        track.entries.push(EntryDraft::new(5.0, 7.0, "c").into_entry(3));
        track.sort_entries();

        let ids: Vec<_> = track.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(track.duration_secs(), 7.0);
    }
}
