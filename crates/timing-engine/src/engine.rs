//! The subtitle engine: track registry access and entry timing rules.

use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_track_model::{
    check_text, check_timing, EngineConfig, EngineConfigPatch, EntryDraft, EntryId, EntryPatch,
    SubtitleEntry, Track, TrackPatch, TrackRegistry,
};
use tokio::sync::broadcast;

use crate::events::{EngineEvent, EventBus};

/// In-memory subtitle engine.
///
/// Entries of every track stay sorted by start time after each mutation,
/// and no stored entry ever has `start < 0` or `end <= start`.
#[derive(Debug)]
pub struct SubtitleEngine {
    pub(crate) registry: TrackRegistry,
    pub(crate) config: EngineConfig,
    events: EventBus,
}

impl Default for SubtitleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SubtitleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: TrackRegistry::new(),
            config,
            events: EventBus::default(),
        }
    }

    /// Engine preloaded with Portuguese (default), English and Spanish tracks.
    pub fn multi_language() -> Self {
        let mut engine = Self::default();
        engine.create_track("pt-BR", "Português", true);
        engine.create_track("en-US", "English", false);
        engine.create_track("es-ES", "Español", false);
        engine
    }

    // Configuration

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn update_config(&mut self, patch: EngineConfigPatch) {
        patch.apply(&mut self.config);
        tracing::debug!(auto_validate = self.config.auto_validate, "Engine config updated");
        self.events.emit(EngineEvent::ConfigUpdated {
            config: self.config.clone(),
        });
    }

    // Notifications

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        self.events.emit(event);
    }

    // Track registry

    /// Create a track and return its id. A default track takes the flag
    /// away from every other track.
    pub fn create_track(&mut self, language: &str, label: &str, is_default: bool) -> String {
        let track = self.registry.create(language, label, is_default).clone();
        tracing::debug!(track_id = %track.id, language, is_default, "Track created");
        let id = track.id.clone();
        self.emit(EngineEvent::TrackCreated { track });
        id
    }

    pub fn remove_track(&mut self, track_id: &str) -> bool {
        if !self.registry.remove(track_id) {
            return false;
        }
        tracing::debug!(track_id, "Track removed");
        self.emit(EngineEvent::TrackRemoved {
            track_id: track_id.to_string(),
        });
        true
    }

    pub fn update_track(&mut self, track_id: &str, patch: TrackPatch) -> bool {
        if !self.registry.update(track_id, patch) {
            return false;
        }
        if let Some(track) = self.registry.get(track_id) {
            self.emit(EngineEvent::TrackUpdated {
                track: track.clone(),
            });
        }
        true
    }

    pub fn set_default_track(&mut self, track_id: &str) -> bool {
        self.update_track(
            track_id,
            TrackPatch {
                is_default: Some(true),
                ..Default::default()
            },
        )
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.registry.get(track_id)
    }

    /// All tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        self.registry.list_all()
    }

    /// The flagged default track, else the first-created one.
    pub fn default_track(&self) -> Option<&Track> {
        self.registry.default_track()
    }

    pub fn clear_tracks(&mut self) {
        self.registry.clear();
        tracing::debug!("All tracks cleared");
        self.emit(EngineEvent::TracksCleared);
    }

    // Entry timing

    /// Insert a new entry and return its id.
    ///
    /// Fails with `NotFound` for an unknown track, `InvalidTiming` for a
    /// negative start or an end not after the start, and `EmptyText` for
    /// blank text. Nothing is stored on failure.
    pub fn add_entry(&mut self, track_id: &str, draft: EntryDraft) -> CuekitResult<EntryId> {
        if self.registry.get(track_id).is_none() {
            return Err(CuekitError::not_found(format!("track {track_id}")));
        }
        draft.check()?;

        let id = self.registry.allocate_entry_id();
        let entry = draft.into_entry(id);
        let track = self
            .registry
            .get_mut(track_id)
            .ok_or_else(|| CuekitError::not_found(format!("track {track_id}")))?;
        track.entries.push(entry.clone());
        track.sort_entries();
        tracing::debug!(track_id, entry_id = id, start = entry.start_time, "Entry added");

        self.auto_validate(track_id);
        self.emit(EngineEvent::EntryAdded {
            track_id: track_id.to_string(),
            entry,
        });
        Ok(id)
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(false)` when the track or entry does not exist. The merged
    /// entry must satisfy the same timing and text rules as a new one.
    pub fn update_entry(
        &mut self,
        track_id: &str,
        entry_id: EntryId,
        patch: EntryPatch,
    ) -> CuekitResult<bool> {
        let Some(track) = self.registry.get_mut(track_id) else {
            return Ok(false);
        };
        let Some(entry) = track.entry_mut(entry_id) else {
            return Ok(false);
        };

        let merged = patch.merged(entry);
        check_timing(merged.start_time, merged.end_time)?;
        check_text(&merged.text)?;
        *entry = merged.clone();
        track.sort_entries();
        tracing::debug!(track_id, entry_id, "Entry updated");

        self.auto_validate(track_id);
        self.emit(EngineEvent::EntryUpdated {
            track_id: track_id.to_string(),
            entry: merged,
        });
        Ok(true)
    }

    pub fn remove_entry(&mut self, track_id: &str, entry_id: EntryId) -> bool {
        let Some(track) = self.registry.get_mut(track_id) else {
            return false;
        };
        let Some(index) = track.entries.iter().position(|e| e.id == entry_id) else {
            return false;
        };
        track.entries.remove(index);
        tracing::debug!(track_id, entry_id, "Entry removed");
        self.emit(EngineEvent::EntryRemoved {
            track_id: track_id.to_string(),
            entry_id,
        });
        true
    }

    /// Entries intersecting `[range_start, range_end)`, in stored order.
    /// An unknown track yields no entries.
    pub fn entries_in_range(
        &self,
        track_id: &str,
        range_start: f64,
        range_end: f64,
    ) -> Vec<&SubtitleEntry> {
        self.registry
            .get(track_id)
            .map(|t| t.entries_in_range(range_start, range_end))
            .unwrap_or_default()
    }

    pub fn total_entries(&self) -> usize {
        self.registry.total_entries()
    }

    fn auto_validate(&self, track_id: &str) {
        if !self.config.auto_validate {
            return;
        }
        if let Some(report) = self.validate_track(track_id) {
            if !report.is_valid {
                tracing::debug!(
                    track_id,
                    errors = report.errors.len(),
                    warnings = report.warnings.len(),
                    "Track failed automatic validation"
                );
            }
            self.emit(EngineEvent::TrackValidated {
                track_id: track_id.to_string(),
                report,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine_with_track() -> (SubtitleEngine, String) {
        let mut engine = SubtitleEngine::default();
        let id = engine.create_track("en-US", "English", false);
        (engine, id)
    }

    fn assert_sorted(track: &Track) {
        for pair in track.entries.windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
    }

    #[test]
    fn test_add_entry_sorts_by_start() {
        let (mut engine, track) = engine_with_track();
        engine.add_entry(&track, EntryDraft::new(10.0, 12.0, "Second")).unwrap();
        engine.add_entry(&track, EntryDraft::new(0.0, 5.0, "First")).unwrap();

        let texts: Vec<_> = engine
            .track(&track)
            .unwrap()
            .entries
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, vec!["First", "Second"]);
    }

    #[test]
    fn test_add_entry_missing_track_is_not_found() {
        let mut engine = SubtitleEngine::default();
        let err = engine
            .add_entry("track-none", EntryDraft::new(0.0, 1.0, "x"))
            .unwrap_err();
        assert!(matches!(err, CuekitError::NotFound { .. }));
    }

    #[test]
    fn test_add_entry_rejects_inverted_timing() {
        let (mut engine, track) = engine_with_track();
        let err = engine
            .add_entry(&track, EntryDraft::new(10.0, 5.0, "x"))
            .unwrap_err();
        assert!(matches!(err, CuekitError::InvalidTiming { .. }));
        assert_eq!(engine.total_entries(), 0);
    }

    #[test]
    fn test_add_entry_rejects_blank_text() {
        let (mut engine, track) = engine_with_track();
        let err = engine
            .add_entry(&track, EntryDraft::new(0.0, 1.0, "   "))
            .unwrap_err();
        assert!(matches!(err, CuekitError::EmptyText));
    }

    #[test]
    fn test_ids_are_global_across_tracks() {
        let mut engine = SubtitleEngine::default();
        let a = engine.create_track("en-US", "English", false);
        let b = engine.create_track("es-ES", "Español", false);
        let first = engine.add_entry(&a, EntryDraft::new(0.0, 1.0, "a")).unwrap();
        let second = engine.add_entry(&b, EntryDraft::new(0.0, 1.0, "b")).unwrap();
        let third = engine.add_entry(&a, EntryDraft::new(2.0, 3.0, "c")).unwrap();
        assert_eq!((first, second, third), (1, 2, 3));
        assert_eq!(engine.total_entries(), 3);
    }

    #[test]
    fn test_update_entry_merges_and_resorts() {
        let (mut engine, track) = engine_with_track();
        let a = engine.add_entry(&track, EntryDraft::new(0.0, 1.0, "a")).unwrap();
        engine.add_entry(&track, EntryDraft::new(5.0, 6.0, "b")).unwrap();

        assert!(engine
            .update_entry(&track, a, EntryPatch::timing(8.0, 9.0))
            .unwrap());
        let t = engine.track(&track).unwrap();
        assert_eq!(t.entries.last().unwrap().id, a);
        assert_eq!(t.entries.last().unwrap().text, "a");
    }

    #[test]
    fn test_update_entry_validates_merged_result() {
        let (mut engine, track) = engine_with_track();
        let a = engine.add_entry(&track, EntryDraft::new(2.0, 4.0, "a")).unwrap();

        let patch = EntryPatch {
            end_time: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            engine.update_entry(&track, a, patch),
            Err(CuekitError::InvalidTiming { .. })
        ));
        let entry = engine.track(&track).unwrap().entry(a).unwrap();
        assert_eq!(entry.end_time, 4.0);

        assert!(matches!(
            engine.update_entry(&track, a, EntryPatch::text(" ")),
            Err(CuekitError::EmptyText)
        ));
    }

    #[test]
    fn test_update_or_remove_missing_returns_false() {
        let (mut engine, track) = engine_with_track();
        assert!(!engine.update_entry(&track, 99, EntryPatch::text("x")).unwrap());
        assert!(!engine.update_entry("nope", 1, EntryPatch::text("x")).unwrap());
        assert!(!engine.remove_entry(&track, 99));
        assert!(!engine.remove_entry("nope", 1));
    }

    #[test]
    fn test_remove_entry() {
        let (mut engine, track) = engine_with_track();
        let id = engine.add_entry(&track, EntryDraft::new(0.0, 1.0, "a")).unwrap();
        assert!(engine.remove_entry(&track, id));
        assert_eq!(engine.total_entries(), 0);
    }

    #[test]
    fn test_entries_in_range() {
        let (mut engine, track) = engine_with_track();
        engine.add_entry(&track, EntryDraft::new(0.0, 2.0, "a")).unwrap();
        engine.add_entry(&track, EntryDraft::new(3.0, 5.0, "b")).unwrap();
        engine.add_entry(&track, EntryDraft::new(6.0, 20.0, "c")).unwrap();

        let texts = |s: f64, e: f64| -> Vec<String> {
            engine
                .entries_in_range(&track, s, e)
                .into_iter()
                .map(|x| x.text.clone())
                .collect()
        };
        assert_eq!(texts(1.0, 4.0), vec!["a", "b"]);
        assert_eq!(texts(2.0, 3.0), Vec::<String>::new());
        assert_eq!(texts(10.0, 11.0), vec!["c"]);
        assert_eq!(texts(-1.0, 100.0), vec!["a", "b", "c"]);
        assert!(engine.entries_in_range("nope", 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_default_track_rules() {
        let mut engine = SubtitleEngine::default();
        assert!(engine.default_track().is_none());
        let first = engine.create_track("en-US", "English", false);
        let second = engine.create_track("es-ES", "Español", false);
        assert_eq!(engine.default_track().unwrap().id, first);

        assert!(engine.set_default_track(&second));
        assert_eq!(engine.default_track().unwrap().id, second);
        assert!(!engine.set_default_track("nope"));
    }

    #[test]
    fn test_multi_language_preset() {
        let engine = SubtitleEngine::multi_language();
        assert_eq!(engine.tracks().len(), 3);
        assert_eq!(engine.default_track().unwrap().language, "pt-BR");
    }

    #[test]
    fn test_remove_and_clear_tracks() {
        let (mut engine, track) = engine_with_track();
        engine.add_entry(&track, EntryDraft::new(0.0, 1.0, "a")).unwrap();
        assert!(engine.remove_track(&track));
        assert!(!engine.remove_track(&track));
        assert_eq!(engine.total_entries(), 0);

        engine.create_track("en-US", "English", false);
        engine.clear_tracks();
        assert!(engine.tracks().is_empty());
    }

    #[test]
    fn test_events_for_mutations() {
        let mut engine = SubtitleEngine::default();
        let mut rx = engine.subscribe();
        let track = engine.create_track("en-US", "English", false);
        engine.add_entry(&track, EntryDraft::new(0.0, 1.0, "a")).unwrap();
        engine.update_config(EngineConfigPatch {
            auto_validate: Some(false),
            ..Default::default()
        });
        engine.add_entry(&track, EntryDraft::new(2.0, 3.0, "b")).unwrap();

        let mut channels = Vec::new();
        while let Ok(event) = rx.try_recv() {
            channels.push(event.channel());
        }
        assert_eq!(
            channels,
            vec![
                "track:created",
                "track:validated",
                "entry:added",
                "config:updated",
                "entry:added",
            ]
        );
    }

    #[test]
    fn test_config_update_is_shallow() {
        let mut engine = SubtitleEngine::default();
        engine.update_config(EngineConfigPatch {
            auto_validate: Some(false),
            ..Default::default()
        });
        assert!(!engine.config().auto_validate);
        assert_eq!(engine.config().default_style.font_size, Some(24));
    }

    proptest! {
        #[test]
        fn prop_entries_stay_sorted_and_well_timed(
            spans in prop::collection::vec((0.0f64..500.0, 0.01f64..30.0), 1..40),
            moves in prop::collection::vec((0usize..40, 0.0f64..500.0), 0..20),
        ) {
            let (mut engine, track) = engine_with_track();
            let mut ids = Vec::new();
            for (start, len) in &spans {
                ids.push(engine.add_entry(&track, EntryDraft::new(*start, start + len, "x")).unwrap());
            }
            for (pick, new_start) in &moves {
                let id = ids[pick % ids.len()];
                let _ = engine.update_entry(&track, id, EntryPatch {
                    start_time: Some(*new_start),
                    ..Default::default()
                });
            }

            let t = engine.track(&track).unwrap();
            assert_sorted(t);
            for e in &t.entries {
                prop_assert!(e.start_time >= 0.0);
                prop_assert!(e.end_time > e.start_time);
            }
        }
    }
}
