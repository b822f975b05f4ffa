//! Engine notifications.
//!
//! Every state change is published on a `tokio::sync::broadcast` channel.
//! Publishing with no subscribers is not an error; slow subscribers see
//! `RecvError::Lagged` rather than blocking the engine.

use cuekit_track_model::{
    EmbedOutcome, EmbedProgress, EmbedRequest, EngineConfig, EntryId, SubtitleEntry, Track,
};
use tokio::sync::broadcast;

use crate::sync::SyncParams;
use crate::validate::ValidationReport;

const DEFAULT_CAPACITY: usize = 256;

/// Something that happened inside the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    TrackCreated { track: Track },
    TrackUpdated { track: Track },
    TrackRemoved { track_id: String },
    TracksCleared,
    EntryAdded { track_id: String, entry: SubtitleEntry },
    EntryUpdated { track_id: String, entry: SubtitleEntry },
    EntryRemoved { track_id: String, entry_id: EntryId },
    EntryAdjusted { track_id: String, entry: SubtitleEntry },
    TrackSynced { track_id: String, params: SyncParams },
    /// Result of an automatic validation pass after an add/update.
    TrackValidated { track_id: String, report: ValidationReport },
    ConfigUpdated { config: EngineConfig },
    EmbedStart { request: EmbedRequest },
    /// Transcoder position; zero or more between start and complete/error.
    EmbedProgress { request: EmbedRequest, progress: EmbedProgress },
    EmbedComplete { request: EmbedRequest, outcome: EmbedOutcome },
    EmbedError { request: EmbedRequest, message: String },
}

impl EngineEvent {
    /// Channel name, e.g. `"entry:added"`.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::TrackCreated { .. } => "track:created",
            Self::TrackUpdated { .. } => "track:updated",
            Self::TrackRemoved { .. } => "track:removed",
            Self::TracksCleared => "tracks:cleared",
            Self::EntryAdded { .. } => "entry:added",
            Self::EntryUpdated { .. } => "entry:updated",
            Self::EntryRemoved { .. } => "entry:removed",
            Self::EntryAdjusted { .. } => "entry:adjusted",
            Self::TrackSynced { .. } => "track:synced",
            Self::TrackValidated { .. } => "track:validated",
            Self::ConfigUpdated { .. } => "config:updated",
            Self::EmbedStart { .. } => "embed:start",
            Self::EmbedProgress { .. } => "embed:progress",
            Self::EmbedComplete { .. } => "embed:complete",
            Self::EmbedError { .. } => "embed:error",
        }
    }
}

/// Fan-out publisher for [`EngineEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn emit(&self, event: EngineEvent) {
        tracing::trace!(channel = event.channel(), "Emitting engine event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}
