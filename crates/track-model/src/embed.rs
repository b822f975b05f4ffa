//! Request/response contracts for embedding tracks into a video.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Ask the external transcoder to put one or more tracks into a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Source video.
    pub video_path: PathBuf,

    /// Destination video.
    pub output_path: PathBuf,

    /// Track to embed. It becomes the first subtitle stream.
    pub track_id: String,

    /// Further tracks, muxed as streams 2..N in order. Soft mux only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_track_ids: Vec<String>,

    /// `true` rasterizes the text into the frames; `false` attaches it as a
    /// separate selectable stream.
    pub burn_in: bool,
}

impl EmbedRequest {
    /// Single-track soft mux.
    pub fn new(
        video_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        track_id: impl Into<String>,
    ) -> Self {
        Self {
            video_path: video_path.into(),
            output_path: output_path.into(),
            track_id: track_id.into(),
            extra_track_ids: Vec::new(),
            burn_in: false,
        }
    }

    /// Every requested track, primary first.
    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.track_id.as_str())
            .chain(self.extra_track_ids.iter().map(String::as_str))
    }
}

/// Result of a successful embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedOutcome {
    pub output_path: PathBuf,
    pub has_subtitles: bool,
    /// Number of subtitle streams written (1 for burn-in).
    #[serde(default = "one")]
    pub tracks_embedded: usize,
}

fn one() -> usize {
    1
}

/// Transcoder position while a job runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedProgress {
    /// Output timestamp reached so far.
    pub out_time_secs: f64,
    /// Frames written so far, when the backend reports them.
    pub frame: Option<u64>,
    /// The backend has finished writing.
    pub complete: bool,
}
