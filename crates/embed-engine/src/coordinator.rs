//! Embed lifecycle around a [`TranscodeBackend`].

use std::path::{Path, PathBuf};

use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_formats::{RenderOptions, SubtitleFormat};
use cuekit_timing_engine::{EngineEvent, SubtitleEngine};
use cuekit_track_model::{EmbedOutcome, EmbedProgress, EmbedRequest, Track};

use crate::backend::{
    FfmpegBackend, ProgressSink, SubtitleStream, TranscodeBackend, TranscodeJob, TranscodeMode,
};

/// Drives one embed at a time through a backend and reports progress on the
/// engine's event bus.
#[derive(Debug, Clone)]
pub struct EmbedCoordinator<B = FfmpegBackend> {
    backend: B,
}

impl Default for EmbedCoordinator<FfmpegBackend> {
    fn default() -> Self {
        Self::new(FfmpegBackend::new())
    }
}

impl<B: TranscodeBackend> EmbedCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Embed every track of `request` into `request.video_path`.
    ///
    /// An unknown track fails with `NotFound`, and burn-in with extra tracks
    /// with `InvalidParameter`, both before any notification. Otherwise
    /// `embed:start` is emitted, then any number of `embed:progress`, then
    /// exactly one of `embed:complete` or `embed:error`. There is no
    /// cancellation once the job has started.
    pub async fn embed_subtitles(
        &self,
        engine: &SubtitleEngine,
        request: &EmbedRequest,
    ) -> CuekitResult<EmbedOutcome> {
        let tracks = request
            .track_ids()
            .map(|id| {
                engine
                    .track(id)
                    .ok_or_else(|| CuekitError::not_found(format!("track {id}")))
            })
            .collect::<CuekitResult<Vec<_>>>()?;
        if request.burn_in && tracks.len() > 1 {
            return Err(CuekitError::invalid_parameter(format!(
                "burn-in takes one track, got {}",
                tracks.len()
            )));
        }

        tracing::info!(
            track_id = %request.track_id,
            tracks = tracks.len(),
            video = %request.video_path.display(),
            output = %request.output_path.display(),
            burn_in = request.burn_in,
            backend = self.backend.name(),
            "Starting subtitle embed"
        );
        let bus = engine.event_bus();
        bus.emit(EngineEvent::EmbedStart {
            request: request.clone(),
        });

        let progress = |progress: EmbedProgress| {
            bus.emit(EngineEvent::EmbedProgress {
                request: request.clone(),
                progress,
            })
        };
        match self.run(&tracks, request, &progress).await {
            Ok(()) => {
                let outcome = EmbedOutcome {
                    output_path: request.output_path.clone(),
                    has_subtitles: true,
                    tracks_embedded: tracks.len(),
                };
                tracing::info!(output = %outcome.output_path.display(), "Subtitle embed complete");
                bus.emit(EngineEvent::EmbedComplete {
                    request: request.clone(),
                    outcome: outcome.clone(),
                });
                Ok(outcome)
            }
            Err(err) => {
                let err = into_transcoding(err);
                tracing::warn!(error = %err, track_id = %request.track_id, "Subtitle embed failed");
                bus.emit(EngineEvent::EmbedError {
                    request: request.clone(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        tracks: &[&Track],
        request: &EmbedRequest,
        progress: ProgressSink<'_>,
    ) -> CuekitResult<()> {
        if !self.backend.is_available().await {
            return Err(CuekitError::transcoding(format!(
                "{} backend is not available",
                self.backend.name()
            )));
        }

        let out_dir = output_dir(&request.output_path);
        tokio::fs::create_dir_all(&out_dir).await?;

        let stem = uuid::Uuid::new_v4();
        let mut payloads = Vec::with_capacity(tracks.len());
        let mut result: CuekitResult<()> = Ok(());
        for (i, track) in tracks.iter().enumerate() {
            let path = out_dir.join(format!("temp_{stem}_{i}.srt"));
            let payload =
                cuekit_formats::render(track, SubtitleFormat::Srt, RenderOptions::default());
            payloads.push(path.clone());
            if let Err(err) = tokio::fs::write(&path, payload).await {
                result = Err(err.into());
                break;
            }
        }

        if result.is_ok() {
            let job = TranscodeJob {
                input: request.video_path.clone(),
                output: request.output_path.clone(),
                subtitles: tracks
                    .iter()
                    .zip(&payloads)
                    .map(|(track, path)| SubtitleStream {
                        path: path.clone(),
                        language: track.language.clone(),
                        title: track.label.clone(),
                        default: track.is_default,
                    })
                    .collect(),
                mode: if request.burn_in {
                    TranscodeMode::BurnIn
                } else {
                    TranscodeMode::SoftMux
                },
            };
            result = self.backend.transcode(&job, progress).await;
        }

        for path in &payloads {
            match tokio::fs::remove_file(path).await {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                    tracing::warn!(error = %err, path = %path.display(), "Failed to remove subtitle payload");
                }
                _ => {}
            }
        }
        result
    }
}

fn output_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Everything after `embed:start` surfaces as a transcoding failure.
fn into_transcoding(err: CuekitError) -> CuekitError {
    match err {
        CuekitError::Transcoding { .. } => err,
        other => CuekitError::transcoding(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_for_bare_file_name() {
        assert_eq!(output_dir(Path::new("out.mp4")), PathBuf::from("."));
        assert_eq!(
            output_dir(Path::new("/videos/out.mp4")),
            PathBuf::from("/videos")
        );
    }

    #[test]
    fn test_transcoding_errors_are_not_rewrapped() {
        let err = into_transcoding(CuekitError::transcoding("boom"));
        assert_eq!(err.to_string(), "Transcoding error: boom");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = into_transcoding(CuekitError::Io(io));
        assert!(matches!(err, CuekitError::Transcoding { .. }));
    }
}
