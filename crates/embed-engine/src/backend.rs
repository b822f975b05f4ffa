//! Transcoder seam and the ffmpeg implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_track_model::EmbedProgress;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

/// How the subtitle payload ends up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeMode {
    /// Draw the text into the frames; the video is re-encoded.
    BurnIn,
    /// Add subtitle streams; video and audio are copied.
    SoftMux,
}

/// One rendered track handed to the transcoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStream {
    /// Rendered SRT payload.
    pub path: PathBuf,
    /// Stream metadata, soft mux only.
    pub language: String,
    pub title: String,
    pub default: bool,
}

/// One external transcoding job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output subtitle streams in order. Burn-in takes exactly one.
    pub subtitles: Vec<SubtitleStream>,
    pub mode: TranscodeMode,
}

impl TranscodeJob {
    pub fn check(&self) -> CuekitResult<()> {
        match (self.mode, self.subtitles.len()) {
            (_, 0) => Err(CuekitError::invalid_parameter(
                "transcode job has no subtitle streams",
            )),
            (TranscodeMode::BurnIn, n) if n > 1 => Err(CuekitError::invalid_parameter(format!(
                "burn-in takes one subtitle stream, got {n}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Receives progress reports while a job runs.
pub type ProgressSink<'a> = &'a (dyn Fn(EmbedProgress) + Send + Sync);

/// Trait for transcoding backends.
#[async_trait]
pub trait TranscodeBackend: Send + Sync {
    /// Run the job to completion. Failures carry the backend's message.
    async fn transcode(&self, job: &TranscodeJob, progress: ProgressSink<'_>) -> CuekitResult<()>;

    /// Check if this backend is available on the system.
    async fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Runs the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    binary: PathBuf,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegBackend {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl TranscodeBackend for FfmpegBackend {
    async fn transcode(&self, job: &TranscodeJob, progress: ProgressSink<'_>) -> CuekitResult<()> {
        let args = ffmpeg_args(job)?;
        tracing::debug!(?args, binary = %self.binary.display(), "Running ffmpeg");

        let mut child = tokio::process::Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CuekitError::transcoding(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CuekitError::transcoding("Failed to capture ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CuekitError::transcoding("Failed to capture ffmpeg stderr"))?;

        // ffmpeg blocks once the stderr pipe is full.
        let stderr_task = tokio::spawn(async move {
            let mut output = String::new();
            match stderr.read_to_string(&mut output).await {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut state = EmbedProgress::default();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| CuekitError::transcoding(format!("Failed reading ffmpeg progress: {e}")))?
        {
            if let Some((key, value)) = line.trim().split_once('=') {
                if update_progress(&mut state, key, value) {
                    progress(state);
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| CuekitError::transcoding(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = stderr_task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(CuekitError::transcoding(format!(
                "ffmpeg failed (status {}): {}",
                status,
                stderr_output.trim()
            )));
        }
        Ok(())
    }

    async fn is_available(&self) -> bool {
        tokio::process::Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Fold one `key=value` line of `-progress` output into `state`. Returns
/// `true` at the end of a report block.
fn update_progress(state: &mut EmbedProgress, key: &str, value: &str) -> bool {
    match key {
        // Despite the name, `out_time_ms` is in microseconds.
        "out_time_ms" | "out_time_us" => {
            if let Ok(us) = value.parse::<f64>() {
                state.out_time_secs = us / 1_000_000.0;
            }
            false
        }
        "frame" => {
            state.frame = value.parse().ok();
            false
        }
        "progress" => {
            state.complete = value == "end";
            true
        }
        _ => false,
    }
}

/// Full ffmpeg argument list for a job, overwriting the output.
///
/// Progress goes to stdout as `key=value` blocks.
pub fn ffmpeg_args(job: &TranscodeJob) -> CuekitResult<Vec<OsString>> {
    job.check()?;
    let mut args: Vec<OsString> = ["-y", "-nostats", "-progress", "pipe:1", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(job.input.clone().into());

    match job.mode {
        TranscodeMode::BurnIn => {
            let filter = format!("subtitles='{}'", escape_filter_path(&job.subtitles[0].path));
            args.extend(
                ["-vf", filter.as_str(), "-c:v", "libx264", "-c:a", "copy"]
                    .into_iter()
                    .map(OsString::from),
            );
        }
        TranscodeMode::SoftMux => {
            for stream in &job.subtitles {
                args.push("-i".into());
                args.push(stream.path.clone().into());
            }
            args.push("-map".into());
            args.push("0".into());
            for i in 1..=job.subtitles.len() {
                args.push("-map".into());
                args.push(i.to_string().into());
            }
            args.extend(
                ["-c:v", "copy", "-c:a", "copy", "-c:s", subtitle_codec_for(&job.output)]
                    .into_iter()
                    .map(OsString::from),
            );
            for (i, stream) in job.subtitles.iter().enumerate() {
                let selector = format!("-metadata:s:s:{i}");
                args.push(selector.clone().into());
                args.push(format!("language={}", stream.language).into());
                args.push(selector.into());
                args.push(format!("title={}", stream.title).into());
                if stream.default {
                    args.push(format!("-disposition:s:{i}").into());
                    args.push("default".into());
                }
            }
        }
    }

    args.push(job.output.clone().into());
    Ok(args)
}

/// MP4-family containers only carry `mov_text` subtitles.
pub fn subtitle_codec_for(output: &Path) -> &'static str {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4" | "m4v" | "mov") => "mov_text",
        _ => "srt",
    }
}

/// Quote a path for use inside an ffmpeg filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}
