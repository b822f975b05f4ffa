//! File import and export.
//!
//! Parsing and rendering are pure functions in `cuekit-formats`; this module
//! owns the file I/O and feeds parsed entries through [`SubtitleEngine::add_entry`].

use std::path::{Path, PathBuf};

use cuekit_common::error::{CuekitError, CuekitResult};
use cuekit_formats::{RenderOptions, SubtitleFormat};
use serde::{Deserialize, Serialize};

use crate::engine::SubtitleEngine;

/// Where and how to write a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: SubtitleFormat,
    pub output_path: PathBuf,
    pub track_id: String,
    /// SRT only: wrap bold/italic entries in tags.
    #[serde(default)]
    pub include_formatting: bool,
}

impl SubtitleEngine {
    /// Parse `content` and add every well-formed cue to a track.
    ///
    /// Malformed blocks are skipped. A cue that parses but breaks the entry
    /// rules fails the whole import and nothing is added. Returns the number
    /// of entries added.
    pub fn import_str(
        &mut self,
        track_id: &str,
        content: &str,
        format: SubtitleFormat,
    ) -> CuekitResult<usize> {
        if self.track(track_id).is_none() {
            return Err(CuekitError::not_found(format!("track {track_id}")));
        }
        let drafts = cuekit_formats::parse(content, format)?;
        for draft in &drafts {
            draft.check()?;
        }

        let count = drafts.len();
        for draft in drafts {
            self.add_entry(track_id, draft)?;
        }
        Ok(count)
    }

    pub async fn import_srt(&mut self, track_id: &str, path: &Path) -> CuekitResult<usize> {
        self.import_path(track_id, path, SubtitleFormat::Srt).await
    }

    pub async fn import_vtt(&mut self, track_id: &str, path: &Path) -> CuekitResult<usize> {
        self.import_path(track_id, path, SubtitleFormat::Vtt).await
    }

    /// Import a file, picking the grammar from its extension.
    pub async fn import_file(&mut self, track_id: &str, path: &Path) -> CuekitResult<usize> {
        let format = SubtitleFormat::from_path(path)?;
        self.import_path(track_id, path, format).await
    }

    async fn import_path(
        &mut self,
        track_id: &str,
        path: &Path,
        format: SubtitleFormat,
    ) -> CuekitResult<usize> {
        if self.track(track_id).is_none() {
            return Err(CuekitError::not_found(format!("track {track_id}")));
        }
        let content = tokio::fs::read_to_string(path).await?;
        let count = self.import_str(track_id, &content, format)?;
        tracing::info!(track_id, path = %path.display(), %format, count, "Imported subtitles");
        Ok(count)
    }

    /// Serialize a track without touching the filesystem.
    pub fn render_track(
        &self,
        track_id: &str,
        format: SubtitleFormat,
        options: RenderOptions,
    ) -> CuekitResult<String> {
        let track = self
            .track(track_id)
            .ok_or_else(|| CuekitError::not_found(format!("track {track_id}")))?;
        Ok(cuekit_formats::render(track, format, options))
    }

    /// Write a track to `options.output_path`.
    pub async fn export(&self, options: &ExportOptions) -> CuekitResult<()> {
        let content = self.render_track(
            &options.track_id,
            options.format,
            RenderOptions {
                include_formatting: options.include_formatting,
            },
        )?;
        tokio::fs::write(&options.output_path, content).await?;
        tracing::info!(
            track_id = %options.track_id,
            path = %options.output_path.display(),
            format = %options.format,
            "Exported subtitles"
        );
        Ok(())
    }
}
