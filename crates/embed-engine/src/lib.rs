//! Cuekit Embed Engine
//!
//! Puts subtitle tracks into a video by delegating to an external
//! transcoder.
//!
//! ```text
//! track i ── render SRT ── temp_<uuid>_<i>.srt ──┐
//!                                                ├── TranscodeBackend ── output video
//! source video ──────────────────────────────────┘
//! ```
//!
//! Burn-in rasterizes one track into the frames. Soft mux attaches each
//! track as a selectable stream. The coordinator only manages the job lifecycle; the
//! backend does the media work.

pub mod backend;
pub mod coordinator;

pub use backend::*;
pub use coordinator::*;
