//! Cuekit Timing Engine
//!
//! [`SubtitleEngine`] owns a track registry and exposes:
//! - **Entry timing:** add/update/remove/query with ordering and timing rules
//! - **Validation:** structural errors and authoring warnings per track
//! - **Synchronization:** global offset/speed transforms and per-entry nudges
//! - **Import/Export:** SRT/WebVTT import, SRT/WebVTT/ASS export
//! - **Events:** named notifications over a broadcast channel
//!
//! All mutation is synchronous and in-process. A host that shares an engine
//! across threads must serialize access itself.

pub mod engine;
pub mod events;
pub mod io;
pub mod sync;
pub mod validate;

pub use engine::*;
pub use events::*;
pub use io::*;
pub use sync::*;
pub use validate::*;
