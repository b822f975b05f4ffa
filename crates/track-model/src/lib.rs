//! Cuekit Track Model
//!
//! Defines the core data contracts for subtitle editing:
//! - **Entries:** Time-coded caption spans with optional style overrides
//! - **Tracks:** Named, ordered entry collections for one language/purpose
//! - **Registry:** The in-memory track collection and global entry-id counter
//! - **Settings:** Presentation defaults and validation thresholds
//! - **Embed:** Request/response contracts for the external transcoder
//!
//! All times are in seconds from the start of the media.

pub mod embed;
pub mod entry;
pub mod settings;
pub mod track;

pub use embed::*;
pub use entry::*;
pub use settings::*;
pub use track::*;
