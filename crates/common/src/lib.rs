//! Cuekit Common Utilities
//!
//! Shared infrastructure for all Cuekit crates:
//! - Error types and result aliases
//! - Timecode base conversion used by every subtitle grammar
//! - Tracing/logging initialization
//! - Configuration file loading

pub mod config;
pub mod error;
pub mod logging;
pub mod timecode;

pub use config::*;
pub use error::*;
pub use timecode::*;
