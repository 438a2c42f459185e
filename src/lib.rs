//! kitbag - CLI utility belt with a content cache
//!
//! Fetches remote artifacts (archives or raw files) over HTTP into a
//! per-tool cache keyed by logical name, extracting archives transparently
//! and serving repeat requests from disk.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use error::{KitbagError, KitbagResult};
