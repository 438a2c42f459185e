//! Content cache for remote artifacts
//!
//! Fetches archives or raw files over HTTP, stores them under a per-tool
//! cache root keyed by logical name, and serves later requests from disk.
//!
//! # Layout
//!
//! | Path | Role |
//! |------|------|
//! | `<root>/cache/<name...>` | permanent entries (files or extracted trees) |
//! | `<root>/.tmp/<random>` | staging, transient, consumed by rename |
//!
//! This layout is observable contract; external tools may inspect it.
//!
//! # Semantics
//!
//! - Presence is a hit: no TTL, no checksum validation, no eviction.
//! - Archive URLs (`.tar.gz`, `.tar` suffix) are extracted with the top
//!   path component of every entry stripped, unless `raw` is set.
//! - Entries appear atomically: fetches assemble under `.tmp/` and rename
//!   into place.

mod context;
mod fetch;
mod paths;
mod store;

pub use context::CacheBinding;
pub use fetch::{FetchRequest, RequestOptions};
pub use paths::CachePaths;
pub use store::{
    CacheStore, ChildStat, EntryKind, EntryStat, GetOptions, StatResult, StoreOptions,
};
