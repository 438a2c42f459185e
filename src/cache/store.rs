//! The addressable content store
//!
//! A [`CacheStore`] owns one cache root and every mutation under it. Entries
//! are keyed by relative pathname; `get` is the cache-or-fetch entry point
//! and the only operation whose failures surface as actionable errors.
//! `write`, `read` and `stat` are best-effort by contract: failures go to
//! diagnostics and callers see a falsy result, never an error. CLI commands
//! rely on that non-throwing behavior.
//!
//! Nothing is cached in memory; every `exists`/`read`/`stat` call re-queries
//! the filesystem, so external changes to the cache directory are visible
//! immediately.

use crate::cache::fetch::{self, FetchRequest, RequestOptions};
use crate::cache::paths::CachePaths;
use crate::error::{KitbagError, KitbagResult};
use crate::ui::Reporter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Construction-time options for [`CacheStore::open`]
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Tool name; the root becomes `<user-cache-dir>/<name>` unless `root`
    /// is set
    pub name: Option<String>,
    /// Explicit cache root, overriding any derived location
    pub root: Option<PathBuf>,
    /// Request options merged into every fetch
    pub request: RequestOptions,
    /// Diagnostics sink
    pub reporter: Reporter,
}

/// Per-call options for [`CacheStore::get`]
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Remove any existing entry and fetch again
    pub force: bool,
    /// Never extract, even for archive URLs
    pub raw: bool,
    /// Headers merged over the store defaults; same-named keys win
    pub request: Option<RequestOptions>,
}

/// Kind of an on-disk entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Metadata for one file or directory
#[derive(Debug, Clone, Serialize)]
pub struct EntryStat {
    pub size: u64,
    pub kind: EntryKind,
    pub modified: Option<DateTime<Utc>>,
}

/// An immediate child in a directory listing
#[derive(Debug, Clone, Serialize)]
pub struct ChildStat {
    pub name: String,
    #[serde(flatten)]
    pub stat: EntryStat,
}

/// Result of [`CacheStore::stat`]: a file's metadata, or a directory's
/// metadata plus its visible children sorted case-insensitively.
#[derive(Debug, Clone, Serialize)]
pub struct StatResult {
    pub name: String,
    #[serde(flatten)]
    pub stat: EntryStat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ChildStat>>,
}

/// Content cache keyed by logical pathname
#[derive(Debug)]
pub struct CacheStore {
    paths: CachePaths,
    client: reqwest::Client,
    default_request: RequestOptions,
    reporter: Reporter,
}

impl CacheStore {
    /// Open a store over an explicit root, or over `<user-cache-dir>/<name>`
    /// when only a tool name is given. Fails with
    /// [`KitbagError::Construction`] when neither is supplied.
    ///
    /// The `cache/` subtree is created lazily and best-effort; a failure
    /// here is reported, not raised, and will resurface on first use.
    pub fn open(options: StoreOptions) -> KitbagResult<Self> {
        let root = match (options.root, options.name.as_deref()) {
            (Some(root), _) => root,
            (None, Some(name)) => Self::default_root(name),
            (None, None) => return Err(KitbagError::Construction),
        };

        let paths = CachePaths::new(root);
        if let Err(e) = std::fs::create_dir_all(paths.entries_dir()) {
            options
                .reporter
                .debug(format!("failed to create cache dir: {e}"));
        }

        Ok(Self {
            paths,
            client: reqwest::Client::new(),
            default_request: options.request,
            reporter: options.reporter,
        })
    }

    /// Cache root derived from a tool name
    pub fn default_root(name: &str) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(name)
    }

    /// The cache root this store owns
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// Whether an entry exists at `pathname`. Errors only on a path-escape
    /// violation, never for a missing entry.
    pub async fn exists(&self, pathname: &str) -> KitbagResult<bool> {
        let loc = self.paths.resolve(pathname)?;
        Ok(fs::try_exists(&loc).await.unwrap_or(false))
    }

    /// Fetch `url` into the entry `name`, or serve it from disk.
    ///
    /// With `force` any existing entry is removed first and the fetch always
    /// runs. Otherwise presence alone is a hit: no network access, no
    /// staleness or checksum check. On a miss the fetcher downloads through
    /// a staging location and renames the result into place.
    ///
    /// Concurrent `get` calls for the same name are not coordinated: each
    /// fetch stages independently and the last rename wins, the loser's
    /// staging content is left as an orphan under `.tmp/`.
    ///
    /// Every fetcher failure is re-signaled as [`KitbagError::FetchFailed`]
    /// with the cause attached for diagnostics; callers should treat all
    /// causes as equally fatal.
    pub async fn get(&self, url: &str, name: &str, options: GetOptions) -> KitbagResult<PathBuf> {
        let out = self.paths.resolve(name)?;

        if options.force {
            self.reporter
                .debug(format!("forcing re-fetch of {name} at {}", out.display()));
            remove_entry(&out)
                .await
                .map_err(|e| KitbagError::io(format!("removing {}", out.display()), e))?;
        } else if fs::try_exists(&out).await.unwrap_or(false) {
            self.reporter.debug(format!("cache hit at {}", out.display()));
            return Ok(out);
        }

        let staging = self.paths.make_staging().await?;
        let request = FetchRequest {
            url: url.to_string(),
            name: name.to_string(),
            raw: options.raw,
            options: options
                .request
                .unwrap_or_default()
                .merged_over(&self.default_request),
        };

        match fetch::fetch(&self.client, &request, &staging, &out, &self.reporter).await {
            Ok(path) => Ok(path),
            Err(e) => {
                self.reporter.debug("fetch failed");
                self.reporter.dump_err(&e);
                Err(KitbagError::fetch_failed(name, e))
            }
        }
    }

    /// Write `data` verbatim to the entry at `pathname`, creating parent
    /// directories. Best-effort: returns `false` and reports the failure
    /// instead of raising.
    pub async fn write(&self, pathname: &str, data: &[u8]) -> bool {
        let loc = match self.paths.resolve(pathname) {
            Ok(loc) => loc,
            Err(e) => {
                self.reporter.debug(format!("cache write failed: {e}"));
                return false;
            }
        };

        let result = async {
            if let Some(parent) = loc.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&loc, data).await
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                self.reporter.debug(format!("cache write failed: {e}"));
                false
            }
        }
    }

    /// Read the entry at `pathname` as text. Returns `None` when the file
    /// is missing or unreadable; the distinction only shows up in debug
    /// diagnostics.
    pub async fn read(&self, pathname: &str) -> Option<String> {
        let loc = match self.paths.resolve(pathname) {
            Ok(loc) => loc,
            Err(e) => {
                self.reporter.debug(format!("cache read failed: {e}"));
                return None;
            }
        };

        match fs::read_to_string(&loc).await {
            Ok(text) => Some(text),
            Err(e) => {
                self.reporter.debug(format!("cache read failed: {e}"));
                None
            }
        }
    }

    /// Recursively delete the entry at `pathname`. Succeeds silently when
    /// the target does not exist.
    pub async fn purge(&self, pathname: &str) -> KitbagResult<()> {
        let loc = self.paths.resolve(pathname)?;
        self.reporter
            .debug(format!("purging {} ({pathname})", loc.display()));
        remove_entry(&loc)
            .await
            .map_err(|e| KitbagError::io(format!("purging {}", loc.display()), e))
    }

    /// Metadata for the entry at `pathname`, or for the whole store when
    /// `pathname` is empty. Directories report their immediate children,
    /// dot-entries excluded, sorted case-insensitively ascending. Any
    /// failure yields `None` and a diagnostic.
    pub async fn stat(&self, pathname: &str) -> Option<StatResult> {
        match self.stat_inner(pathname).await {
            Ok(result) => Some(result),
            Err(e) => {
                self.reporter.debug("cache stat failed");
                self.reporter.dump_err(&e);
                None
            }
        }
    }

    async fn stat_inner(&self, pathname: &str) -> KitbagResult<StatResult> {
        let loc = self.paths.resolve(pathname)?;
        let metadata = fs::metadata(&loc)
            .await
            .map_err(|e| KitbagError::io(format!("stat {}", loc.display()), e))?;

        let name = loc
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stat = entry_stat(&metadata);

        if !metadata.is_dir() {
            return Ok(StatResult {
                name,
                stat,
                children: None,
            });
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&loc)
            .await
            .map_err(|e| KitbagError::io(format!("listing {}", loc.display()), e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| KitbagError::io(format!("listing {}", loc.display()), e))?
        {
            let child = entry.file_name().to_string_lossy().into_owned();
            if !child.starts_with('.') {
                names.push(child);
            }
        }
        names.sort_by_key(|n| n.to_lowercase());

        let mut children = Vec::with_capacity(names.len());
        for child in names {
            let child_loc = loc.join(&child);
            let md = fs::metadata(&child_loc)
                .await
                .map_err(|e| KitbagError::io(format!("stat {}", child_loc.display()), e))?;
            children.push(ChildStat {
                name: child,
                stat: entry_stat(&md),
            });
        }

        Ok(StatResult {
            name,
            stat,
            children: Some(children),
        })
    }
}

fn entry_stat(metadata: &std::fs::Metadata) -> EntryStat {
    EntryStat {
        size: metadata.len(),
        kind: if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        },
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    }
}

/// Delete a file or directory tree; absent targets are not an error.
async fn remove_entry(path: &Path) -> std::io::Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(md) if md.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
