//! Cache directory layout and pathname resolution
//!
//! A cache root owns two subtrees: `cache/` for permanent entries and
//! `.tmp/` for staging directories that exist only for the duration of one
//! fetch. Every entry pathname is resolved against `cache/` and rejected if
//! its normalized form escapes that directory.

use crate::error::{KitbagError, KitbagResult};
use rand::Rng;
use std::path::{Component, Path, PathBuf};

/// On-disk layout of one cache root
#[derive(Debug, Clone)]
pub struct CachePaths {
    root: PathBuf,
}

impl CachePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The cache root itself
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding permanent entries
    pub fn entries_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Directory holding per-fetch staging locations
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(".tmp")
    }

    /// Resolve an entry pathname to its absolute location.
    ///
    /// The pathname is joined onto the entries directory and normalized
    /// lexically (the entry need not exist yet). Anything whose normalized
    /// form is not a descendant of the entries directory is a
    /// [`KitbagError::PathEscape`]. An empty pathname resolves to the
    /// entries directory itself.
    pub fn resolve(&self, pathname: &str) -> KitbagResult<PathBuf> {
        let base = normalize(&self.entries_dir());
        let joined = normalize(&base.join(pathname));

        if joined.starts_with(&base) {
            Ok(joined)
        } else {
            Err(KitbagError::PathEscape {
                pathname: pathname.to_string(),
            })
        }
    }

    /// Allocate a fresh staging location under `.tmp/`.
    ///
    /// Ensures `.tmp/` exists and returns a path with a random suffix,
    /// collision-resistant among concurrent in-process fetches. The path
    /// itself is not created.
    pub async fn make_staging(&self) -> KitbagResult<PathBuf> {
        let dir = self.staging_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| KitbagError::io(format!("creating staging dir {}", dir.display()), e))?;

        let suffix: u32 = rand::thread_rng().gen();
        Ok(dir.join(format!("{:08x}", suffix)))
    }
}

/// Lexically normalize a path, resolving `.` and `..` components without
/// touching the filesystem. `..` at the root is dropped, matching the
/// platform path semantics the escape check relies on.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().last(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> CachePaths {
        CachePaths::new("/tmp/kitbag-test")
    }

    #[test]
    fn layout() {
        let p = paths();
        assert_eq!(p.entries_dir(), PathBuf::from("/tmp/kitbag-test/cache"));
        assert_eq!(p.staging_dir(), PathBuf::from("/tmp/kitbag-test/.tmp"));
    }

    #[test]
    fn resolve_plain_name() {
        let loc = paths().resolve("pkg").unwrap();
        assert_eq!(loc, PathBuf::from("/tmp/kitbag-test/cache/pkg"));
    }

    #[test]
    fn resolve_nested_name() {
        let loc = paths().resolve("releases/v2/pkg.tar.gz").unwrap();
        assert_eq!(
            loc,
            PathBuf::from("/tmp/kitbag-test/cache/releases/v2/pkg.tar.gz")
        );
    }

    #[test]
    fn resolve_empty_is_entries_dir() {
        let loc = paths().resolve("").unwrap();
        assert_eq!(loc, paths().entries_dir());
    }

    #[test]
    fn resolve_inner_dotdot_allowed() {
        // Normalizes back inside the cache directory
        let loc = paths().resolve("a/../b").unwrap();
        assert_eq!(loc, PathBuf::from("/tmp/kitbag-test/cache/b"));
    }

    #[test]
    fn resolve_rejects_escape() {
        for pathname in ["..", "../sibling", "../../etc/passwd", "a/../../../etc"] {
            let err = paths().resolve(pathname).unwrap_err();
            assert!(
                matches!(err, KitbagError::PathEscape { .. }),
                "{pathname} should escape"
            );
        }
    }

    #[test]
    fn normalize_drops_curdir_and_resolves_parent() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[tokio::test]
    async fn make_staging_creates_tmp_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let p = CachePaths::new(temp.path());

        let staging = p.make_staging().await.unwrap();
        assert!(p.staging_dir().is_dir());
        assert!(staging.starts_with(p.staging_dir()));
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn make_staging_unique_enough() {
        let temp = tempfile::TempDir::new().unwrap();
        let p = CachePaths::new(temp.path());

        let a = p.make_staging().await.unwrap();
        let b = p.make_staging().await.unwrap();
        assert_ne!(a, b);
    }
}
