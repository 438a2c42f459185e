//! Single-resource fetch with optional archive extraction
//!
//! Downloads one URL as a byte stream and finalizes it into the cache:
//! either written directly to the destination (raw branch) or unpacked into
//! a staging directory with the top-level archive component stripped and
//! then renamed into place (archive branch). The rename is what makes a
//! finished entry appear atomically.
//!
//! No timeout or cancellation is applied to the transfer; a hung stream
//! hangs the calling operation. Known hardening gap.

use crate::error::{KitbagError, KitbagResult};
use crate::ui::Reporter;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Options forwarded to the HTTP layer for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Header name to value; later layers override same-named keys
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Merge these options over a set of defaults; per-call keys win
    pub fn merged_over(&self, defaults: &RequestOptions) -> RequestOptions {
        let mut headers = defaults.headers.clone();
        headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        RequestOptions { headers }
    }
}

/// One fetch operation as handed to [`fetch`]
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Source URL
    pub url: String,
    /// Logical entry name, used for diagnostics
    pub name: String,
    /// Suppress archive auto-extraction regardless of URL suffix
    pub raw: bool,
    /// Headers for the HTTP layer
    pub options: RequestOptions,
}

/// Whether a URL selects the archive branch. The test is a case-sensitive
/// suffix match on the URL itself, never on the response content type.
pub(crate) fn is_archive_url(url: &str) -> bool {
    url.ends_with(".tar.gz") || url.ends_with(".tar")
}

/// Fetch one resource into `dest`, assembling archives in `staging` first.
///
/// Pre-existing content at `dest` is never deleted here; the store removes
/// stale entries before calling. On success the staging directory has been
/// consumed by the final rename; on failure its removal is best-effort.
pub(crate) async fn fetch(
    client: &reqwest::Client,
    request: &FetchRequest,
    staging: &Path,
    dest: &Path,
    reporter: &Reporter,
) -> KitbagResult<PathBuf> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| KitbagError::io(format!("creating {}", parent.display()), e))?;
    }

    let mut req = client.get(&request.url);
    for (key, value) in &request.options.headers {
        req = req.header(key.as_str(), value.as_str());
    }

    // A transport failure here is a network error; a response with a bad
    // status code is a download error. Callers distinguish them in logs.
    let response = req.send().await.map_err(|e| KitbagError::Network {
        url: request.url.clone(),
        source: e,
    })?;

    let status = response.status().as_u16();
    if !(200..=399).contains(&status) {
        return Err(KitbagError::Download {
            url: request.url.clone(),
            status,
        });
    }

    if !request.raw && is_archive_url(&request.url) {
        reporter.verbose(format!("fetching and extracting {}", request.name));
        reporter.debug(format!("  from {}", request.url));
        reporter.debug(format!("  to {}", dest.display()));
        reporter.debug(format!("  staging {}", staging.display()));

        let result = fetch_archive(response, &request.url, staging, dest).await;
        if result.is_err() {
            let _ = tokio::fs::remove_dir_all(staging).await;
        }
        result
    } else {
        reporter.verbose(format!("fetching {}", request.name));
        reporter.debug(format!("  from {}", request.url));
        reporter.debug(format!("  to {}", dest.display()));

        fetch_raw(response, &request.url, dest).await
    }
}

/// Archive branch: stream the body, unpack with strip-1 into `staging`,
/// then rename `staging` to `dest`.
async fn fetch_archive(
    response: reqwest::Response,
    url: &str,
    staging: &Path,
    dest: &Path,
) -> KitbagResult<PathBuf> {
    tokio::fs::create_dir_all(staging)
        .await
        .map_err(|e| KitbagError::io(format!("creating {}", staging.display()), e))?;

    let body = read_body(response, url).await?;

    let gzipped = url.ends_with(".tar.gz");
    let unpack_dir = staging.to_path_buf();
    tokio::task::spawn_blocking(move || extract_stripped(&body, &unpack_dir, gzipped))
        .await
        .map_err(|e| KitbagError::Extract {
            reason: format!("extraction task panicked: {e}"),
        })??;

    tokio::fs::rename(staging, dest)
        .await
        .map_err(|e| KitbagError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;

    debug!(dest = %dest.display(), "archive extracted");
    Ok(dest.to_path_buf())
}

/// Raw branch: stream the body straight into a file at `dest`.
async fn fetch_raw(
    response: reqwest::Response,
    url: &str,
    dest: &Path,
) -> KitbagResult<PathBuf> {
    let write_err = |e: std::io::Error| KitbagError::Write {
        path: dest.to_path_buf(),
        source: e,
    };

    let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| KitbagError::Network {
            url: url.to_string(),
            source: e,
        })?;
        file.write_all(&chunk).await.map_err(write_err)?;
    }
    file.flush().await.map_err(write_err)?;

    debug!(dest = %dest.display(), "fetch complete");
    Ok(dest.to_path_buf())
}

/// Drain a response body into memory, mapping stream failures to
/// network errors.
async fn read_body(response: reqwest::Response, url: &str) -> KitbagResult<Vec<u8>> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| KitbagError::Network {
            url: url.to_string(),
            source: e,
        })?;
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Unpack a tar (optionally gzip-compressed) byte buffer into `dest`,
/// discarding the first path component of every entry (strip-1). Entries
/// that consist only of the top-level component are skipped. The strip is
/// applied per entry, so archives without a shared top directory lose each
/// entry's own first segment.
fn extract_stripped(body: &[u8], dest: &Path, gzipped: bool) -> KitbagResult<()> {
    let extract_err = |e: std::io::Error| KitbagError::Extract {
        reason: e.to_string(),
    };

    let cursor = Cursor::new(body);
    let reader: Box<dyn Read> = if gzipped {
        Box::new(flate2::read::GzDecoder::new(cursor))
    } else {
        Box::new(cursor)
    };

    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        let path = entry.path().map_err(extract_err)?.into_owned();

        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }
        if stripped
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(KitbagError::Extract {
                reason: format!("entry {} escapes the extraction directory", path.display()),
            });
        }

        let out = dest.join(&stripped);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(extract_err)?;
        }
        entry.unpack(&out).map_err(extract_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write as _;

    #[test]
    fn archive_url_detection() {
        assert!(is_archive_url("http://host/pkg.tar.gz"));
        assert!(is_archive_url("http://host/pkg.tar"));
        assert!(!is_archive_url("http://host/pkg.zip"));
        assert!(!is_archive_url("http://host/pkg.tgz"));
        // Case-sensitive by contract
        assert!(!is_archive_url("http://host/pkg.TAR.GZ"));
        // Suffix of the URL, not of the response
        assert!(!is_archive_url("http://host/pkg.tar.gz?download=1"));
    }

    #[test]
    fn request_options_merge_per_call_wins() {
        let mut defaults = RequestOptions::default();
        defaults
            .headers
            .insert("authorization".into(), "Bearer default".into());
        defaults.headers.insert("accept".into(), "*/*".into());

        let mut per_call = RequestOptions::default();
        per_call
            .headers
            .insert("authorization".into(), "Bearer call".into());

        let merged = per_call.merged_over(&defaults);
        assert_eq!(merged.headers["authorization"], "Bearer call");
        assert_eq!(merged.headers["accept"], "*/*");
    }

    /// Build a gzip-compressed tar containing the given (path, contents)
    /// regular files.
    fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            // Write the name bytes directly so fixtures can contain paths
            // (e.g. `..` segments) that `append_data` would refuse to encode.
            header.as_old_mut().name[..path.len()].copy_from_slice(path.as_bytes());
            header.set_cksum();
            builder.append(&header, contents.as_bytes()).unwrap();
        }
        let tarball = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tarball).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn extract_strips_top_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let body = tar_gz(&[
            ("pkg-1.0/a.txt", "alpha"),
            ("pkg-1.0/sub/b.txt", "beta"),
        ]);

        extract_stripped(&body, temp.path(), true).unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("a.txt")).unwrap(),
            "alpha"
        );
        assert_eq!(
            std::fs::read_to_string(temp.path().join("sub/b.txt")).unwrap(),
            "beta"
        );
        assert!(!temp.path().join("pkg-1.0").exists());
    }

    #[test]
    fn extract_plain_tar() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(2);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "top/f.txt", "hi".as_bytes())
            .unwrap();
        let body = builder.into_inner().unwrap();

        extract_stripped(&body, temp.path(), false).unwrap();
        assert_eq!(
            std::fs::read_to_string(temp.path().join("f.txt")).unwrap(),
            "hi"
        );
    }

    #[test]
    fn extract_strips_per_entry_without_common_top() {
        // No shared top directory: each entry loses its own first segment.
        let temp = tempfile::TempDir::new().unwrap();
        let body = tar_gz(&[("one/a.txt", "1"), ("two/b.txt", "2")]);

        extract_stripped(&body, temp.path(), true).unwrap();

        assert!(temp.path().join("a.txt").is_file());
        assert!(temp.path().join("b.txt").is_file());
    }

    #[test]
    fn extract_skips_bare_top_entries() {
        let temp = tempfile::TempDir::new().unwrap();
        // A single-segment entry strips to nothing and is ignored.
        let body = tar_gz(&[("README", "top-level"), ("pkg/inner.txt", "kept")]);

        extract_stripped(&body, temp.path(), true).unwrap();

        assert!(!temp.path().join("README").exists());
        assert!(temp.path().join("inner.txt").is_file());
    }

    #[test]
    fn extract_rejects_parent_traversal() {
        let temp = tempfile::TempDir::new().unwrap();
        let body = tar_gz(&[("pkg/../../evil.txt", "nope")]);

        let err = extract_stripped(&body, temp.path(), true).unwrap_err();
        assert!(matches!(err, KitbagError::Extract { .. }));
    }

    #[test]
    fn extract_rejects_garbage() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = extract_stripped(b"not a tarball at all", temp.path(), true).unwrap_err();
        assert!(matches!(err, KitbagError::Extract { .. }));
    }
}
