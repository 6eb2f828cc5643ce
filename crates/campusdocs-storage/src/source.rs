//! Source references.
//!
//! A source is whatever string the caller hands us for the file to store:
//! a local path, a `file://` URL, or an `http(s)://` URL. The original
//! string is kept verbatim because the local fallback provider echoes it
//! back as the stored download URL.

use crate::traits::{StorageError, StorageResult};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// A parsed source reference.
#[derive(Debug, Clone)]
pub struct FileSource {
    raw: String,
    kind: SourceKind,
}

#[derive(Debug, Clone)]
enum SourceKind {
    Path(PathBuf),
    Url,
}

impl FileSource {
    /// Parse a caller-supplied source reference. `file://` URLs and bare
    /// paths resolve to local paths; `http://`/`https://` to remote URLs.
    pub fn parse(raw: &str) -> Self {
        let kind = if raw.starts_with("http://") || raw.starts_with("https://") {
            SourceKind::Url
        } else if let Some(path) = raw.strip_prefix("file://") {
            SourceKind::Path(PathBuf::from(path))
        } else {
            SourceKind::Path(PathBuf::from(raw))
        };
        FileSource {
            raw: raw.to_string(),
            kind,
        }
    }

    /// The original reference, verbatim.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The local path, if this source is one.
    pub fn local_path(&self) -> Option<&Path> {
        match &self.kind {
            SourceKind::Path(path) => Some(path),
            SourceKind::Url => None,
        }
    }

    /// Read the source into memory. No timeout is applied here; the cloud
    /// provider wraps this call in its fetch timeout.
    pub async fn fetch(&self, http: &reqwest::Client) -> StorageResult<Bytes> {
        match &self.kind {
            SourceKind::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    StorageError::FetchFailed(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Bytes::from(data))
            }
            SourceKind::Url => {
                let response = http
                    .get(&self.raw)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| {
                        StorageError::FetchFailed(format!("Failed to fetch {}: {}", self.raw, e))
                    })?;
                response.bytes().await.map_err(|e| {
                    StorageError::FetchFailed(format!(
                        "Failed to read body of {}: {}",
                        self.raw, e
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_keeps_original_reference() {
        let source = FileSource::parse("file:///tmp/a.pdf");
        assert_eq!(source.as_str(), "file:///tmp/a.pdf");
        assert_eq!(source.local_path().unwrap(), Path::new("/tmp/a.pdf"));

        let source = FileSource::parse("/tmp/b.pdf");
        assert_eq!(source.local_path().unwrap(), Path::new("/tmp/b.pdf"));

        let source = FileSource::parse("https://example.com/c.pdf");
        assert!(source.local_path().is_none());
        assert_eq!(source.as_str(), "https://example.com/c.pdf");
    }

    #[tokio::test]
    async fn fetch_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"syllabus content").unwrap();

        let source = FileSource::parse(&file.path().to_string_lossy());
        let data = source.fetch(&reqwest::Client::new()).await.unwrap();
        assert_eq!(&data[..], b"syllabus content");
    }

    #[tokio::test]
    async fn fetch_missing_file_fails() {
        let source = FileSource::parse("/nonexistent/never.pdf");
        let result = source.fetch(&reqwest::Client::new()).await;
        assert!(matches!(result, Err(StorageError::FetchFailed(_))));
    }
}
