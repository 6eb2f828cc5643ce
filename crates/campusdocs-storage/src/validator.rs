//! Source validation.
//!
//! A lightweight existence check performed before any transfer is
//! attempted: a metadata lookup for local paths, an HTTP HEAD for URLs. No
//! content is downloaded. Validation failure is fatal and never triggers
//! fallback; an unreadable source is unrelated to cloud availability, so
//! degrading to local storage cannot help.

use crate::source::FileSource;
use crate::traits::{StorageError, StorageResult};

#[derive(Clone)]
pub struct SourceValidator {
    http: reqwest::Client,
}

impl SourceValidator {
    pub fn new(http: reqwest::Client) -> Self {
        SourceValidator { http }
    }

    /// Confirm the source is currently readable.
    pub async fn validate(&self, source: &FileSource) -> StorageResult<()> {
        if let Some(path) = source.local_path() {
            let meta = tokio::fs::metadata(path).await.map_err(|e| {
                StorageError::Validation(format!("Source {} is not readable: {}", path.display(), e))
            })?;
            if !meta.is_file() {
                return Err(StorageError::Validation(format!(
                    "Source {} is not a regular file",
                    path.display()
                )));
            }
            Ok(())
        } else {
            self.http
                .head(source.as_str())
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| {
                    StorageError::Validation(format!(
                        "Source {} is not reachable: {}",
                        source.as_str(),
                        e
                    ))
                })?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn validator() -> SourceValidator {
        SourceValidator::new(reqwest::Client::new())
    }

    #[tokio::test]
    async fn validate_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data").unwrap();

        let source = FileSource::parse(&file.path().to_string_lossy());
        assert!(validator().validate(&source).await.is_ok());
    }

    #[tokio::test]
    async fn validate_missing_file_fails() {
        let source = FileSource::parse("file:///nonexistent.pdf");
        let result = validator().validate(&source).await;
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[tokio::test]
    async fn validate_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::parse(&dir.path().to_string_lossy());
        let result = validator().validate(&source).await;
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }
}
