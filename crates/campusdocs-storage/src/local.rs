//! Local fallback provider.
//!
//! A degraded, always-succeeding provider used when the cloud path fails:
//! it "stores" a file by minting a `local_{unix_millis}_{filename}` name
//! and echoing the original source reference back as the download URL. No
//! copy or persistence occurs.
//!
//! Known limitation: if the source reference is an ephemeral device path
//! (e.g. a cache file), the persisted download URL goes stale once that
//! path disappears. The fallback makes no attempt to fix this.

use crate::keys;
use crate::source::FileSource;
use crate::traits::{FileProvider, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use campusdocs_core::{FileCategory, Provider};

#[derive(Clone, Default)]
pub struct LocalFallback;

impl LocalFallback {
    pub fn new() -> Self {
        LocalFallback
    }
}

#[async_trait]
impl FileProvider for LocalFallback {
    fn kind(&self) -> Provider {
        Provider::Local
    }

    async fn upload(
        &self,
        source: &FileSource,
        original_name: &str,
        _content_type: &str,
        _category: FileCategory,
    ) -> StorageResult<StoredFile> {
        if original_name.is_empty() {
            return Err(StorageError::LocalFallback(
                "File name must not be empty".to_string(),
            ));
        }

        let name = keys::local_name(original_name);

        tracing::info!(
            key = %name,
            source = %source.as_str(),
            "Local fallback upload, echoing source reference"
        );

        Ok(StoredFile {
            remote_name: name,
            download_url: source.as_str().to_string(),
        })
    }

    /// Nothing was ever stored for a local name, so there is nothing to
    /// delete.
    async fn delete(&self, remote_name: &str) -> StorageResult<()> {
        tracing::debug!(key = %remote_name, "Local fallback delete is a no-op");
        Ok(())
    }

    /// The original source reference is not recoverable from the name; the
    /// coordinator treats URL resolution for local names as a no-op.
    async fn resolve_url(&self, remote_name: &str) -> StorageResult<String> {
        Err(StorageError::InvalidKey(format!(
            "No resolvable URL for locally stored name {}",
            remote_name
        )))
    }
}
