//! Fallback coordinator.
//!
//! `FileStore` is the only component external collaborators call. It runs
//! validation, attempts the requested provider, falls back to the local
//! echo provider when the cloud path fails, and normalizes every outcome
//! into the result structs from `campusdocs-core`. No error escapes any of
//! its methods as an `Err`; callers always receive a value.

use crate::cloud::CloudStorage;
use crate::keys;
use crate::local::LocalFallback;
use crate::source::FileSource;
use crate::traits::{FileProvider, StorageError, StorageResult};
use crate::validator::SourceValidator;
use campusdocs_core::{
    DeleteResult, FileCategory, Provider, StoreConfig, UploadResult, UrlResult,
};
use std::sync::Arc;

pub struct FileStore {
    validator: SourceValidator,
    cloud: Arc<dyn FileProvider>,
    local: Arc<dyn FileProvider>,
    default_provider: Provider,
}

impl FileStore {
    pub fn new(
        cloud: Arc<dyn FileProvider>,
        local: Arc<dyn FileProvider>,
        default_provider: Provider,
        http: reqwest::Client,
    ) -> Self {
        FileStore {
            validator: SourceValidator::new(http),
            cloud,
            local,
            default_provider,
        }
    }

    fn provider_for(&self, provider: Provider) -> &Arc<dyn FileProvider> {
        match provider {
            Provider::Cloud => &self.cloud,
            Provider::Local => &self.local,
        }
    }

    /// Upload a source to the requested provider (or the configured
    /// default), falling back to local storage when the cloud path fails.
    pub async fn upload(
        &self,
        source: &str,
        name: &str,
        content_type: &str,
        category: FileCategory,
        provider: Option<Provider>,
    ) -> UploadResult {
        let requested = provider.unwrap_or(self.default_provider);
        let source = FileSource::parse(source);

        // An unreadable source is unrelated to cloud availability, so
        // validation failure is fatal: no retry, no fallback.
        if let Err(e) = self.validator.validate(&source).await {
            tracing::warn!(
                error = %e,
                source = %source.as_str(),
                provider = %requested,
                "Upload rejected by source validation"
            );
            return UploadResult::failed(requested, e.to_string());
        }

        let primary = self.provider_for(requested);
        match primary.upload(&source, name, content_type, category).await {
            Ok(stored) => UploadResult::succeeded(requested, stored.remote_name, stored.download_url),
            Err(e) if requested == Provider::Cloud && falls_back(&e) => {
                tracing::warn!(
                    error = %e,
                    source = %source.as_str(),
                    "Cloud upload failed, falling back to local provider"
                );
                let reason = e.to_string();
                match self
                    .local
                    .upload(&source, name, content_type, category)
                    .await
                {
                    Ok(stored) => {
                        UploadResult::fallen_back(stored.remote_name, stored.download_url, reason)
                    }
                    Err(local_err) => {
                        tracing::error!(
                            error = %local_err,
                            source = %source.as_str(),
                            "Local fallback failed after cloud failure"
                        );
                        UploadResult::failed(Provider::Local, local_err.to_string())
                    }
                }
            }
            Err(e) => UploadResult::failed(requested, e.to_string()),
        }
    }

    /// Delete an object. Names minted by the local fallback were never
    /// stored in the cloud, so deleting them is a no-op success.
    pub async fn delete(&self, remote_name: &str, provider: Option<Provider>) -> DeleteResult {
        let requested = provider.unwrap_or(self.default_provider);
        if requested == Provider::Local || keys::is_local_name(remote_name) {
            return DeleteResult::succeeded();
        }

        match self.cloud.delete(remote_name).await {
            Ok(()) => DeleteResult::succeeded(),
            Err(e) => {
                tracing::error!(error = %e, key = %remote_name, "Delete failed");
                DeleteResult::failed(e.to_string())
            }
        }
    }

    /// Resolve the public download URL for a remote name. Local-fallback
    /// names have no cloud object behind them; resolution is a no-op
    /// success with no URL.
    pub async fn get_download_url(
        &self,
        remote_name: &str,
        provider: Option<Provider>,
    ) -> UrlResult {
        let requested = provider.unwrap_or(self.default_provider);
        if requested == Provider::Local || keys::is_local_name(remote_name) {
            return UrlResult::noop();
        }

        match self.cloud.resolve_url(remote_name).await {
            Ok(url) => UrlResult::resolved(url),
            Err(e) => {
                tracing::error!(error = %e, key = %remote_name, "URL resolution failed");
                UrlResult::failed(e.to_string())
            }
        }
    }
}

/// Whether a cloud upload error degrades to the local fallback. Matched
/// exhaustively so every error kind has an explicit decision.
fn falls_back(error: &StorageError) -> bool {
    match error {
        // The source itself is suspect; local echo of it cannot help.
        StorageError::Validation(_) => false,
        StorageError::Connectivity(_)
        | StorageError::FetchTimeout(_)
        | StorageError::FetchFailed(_)
        | StorageError::EmptySource(_)
        | StorageError::UploadTimeout(_)
        | StorageError::ProviderApi(_)
        | StorageError::UploadFailed { .. } => true,
        StorageError::LocalFallback(_)
        | StorageError::InvalidKey(_)
        | StorageError::Config(_) => false,
    }
}

/// Create a `FileStore` from configuration. The cloud client and the HTTP
/// client are constructed once here and shared by every call.
pub async fn create_file_store(config: &StoreConfig) -> StorageResult<FileStore> {
    let http = reqwest::Client::new();
    let cloud = CloudStorage::new(config, http.clone()).await?;

    Ok(FileStore::new(
        Arc::new(cloud),
        Arc::new(LocalFallback::new()),
        config.default_provider,
        http,
    ))
}
