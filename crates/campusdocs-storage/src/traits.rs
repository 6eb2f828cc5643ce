//! Storage abstraction trait
//!
//! This module defines the FileProvider trait that both backends implement,
//! and the closed error taxonomy the coordinator matches on.

use crate::source::FileSource;
use async_trait::async_trait;
use campusdocs_core::{FileCategory, Provider};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Source validation failed: {0}")]
    Validation(String),

    #[error("Cloud provider unreachable: {0}")]
    Connectivity(String),

    #[error("Source fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("Source fetch failed: {0}")]
    FetchFailed(String),

    #[error("Source is empty: {0}")]
    EmptySource(String),

    #[error("Upload attempt timed out after {0:?}")]
    UploadTimeout(Duration),

    #[error("Provider API error: {0}")]
    ProviderApi(String),

    #[error("Upload failed after {attempts} attempts: {last}")]
    UploadFailed { attempts: u32, last: String },

    #[error("Local fallback failed: {0}")]
    LocalFallback(String),

    #[error("Invalid remote name: {0}")]
    InvalidKey(String),

    #[error("Storage configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A successfully stored file: the key it was stored under and the URL it
/// can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub remote_name: String,
    pub download_url: String,
}

/// Storage provider trait
///
/// One implementation per backend (cloud object store, local fallback).
/// The coordinator owns one of each and dispatches on the requested
/// [`Provider`]; adding a backend is an additive change, not a new branch
/// sprinkled through call sites.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Which backend this provider is.
    fn kind(&self) -> Provider;

    /// Store the source and return the key and public URL for it.
    ///
    /// The source has already been validated as reachable by the time a
    /// provider sees it.
    async fn upload(
        &self,
        source: &FileSource,
        original_name: &str,
        content_type: &str,
        category: FileCategory,
    ) -> StorageResult<StoredFile>;

    /// Delete an object by its remote name. Deleting a name that doesn't
    /// exist is a success.
    async fn delete(&self, remote_name: &str) -> StorageResult<()>;

    /// Resolve the public download URL for a remote name.
    async fn resolve_url(&self, remote_name: &str) -> StorageResult<String>;
}
