//! End-to-end flow through the coordinator: cloud success against an
//! in-memory object store, and degradation to the local echo provider when
//! the cloud path fails.

use async_trait::async_trait;
use campusdocs_core::{FileCategory, Provider, RetryPolicy};
use campusdocs_storage::{
    CloudStorage, FileProvider, FileSource, FileStore, LocalFallback, StorageError, StorageResult,
    StoredFile,
};
use object_store::memory::InMemory;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn cloud_over_memory() -> CloudStorage {
    CloudStorage::with_store(
        Arc::new(InMemory::new()),
        "campusdocs".to_string(),
        "us-east-1".to_string(),
        Some("http://localhost:9000".to_string()),
        RetryPolicy {
            backoff_step: Duration::from_millis(1),
            ..RetryPolicy::default()
        },
        reqwest::Client::new(),
    )
}

fn file_store(cloud: Arc<dyn FileProvider>) -> FileStore {
    FileStore::new(
        cloud,
        Arc::new(LocalFallback::new()),
        Provider::Cloud,
        reqwest::Client::new(),
    )
}

fn temp_source(content: &[u8]) -> (tempfile::NamedTempFile, String) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    let raw = file.path().to_string_lossy().to_string();
    (file, raw)
}

/// A cloud provider whose uploads always exhaust their retry budget.
struct DeadCloud;

#[async_trait]
impl FileProvider for DeadCloud {
    fn kind(&self) -> Provider {
        Provider::Cloud
    }

    async fn upload(
        &self,
        _source: &FileSource,
        _original_name: &str,
        _content_type: &str,
        _category: FileCategory,
    ) -> StorageResult<StoredFile> {
        Err(StorageError::UploadFailed {
            attempts: 3,
            last: "connection reset by peer".to_string(),
        })
    }

    async fn delete(&self, _remote_name: &str) -> StorageResult<()> {
        Err(StorageError::Connectivity("connection refused".to_string()))
    }

    async fn resolve_url(&self, _remote_name: &str) -> StorageResult<String> {
        Err(StorageError::Connectivity("connection refused".to_string()))
    }
}

#[tokio::test]
async fn upload_with_reachable_cloud_round_trips() {
    let store = file_store(Arc::new(cloud_over_memory()));
    let (_file, source) = temp_source(b"%PDF-1.4 syllabus");

    let result = store
        .upload(&source, "a.pdf", "application/pdf", FileCategory::Syllabi, None)
        .await;

    assert!(result.success);
    assert_eq!(result.provider, Provider::Cloud);
    let url = result.download_url.clone().unwrap();
    assert!(url.starts_with("http://localhost:9000/campusdocs/syllabi/"));

    // Round-trip: get_download_url returns the URL upload produced.
    let remote_name = result.remote_name.unwrap();
    let resolved = store.get_download_url(&remote_name, None).await;
    assert!(resolved.success);
    assert_eq!(resolved.download_url.as_deref(), Some(url.as_str()));

    let deleted = store.delete(&remote_name, None).await;
    assert!(deleted.success);
}

#[tokio::test]
async fn upload_with_dead_cloud_degrades_to_local() {
    let store = file_store(Arc::new(DeadCloud));
    let (_file, source) = temp_source(b"%PDF-1.4 results");

    let result = store
        .upload(&source, "a.pdf", "application/pdf", FileCategory::Results, None)
        .await;

    assert!(result.success);
    assert_eq!(result.provider, Provider::Local);
    assert_eq!(result.download_url.as_deref(), Some(source.as_str()));
    assert!(!result.fallback_reason.as_deref().unwrap().is_empty());

    // A name minted by the fallback deletes trivially even though the cloud
    // provider is dead.
    let remote_name = result.remote_name.unwrap();
    let deleted = store.delete(&remote_name, None).await;
    assert!(deleted.success);
}

#[tokio::test]
async fn unreadable_source_fails_without_fallback() {
    let store = file_store(Arc::new(cloud_over_memory()));

    let result = store
        .upload(
            "file:///nonexistent.pdf",
            "x.pdf",
            "application/pdf",
            FileCategory::Resources,
            None,
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.provider, Provider::Cloud);
    assert!(!result.error.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_uploads_of_same_name_get_distinct_remote_names() {
    let store = file_store(Arc::new(cloud_over_memory()));
    let (_file, source) = temp_source(b"shared name");

    let first = store
        .upload(&source, "a.pdf", "application/pdf", FileCategory::Submissions, None)
        .await;
    // Remote names are timestamped at millisecond resolution; step past the
    // current millisecond so the second upload mints a different one.
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = store
        .upload(&source, "a.pdf", "application/pdf", FileCategory::Submissions, None)
        .await;

    assert!(first.success && second.success);
    assert_ne!(first.remote_name.unwrap(), second.remote_name.unwrap());
}
