use crate::keys;
use crate::source::FileSource;
use crate::traits::{FileProvider, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use bytes::Bytes;
use campusdocs_core::{FileCategory, Provider, RetryPolicy, StoreConfig};
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectMeta, ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::sync::Arc;

/// Cloud object-store provider.
///
/// Works against AWS S3 or any S3-compatible provider (MinIO, DigitalOcean
/// Spaces, a Supabase storage gateway) via a custom endpoint. The inner
/// store handle is injectable so tests can run against an in-memory store.
#[derive(Clone)]
pub struct CloudStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    retry: RetryPolicy,
    http: reqwest::Client,
}

impl CloudStorage {
    /// Create a new CloudStorage instance from configuration.
    ///
    /// Credentials are taken from the environment, as with the AWS SDKs.
    pub async fn new(config: &StoreConfig, http: reqwest::Client) -> StorageResult<Self> {
        let bucket = config
            .s3_bucket
            .clone()
            .ok_or_else(|| StorageError::Config("S3_BUCKET not configured".to_string()))?;
        let region = config.s3_region.clone().ok_or_else(|| {
            StorageError::Config("S3_REGION or AWS_REGION not configured".to_string())
        })?;

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = config.s3_endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self::with_store(
            Arc::new(store),
            bucket,
            region,
            config.s3_endpoint.clone(),
            config.retry.clone(),
            http,
        ))
    }

    /// Create a CloudStorage over an explicit store handle.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        retry: RetryPolicy,
        http: reqwest::Client,
    ) -> Self {
        CloudStorage {
            store,
            bucket,
            region,
            endpoint_url,
            retry,
            http,
        }
    }

    /// Connectivity probe: list at most one object. A dead link fails here
    /// once, before any of the attempt budget is spent on real transfers.
    async fn probe(&self) -> StorageResult<()> {
        let mut listing = self.store.list(None);
        probe_outcome(listing.next().await).map_err(|e| {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                "Cloud connectivity probe failed"
            );
            e
        })
    }

    /// Read the source into memory under the fetch timeout. An empty buffer
    /// is rejected rather than uploaded as an empty object.
    async fn fetch(&self, source: &FileSource) -> StorageResult<Bytes> {
        let data = tokio::time::timeout(self.retry.fetch_timeout, source.fetch(&self.http))
            .await
            .map_err(|_| StorageError::FetchTimeout(self.retry.fetch_timeout))??;

        if data.is_empty() {
            return Err(StorageError::EmptySource(source.as_str().to_string()));
        }
        Ok(data)
    }

    async fn put_with_retry(&self, location: &Path, data: Bytes) -> StorageResult<()> {
        let store = Arc::clone(&self.store);
        let attempt_timeout = self.retry.attempt_timeout;

        run_attempts(&self.retry, |_attempt| {
            let store = Arc::clone(&store);
            let location = location.clone();
            let payload = data.clone();
            async move {
                let put = store.put(&location, PutPayload::from(payload));
                match tokio::time::timeout(attempt_timeout, put).await {
                    Ok(result) => result
                        .map(|_| ())
                        .map_err(|e| StorageError::ProviderApi(e.to_string())),
                    Err(_) => Err(StorageError::UploadTimeout(attempt_timeout)),
                }
            }
        })
        .await
    }

    /// Generate public URL for a stored object.
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style from the endpoint URL.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    fn check_key(&self, remote_name: &str) -> StorageResult<()> {
        if remote_name.is_empty() || remote_name.starts_with('/') {
            return Err(StorageError::InvalidKey(remote_name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FileProvider for CloudStorage {
    fn kind(&self) -> Provider {
        Provider::Cloud
    }

    async fn upload(
        &self,
        source: &FileSource,
        original_name: &str,
        _content_type: &str,
        category: FileCategory,
    ) -> StorageResult<StoredFile> {
        self.probe().await?;

        let data = self.fetch(source).await?;
        let size = data.len() as u64;

        let key = keys::remote_name(category, original_name);
        let location = Path::from(key.clone());

        let start = std::time::Instant::now();
        self.put_with_retry(&location, data).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloud upload failed"
            );
            e
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud upload successful"
        );

        Ok(StoredFile {
            remote_name: key,
            download_url: url,
        })
    }

    async fn delete(&self, remote_name: &str) -> StorageResult<()> {
        self.check_key(remote_name)?;
        let location = Path::from(remote_name.to_string());
        let start = std::time::Instant::now();

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %remote_name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud delete successful"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %remote_name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloud delete failed"
                );
                Err(StorageError::ProviderApi(e.to_string()))
            }
        }
    }

    async fn resolve_url(&self, remote_name: &str) -> StorageResult<String> {
        self.check_key(remote_name)?;
        Ok(self.generate_url(remote_name))
    }
}

/// Decide reachability from the first item of a bucket listing. `NotFound`
/// (an empty or not-yet-created bucket) still proves the link is alive;
/// only transport and API errors count as connectivity failures.
fn probe_outcome(first: Option<ObjectResult<ObjectMeta>>) -> StorageResult<()> {
    match first {
        Some(Err(ObjectStoreError::NotFound { .. })) => Ok(()),
        Some(Err(e)) => Err(StorageError::Connectivity(e.to_string())),
        Some(Ok(_)) | None => Ok(()),
    }
}

/// Run up to `policy.max_attempts` sequential attempts with linear backoff
/// (`attempt_index * backoff_step`) between failures. After exhaustion the
/// last error is folded into an aggregated `UploadFailed`.
async fn run_attempts<F, Fut>(policy: &RetryPolicy, mut attempt: F) -> StorageResult<()>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = StorageResult<()>>,
{
    let mut last = String::new();

    for index in 1..=policy.max_attempts {
        match attempt(index).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(
                    attempt = index,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Upload attempt failed"
                );
                last = e.to_string();
            }
        }

        if index < policy.max_attempts {
            tokio::time::sleep(policy.backoff_step * index).await;
        }
    }

    Err(StorageError::UploadFailed {
        attempts: policy.max_attempts,
        last,
    })
}
