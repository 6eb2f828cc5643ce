//! Configuration module
//!
//! Environment-driven configuration for the file-storage layer. The config
//! is constructed once at startup and passed explicitly into the store
//! factory; it is never mutated per call.

use std::env;
use std::time::Duration;

use crate::types::Provider;

// Defaults for the transfer tunables
const FETCH_TIMEOUT_SECS: u64 = 15;
const ATTEMPT_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_ATTEMPTS: u32 = 3;
const BACKOFF_STEP_MS: u64 = 1000;

/// Timeout and retry tunables for cloud transfers.
///
/// The backoff is linear: the wait after attempt `n` is `n * backoff_step`.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Timeout for reading the source into memory.
    pub fetch_timeout: Duration,
    /// Timeout for a single upload attempt, independent of the fetch timeout.
    pub attempt_timeout: Duration,
    /// Maximum number of upload attempts before giving up.
    pub max_attempts: u32,
    /// Linear backoff step between failed attempts.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            attempt_timeout: Duration::from_secs(ATTEMPT_TIMEOUT_SECS),
            max_attempts: MAX_UPLOAD_ATTEMPTS,
            backoff_step: Duration::from_millis(BACKOFF_STEP_MS),
        }
    }
}

/// File-storage configuration.
///
/// Read-only for the lifetime of the process; safe to share across any
/// number of concurrent calls.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Provider used when a call doesn't request one explicitly.
    pub default_provider: Provider,
    /// S3 bucket name.
    pub s3_bucket: Option<String>,
    /// AWS region (or region identifier for S3-compatible providers).
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean
    /// Spaces, Supabase storage gateway, etc.)
    pub s3_endpoint: Option<String>,
    pub retry: RetryPolicy,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let default_provider = match env::var("STORAGE_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => Provider::Cloud,
        };

        let retry = RetryPolicy {
            fetch_timeout: Duration::from_secs(env_u64("FETCH_TIMEOUT_SECS", FETCH_TIMEOUT_SECS)?),
            attempt_timeout: Duration::from_secs(env_u64(
                "UPLOAD_ATTEMPT_TIMEOUT_SECS",
                ATTEMPT_TIMEOUT_SECS,
            )?),
            max_attempts: env_u64("UPLOAD_MAX_ATTEMPTS", MAX_UPLOAD_ATTEMPTS as u64)? as u32,
            backoff_step: Duration::from_millis(env_u64(
                "UPLOAD_BACKOFF_STEP_MS",
                BACKOFF_STEP_MS,
            )?),
        };

        Ok(StoreConfig {
            default_provider,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or(env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            retry,
        })
    }

    /// Startup validation. The cloud provider needs a bucket and region even
    /// when local is the default, since fallback targets never reach the
    /// cloud but explicit cloud requests still can.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.s3_bucket.is_none() {
            anyhow::bail!("S3_BUCKET not configured");
        }
        if self.s3_region.is_none() {
            anyhow::bail!("S3_REGION or AWS_REGION not configured");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("UPLOAD_MAX_ATTEMPTS must be at least 1");
        }
        Ok(())
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64, anyhow::Error> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid value for {}: {}", key, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.fetch_timeout, Duration::from_secs(15));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(30));
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_step, Duration::from_millis(1000));
    }

    #[test]
    fn malformed_numeric_env_is_rejected() {
        env::set_var("UPLOAD_MAX_ATTEMPTS", "three");
        let result = StoreConfig::from_env();
        env::remove_var("UPLOAD_MAX_ATTEMPTS");

        let err = result.unwrap_err().to_string();
        assert!(err.contains("UPLOAD_MAX_ATTEMPTS"));
    }

    #[test]
    fn validate_requires_bucket_and_region() {
        let config = StoreConfig {
            default_provider: Provider::Cloud,
            s3_bucket: None,
            s3_region: Some("us-east-1".to_string()),
            s3_endpoint: None,
            retry: RetryPolicy::default(),
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            s3_bucket: Some("campusdocs".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
