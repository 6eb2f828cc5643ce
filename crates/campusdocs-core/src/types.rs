use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider backends
///
/// This enum defines the backends capable of satisfying an upload, delete,
/// or URL-resolution request. It's defined in core because it's used in
/// configuration and in the result structs callers persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Cloud,
    Local,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloud" => Ok(Provider::Cloud),
            "local" => Ok(Provider::Local),
            _ => Err(anyhow::anyhow!("Invalid provider: {}", s)),
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Provider::Cloud => write!(f, "cloud"),
            Provider::Local => write!(f, "local"),
        }
    }
}

/// Document categories
///
/// Supplies the `{category}` segment of remote object names
/// (`{category}/{unix_millis}_{filename}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Syllabi,
    Results,
    Submissions,
    Resources,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Syllabi => "syllabi",
            FileCategory::Results => "results",
            FileCategory::Submissions => "submissions",
            FileCategory::Resources => "resources",
        }
    }
}

impl FromStr for FileCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "syllabi" => Ok(FileCategory::Syllabi),
            "results" => Ok(FileCategory::Results),
            "submissions" => Ok(FileCategory::Submissions),
            "resources" => Ok(FileCategory::Resources),
            _ => Err(anyhow::anyhow!("Invalid file category: {}", s)),
        }
    }
}

impl Display for FileCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an upload request.
///
/// Callers persist `remote_name`, `download_url`, `provider`, and
/// `fallback_reason` alongside their own records. The struct is only built
/// through the constructors below, which maintain the invariants:
/// `success == true` implies `download_url` is present; `error` is present
/// only when `success == false`; `fallback_reason` is present only when the
/// local provider served the request because the cloud path failed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadResult {
    pub success: bool,
    pub remote_name: Option<String>,
    pub download_url: Option<String>,
    pub provider: Provider,
    pub error: Option<String>,
    pub fallback_reason: Option<String>,
}

impl UploadResult {
    /// Successful upload served by the requested provider (no fallback).
    pub fn succeeded(provider: Provider, remote_name: String, download_url: String) -> Self {
        UploadResult {
            success: true,
            remote_name: Some(remote_name),
            download_url: Some(download_url),
            provider,
            error: None,
            fallback_reason: None,
        }
    }

    /// Successful upload served by the local provider after the cloud path
    /// failed. `reason` is the cloud provider's terminal error message.
    pub fn fallen_back(remote_name: String, download_url: String, reason: String) -> Self {
        UploadResult {
            success: true,
            remote_name: Some(remote_name),
            download_url: Some(download_url),
            provider: Provider::Local,
            error: None,
            fallback_reason: Some(reason),
        }
    }

    /// Hard failure. `provider` is the provider the failure is attributed
    /// to: the requested provider for validation failures, local when even
    /// the fallback failed.
    pub fn failed(provider: Provider, error: String) -> Self {
        UploadResult {
            success: false,
            remote_name: None,
            download_url: None,
            provider,
            error: Some(error),
            fallback_reason: None,
        }
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub error: Option<String>,
}

impl DeleteResult {
    pub fn succeeded() -> Self {
        DeleteResult {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        DeleteResult {
            success: false,
            error: Some(error),
        }
    }
}

/// Outcome of a download-URL resolution request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UrlResult {
    pub success: bool,
    pub download_url: Option<String>,
    pub error: Option<String>,
}

impl UrlResult {
    pub fn resolved(download_url: String) -> Self {
        UrlResult {
            success: true,
            download_url: Some(download_url),
            error: None,
        }
    }

    /// No-op success: the object was never stored in the cloud, so there is
    /// nothing to resolve.
    pub fn noop() -> Self {
        UrlResult {
            success: true,
            download_url: None,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        UrlResult {
            success: false,
            download_url: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn provider_round_trip() {
        assert_eq!(Provider::from_str("cloud").unwrap(), Provider::Cloud);
        assert_eq!(Provider::from_str("LOCAL").unwrap(), Provider::Local);
        assert!(Provider::from_str("supabase").is_err());
        assert_eq!(Provider::Cloud.to_string(), "cloud");
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            FileCategory::from_str("Results").unwrap(),
            FileCategory::Results
        );
        assert_eq!(FileCategory::Syllabi.as_str(), "syllabi");
        assert!(FileCategory::from_str("homework").is_err());
    }

    #[test]
    fn upload_result_invariants() {
        let ok = UploadResult::succeeded(
            Provider::Cloud,
            "results/1_a.pdf".to_string(),
            "https://example/results/1_a.pdf".to_string(),
        );
        assert!(ok.success);
        assert!(ok.download_url.is_some());
        assert!(ok.error.is_none());
        assert!(ok.fallback_reason.is_none());

        let fb = UploadResult::fallen_back(
            "local_1_a.pdf".to_string(),
            "file:///tmp/a.pdf".to_string(),
            "probe failed".to_string(),
        );
        assert!(fb.success);
        assert_eq!(fb.provider, Provider::Local);
        assert_eq!(fb.fallback_reason.as_deref(), Some("probe failed"));

        let failed = UploadResult::failed(Provider::Cloud, "unreadable".to_string());
        assert!(!failed.success);
        assert!(failed.download_url.is_none());
        assert!(failed.error.is_some());
    }

    #[test]
    fn results_serialize_with_lowercase_provider() {
        let fb = UploadResult::fallen_back(
            "local_1_a.pdf".to_string(),
            "file:///tmp/a.pdf".to_string(),
            "probe failed".to_string(),
        );
        let json = serde_json::to_value(&fb).unwrap();
        assert_eq!(json["provider"], "local");
        assert_eq!(json["success"], true);
    }
}
