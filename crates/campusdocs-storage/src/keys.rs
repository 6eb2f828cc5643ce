//! Shared name generation for storage providers.
//!
//! Cloud names: `{category}/{unix_millis}_{filename}`. Local fallback
//! names: `local_{unix_millis}_{filename}`. Uniqueness is bounded by clock
//! resolution: two uploads of the same filename in the same millisecond
//! collide. This is an accepted limitation, not a guarantee of global
//! uniqueness.

use campusdocs_core::FileCategory;
use chrono::Utc;

const LOCAL_PREFIX: &str = "local_";

/// Generate a cloud remote name for the given category and filename.
pub fn remote_name(category: FileCategory, filename: &str) -> String {
    remote_name_at(category, Utc::now().timestamp_millis(), filename)
}

/// Generate a cloud remote name with an explicit timestamp.
pub fn remote_name_at(category: FileCategory, unix_millis: i64, filename: &str) -> String {
    format!("{}/{}_{}", category.as_str(), unix_millis, sanitize(filename))
}

/// Generate a local fallback name for the given filename.
pub fn local_name(filename: &str) -> String {
    local_name_at(Utc::now().timestamp_millis(), filename)
}

/// Generate a local fallback name with an explicit timestamp.
pub fn local_name_at(unix_millis: i64, filename: &str) -> String {
    format!("{}{}_{}", LOCAL_PREFIX, unix_millis, sanitize(filename))
}

/// Whether a remote name was minted by the local fallback provider.
pub fn is_local_name(remote_name: &str) -> bool {
    remote_name.starts_with(LOCAL_PREFIX)
}

/// Restrict filenames to URL-safe characters so public URLs can be composed
/// from names without further encoding.
fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
