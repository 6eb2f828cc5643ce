//! CampusDocs Core Library
//!
//! This crate provides the shared domain types and configuration used by the
//! CampusDocs file-storage layer: the provider enum, file categories, the
//! result structs persisted by callers, and the environment-driven config.

pub mod config;
pub mod types;

// Re-export commonly used types
pub use config::{RetryPolicy, StoreConfig};
pub use types::{DeleteResult, FileCategory, Provider, UploadResult, UrlResult};
