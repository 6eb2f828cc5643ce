//! CampusDocs Storage Library
//!
//! This crate implements the file-storage abstraction layer: it validates a
//! caller-supplied source reference, uploads it to a durable cloud object
//! store with bounded retries and timeouts, and degrades to a local echo
//! provider when the cloud path is unavailable. The only public entry point
//! collaborators call is [`FileStore`], which never returns an error: every
//! outcome is normalized into the result structs from `campusdocs-core`.
//!
//! # Remote name format
//!
//! Cloud objects are named `{category}/{unix_millis}_{filename}`; names
//! minted by the local fallback are `local_{unix_millis}_{filename}`. Name
//! generation is centralized in the `keys` module so all providers stay
//! consistent.

pub mod cloud;
pub mod keys;
pub mod local;
pub mod source;
pub mod store;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use cloud::CloudStorage;
pub use local::LocalFallback;
pub use source::FileSource;
pub use store::{create_file_store, FileStore};
pub use traits::{FileProvider, StorageError, StorageResult, StoredFile};
pub use validator::SourceValidator;
