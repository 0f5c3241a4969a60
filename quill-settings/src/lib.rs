//! Key-value settings store for Quill.
//!
//! Backs the platform's generic `settings` table: small JSON configuration
//! blobs keyed by name (cloud credentials, site metadata, feature toggles).
//! DuckDB is the embedded engine, shared with the rest of the backend's
//! storage layer.

mod error;
mod settings_store;

pub use error::{SettingsError, SettingsResult};
pub use settings_store::SettingsStore;
