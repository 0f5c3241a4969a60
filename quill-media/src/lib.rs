//! Media library cloud services for Quill.
//!
//! Provides the blogging platform's media storage backend:
//! - SSO credential lifecycle with expiry-led auto-refresh
//! - Single-flight refresh orchestration with a structured outcome surface
//! - Credential status reporting for the admin panel
//! - S3 media transport (AWS or S3-compatible endpoints)

pub mod config;
pub mod credential_manager;
pub mod credential_store;
pub mod error;
pub mod media_transport;
pub mod scheduler;
pub mod sso_cache;
pub mod token_exchange;
pub mod types;

pub use config::MediaCloudConfig;
pub use credential_manager::CredentialManager;
pub use credential_store::{AWS_CONFIG_KEY, CredentialStore};
pub use error::{MediaError, MediaResult};
pub use media_transport::MediaTransport;
pub use scheduler::RefreshScheduler;
pub use sso_cache::SsoTokenCache;
pub use token_exchange::{SsoTokenExchange, TokenExchange};
pub use types::*;
