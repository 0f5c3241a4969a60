//! Media cloud error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media cloud operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur in the credential lifecycle and media transport.
///
/// The precondition variants carry operator guidance: a missing cache or a
/// stale token means "re-authenticate locally", while a provider refusal
/// points at a permissions or provider-side problem.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("SSO cache directory not found at {}: run `aws sso login` to authenticate", .0.display())]
    SsoCacheMissing(PathBuf),

    #[error("no unexpired SSO access token in cache: run `aws sso login` to re-authenticate")]
    NoValidSsoToken,

    #[error("identity provider returned no credentials for role {role} in account {account}")]
    NoRoleCredentials { account: String, role: String },

    #[error("GetRoleCredentials call failed: {0}")]
    TokenExchange(String),

    #[error("no credentials configured for the media library")]
    CredentialsMissing,

    #[error("credentials expired or invalid")]
    CredentialExpired,

    #[error("S3 operation failed: {0}")]
    S3(String),

    #[error("settings store error: {0}")]
    Settings(#[from] quill_settings::SettingsError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
