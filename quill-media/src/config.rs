//! Media cloud configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the media library's cloud layer.
///
/// Values are fixed at construction; the platform wires them from its
/// deployment settings rather than the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaCloudConfig {
    /// Target AWS account for role credentials.
    pub account_id: String,

    /// SSO role to obtain credentials for.
    pub role_name: String,

    /// AWS region for SSO and S3.
    pub region: String,

    /// Media bucket name.
    pub bucket: String,

    /// Override for the SSO token cache directory (defaults to `~/.aws/sso/cache`).
    pub sso_cache_dir: Option<PathBuf>,

    /// Optional S3 endpoint override (Oracle OCI compat mode, MinIO in testing).
    pub s3_endpoint_override: Option<String>,

    /// Refresh this long before credential expiry (seconds).
    pub refresh_lead_secs: i64,

    /// Auto-refresh poll interval (seconds).
    pub poll_interval_secs: u64,

    /// Delay before the first check after startup (seconds).
    pub startup_delay_secs: u64,
}

impl Default for MediaCloudConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            role_name: "QuillMediaAccess".to_string(),
            region: "us-east-1".to_string(),
            bucket: "quill-media".to_string(),
            sso_cache_dir: None,
            s3_endpoint_override: None,
            refresh_lead_secs: 30 * 60, // refresh 30 minutes before expiry
            poll_interval_secs: 15 * 60,
            startup_delay_secs: 5,
        }
    }
}

impl MediaCloudConfig {
    /// Lead time before expiry at which a refresh becomes due.
    pub fn refresh_lead(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_lead_secs)
    }
}
