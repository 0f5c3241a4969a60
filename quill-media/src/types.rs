//! Shared types for the media cloud layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The one current set of temporary role credentials for the media bucket.
///
/// Produced whole by each refresh and persisted as a single JSON value under
/// the `aws_config` settings key; never mutated field-by-field. `expires_at`
/// stays optional so a blob written without one is representable (and gets
/// reported as `invalid` instead of failing deserialization).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialSet {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub region: String,
    pub bucket: String,
    #[serde(default)]
    pub last_refresh: Option<DateTime<Utc>>,
}

impl CredentialSet {
    /// Returns true if the credentials are past (or have no) expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the credentials expire within `lead` of `now`.
    pub fn expires_within_at(&self, now: DateTime<Utc>, lead: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now + lead >= expires_at,
            None => true,
        }
    }

    pub fn expires_within(&self, lead: Duration) -> bool {
        self.expires_within_at(Utc::now(), lead)
    }

    /// Whole minutes until expiry, floored and clamped to zero.
    pub fn minutes_until_expiry_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - now).num_minutes().max(0))
    }
}

/// Result of a refresh cycle, shaped for direct display in the admin panel.
///
/// A rejected concurrent attempt comes back as `success: false` with
/// "Refresh already in progress"; that is a deliberate no-op, not a fault.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Credential health as shown in the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialHealth {
    Valid,
    ExpiringSoon,
    Expired,
    Invalid,
    Missing,
    Error,
}

/// Point-in-time credential snapshot for operational visibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialStatus {
    pub health: CredentialHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whole minutes until expiry, floored, clamped to zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<DateTime<Utc>>,
    pub region: String,
    pub bucket: String,
    pub account_id: String,
    pub role_name: String,
}
