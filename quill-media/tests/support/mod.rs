//! Shared helpers for quill-media integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use quill_media::credential_store::CredentialStore;
use quill_media::{
    CredentialManager, CredentialSet, MediaCloudConfig, MediaError, MediaResult, SsoTokenCache,
    TokenExchange,
};
use quill_settings::SettingsStore;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Role credentials expiring the given seconds from now.
pub fn make_creds(expires_in_secs: i64) -> CredentialSet {
    CredentialSet {
        access_key_id: "ASIATEST".to_string(),
        secret_access_key: "secret".to_string(),
        session_token: "token".to_string(),
        expires_at: Some(Utc::now() + Duration::seconds(expires_in_secs)),
        region: "us-east-1".to_string(),
        bucket: "quill-media-test".to_string(),
        last_refresh: None,
    }
}

pub fn test_config() -> MediaCloudConfig {
    MediaCloudConfig {
        account_id: "123456789012".to_string(),
        role_name: "QuillMediaAccess".to_string(),
        ..MediaCloudConfig::default()
    }
}

/// Token exchange double: counts calls, optionally blocks until notified,
/// and fails while `fail` is set.
pub struct FakeExchange {
    calls: AtomicUsize,
    pub fail: AtomicBool,
    gate: Option<Arc<Notify>>,
    expires_in_secs: i64,
}

impl FakeExchange {
    pub fn returning(expires_in_secs: i64) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate: None,
            expires_in_secs,
        })
    }

    pub fn gated(expires_in_secs: i64, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate: Some(gate),
            expires_in_secs,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for FakeExchange {
    async fn exchange(&self, _access_token: &str) -> MediaResult<CredentialSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(MediaError::NoRoleCredentials {
                account: "123456789012".to_string(),
                role: "QuillMediaAccess".to_string(),
            });
        }
        Ok(make_creds(self.expires_in_secs))
    }
}

/// Manager over an in-memory settings store, the given SSO cache directory,
/// and the given exchange double.
pub fn manager_with(exchange: Arc<dyn TokenExchange>, cache_dir: &Path) -> CredentialManager {
    let settings = SettingsStore::open_in_memory().expect("in-memory settings store");
    manager_over(settings, exchange, cache_dir)
}

pub fn manager_over(
    settings: SettingsStore,
    exchange: Arc<dyn TokenExchange>,
    cache_dir: &Path,
) -> CredentialManager {
    CredentialManager::new(
        test_config(),
        CredentialStore::new(settings),
        SsoTokenCache::new(cache_dir),
        exchange,
    )
}

/// Writes one live SSO session record into `dir`.
pub fn write_live_sso_token(dir: &Path) {
    let record = serde_json::json!({
        "startUrl": "https://quill.awsapps.com/start",
        "accessToken": "cached-token",
        "expiresAt": (Utc::now() + Duration::hours(8)).to_rfc3339(),
        "region": "us-east-1",
    });
    std::fs::write(dir.join("0123abcd.json"), record.to_string()).expect("write sso cache entry");
}
