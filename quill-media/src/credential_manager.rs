//! Credential lifecycle: expiry checking, single-flight refresh, status.
//!
//! One instance is owned by the process bootstrap and shared (`Arc`) with
//! the admin handlers and the refresh scheduler. The in-flight flag is
//! process-local memory: a second refresh attempt while one is running is
//! rejected outright, and nothing coordinates refreshes across replicas.
//! A replicated deployment would need a lease around `refresh`.

use crate::config::MediaCloudConfig;
use crate::credential_store::CredentialStore;
use crate::error::{MediaError, MediaResult};
use crate::sso_cache::SsoTokenCache;
use crate::token_exchange::{SsoTokenExchange, TokenExchange};
use crate::types::{CredentialHealth, CredentialSet, CredentialStatus, RefreshOutcome};
use chrono::{DateTime, Utc};
use quill_settings::SettingsStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub struct CredentialManager {
    config: MediaCloudConfig,
    store: CredentialStore,
    sso_cache: SsoTokenCache,
    exchange: Arc<dyn TokenExchange>,
    refresh_in_flight: AtomicBool,
}

/// Releases the in-flight flag on every exit path, including panics.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CredentialManager {
    pub fn new(
        config: MediaCloudConfig,
        store: CredentialStore,
        sso_cache: SsoTokenCache,
        exchange: Arc<dyn TokenExchange>,
    ) -> Self {
        Self {
            config,
            store,
            sso_cache,
            exchange,
            refresh_in_flight: AtomicBool::new(false),
        }
    }

    /// Wires the production extractor from config: the SSO cache at the
    /// configured (or conventional) location and the real token exchange.
    pub fn from_config(config: MediaCloudConfig, settings: SettingsStore) -> MediaResult<Self> {
        let sso_cache = match &config.sso_cache_dir {
            Some(dir) => SsoTokenCache::new(dir),
            None => SsoTokenCache::from_home_dir()?,
        };
        let exchange = Arc::new(SsoTokenExchange::new(&config));
        Ok(Self::new(
            config,
            CredentialStore::new(settings),
            sso_cache,
            exchange,
        ))
    }

    /// Runs a full refresh cycle with mutual exclusion.
    ///
    /// A cycle already in flight is rejected immediately rather than queued;
    /// callers retry shortly or rely on the next scheduled check. Failures
    /// at any step come back as a structured outcome, never an `Err`.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("credential refresh rejected: already in progress");
            return RefreshOutcome {
                success: false,
                message: "Refresh already in progress".to_string(),
                expires_at: None,
            };
        }
        let _guard = InFlightGuard(&self.refresh_in_flight);

        match self.run_refresh().await {
            Ok(saved) => {
                info!("media credentials refreshed, expire at {:?}", saved.expires_at);
                RefreshOutcome {
                    success: true,
                    message: "Credentials refreshed".to_string(),
                    expires_at: saved.expires_at,
                }
            }
            Err(err) => {
                warn!("media credential refresh failed: {err}");
                RefreshOutcome {
                    success: false,
                    message: err.to_string(),
                    expires_at: None,
                }
            }
        }
    }

    /// Extract then persist: scan the local SSO cache for a live token,
    /// exchange it for role credentials, save the result whole.
    async fn run_refresh(&self) -> MediaResult<CredentialSet> {
        let token = self.sso_cache.find_valid_token(Utc::now())?;
        let fresh = self.exchange.exchange(&token).await?;
        self.store.save(&fresh)
    }

    /// Decides whether a refresh is due at `now`. Missing, expiry-less, or
    /// unreadable state counts as due: an extra refresh beats running on
    /// expired credentials.
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.store.load() {
            Ok(Some(creds)) => creds.expires_within_at(now, self.config.refresh_lead()),
            Ok(None) => true,
            Err(err) => {
                warn!("credential state unreadable, forcing refresh: {err}");
                true
            }
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    /// Point-in-time health snapshot for the admin dashboard. Never fails;
    /// internal errors surface as the `error` health.
    pub fn status(&self) -> CredentialStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> CredentialStatus {
        let base = |health, message: Option<String>| CredentialStatus {
            health,
            message,
            minutes_until_expiry: None,
            expires_at: None,
            last_refresh: None,
            region: self.config.region.clone(),
            bucket: self.config.bucket.clone(),
            account_id: self.config.account_id.clone(),
            role_name: self.config.role_name.clone(),
        };

        let creds = match self.store.load() {
            Ok(Some(creds)) => creds,
            Ok(None) => return base(CredentialHealth::Missing, None),
            Err(err) => return base(CredentialHealth::Error, Some(err.to_string())),
        };

        let Some(expires_at) = creds.expires_at else {
            return CredentialStatus {
                last_refresh: creds.last_refresh,
                ..base(
                    CredentialHealth::Invalid,
                    Some("stored credentials have no expiry".to_string()),
                )
            };
        };

        let health = if now >= expires_at {
            CredentialHealth::Expired
        } else if creds.expires_within_at(now, self.config.refresh_lead()) {
            CredentialHealth::ExpiringSoon
        } else {
            CredentialHealth::Valid
        };

        CredentialStatus {
            minutes_until_expiry: creds.minutes_until_expiry_at(now),
            expires_at: Some(expires_at),
            last_refresh: creds.last_refresh,
            ..base(health, None)
        }
    }

    /// Current usable credentials for the transport path.
    pub fn current_credentials(&self) -> MediaResult<CredentialSet> {
        let creds = self.store.load()?.ok_or(MediaError::CredentialsMissing)?;
        if creds.is_expired() {
            return Err(MediaError::CredentialExpired);
        }
        Ok(creds)
    }

    pub fn config(&self) -> &MediaCloudConfig {
        &self.config
    }
}
