//! Local SSO token cache.
//!
//! `aws sso login` drops JSON session records under `~/.aws/sso/cache`; each
//! record belonging to a sign-on session carries `startUrl`, `accessToken`
//! and an `expiresAt` timestamp. The scan takes the first record with an
//! unexpired token. Iteration order is whatever the filesystem yields, so
//! with several live sessions the choice is unspecified.

use crate::error::{MediaError, MediaResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One cached SSO session record, as written by the AWS CLI.
///
/// Client-registration records share the directory but lack `startUrl`;
/// they are skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedSsoSession {
    #[serde(default)]
    start_url: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Reader over the local SSO token cache directory.
#[derive(Clone, Debug)]
pub struct SsoTokenCache {
    dir: PathBuf,
}

impl SsoTokenCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache at the AWS CLI's conventional location under the home directory.
    pub fn from_home_dir() -> MediaResult<Self> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or_else(|| {
                MediaError::Config("cannot locate home directory for SSO cache".to_string())
            })?;
        Ok(Self::new(
            Path::new(&home).join(".aws").join("sso").join("cache"),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scans the cache for the first session record with an unexpired access
    /// token. Unreadable or malformed records are skipped.
    pub fn find_valid_token(&self, now: DateTime<Utc>) -> MediaResult<String> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|_| MediaError::SsoCacheMissing(self.dir.clone()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let raw = match std::fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    debug!("skipping unreadable SSO cache entry {}: {err}", path.display());
                    continue;
                }
            };
            let session: CachedSsoSession = match serde_json::from_str(&raw) {
                Ok(session) => session,
                Err(err) => {
                    debug!("skipping malformed SSO cache entry {}: {err}", path.display());
                    continue;
                }
            };
            let (Some(start_url), Some(token), Some(expires_at)) =
                (session.start_url, session.access_token, session.expires_at)
            else {
                continue;
            };
            if expires_at <= now {
                debug!("SSO session for {start_url} expired at {expires_at}");
                continue;
            }
            debug!("using SSO session for {start_url}, token valid until {expires_at}");
            return Ok(token);
        }

        Err(MediaError::NoValidSsoToken)
    }
}
