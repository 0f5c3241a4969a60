//! Role-credential exchange against the identity provider.
//!
//! Kept behind a trait so the refresh path can be exercised in tests without
//! real AWS calls.

use crate::config::MediaCloudConfig;
use crate::error::{MediaError, MediaResult};
use crate::types::CredentialSet;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

/// Exchange of a cached SSO access token for temporary role credentials.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, access_token: &str) -> MediaResult<CredentialSet>;
}

/// Production exchange via the AWS SSO `GetRoleCredentials` operation.
pub struct SsoTokenExchange {
    account_id: String,
    role_name: String,
    region: String,
    bucket: String,
}

impl SsoTokenExchange {
    pub fn new(config: &MediaCloudConfig) -> Self {
        Self {
            account_id: config.account_id.clone(),
            role_name: config.role_name.clone(),
            region: config.region.clone(),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl TokenExchange for SsoTokenExchange {
    async fn exchange(&self, access_token: &str) -> MediaResult<CredentialSet> {
        let conf = aws_sdk_sso::Config::builder()
            .region(aws_types::region::Region::new(self.region.clone()))
            .behavior_version_latest()
            .build();
        let client = aws_sdk_sso::Client::from_conf(conf);

        let resp = client
            .get_role_credentials()
            .account_id(&self.account_id)
            .role_name(&self.role_name)
            .access_token(access_token)
            .send()
            .await
            .map_err(|e| MediaError::TokenExchange(e.to_string()))?;

        let missing = || MediaError::NoRoleCredentials {
            account: self.account_id.clone(),
            role: self.role_name.clone(),
        };

        let creds = resp.role_credentials.ok_or_else(missing)?;
        let access_key_id = creds.access_key_id.ok_or_else(missing)?;
        let secret_access_key = creds.secret_access_key.ok_or_else(missing)?;
        let session_token = creds.session_token.ok_or_else(missing)?;

        // The provider reports expiration as epoch milliseconds.
        let expires_at = Utc.timestamp_millis_opt(creds.expiration).single();

        Ok(CredentialSet {
            access_key_id,
            secret_access_key,
            session_token,
            expires_at,
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            last_refresh: None,
        })
    }
}
