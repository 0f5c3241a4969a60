//! Durable storage for the one current credential set.

use crate::error::MediaResult;
use crate::types::CredentialSet;
use chrono::Utc;
use quill_settings::SettingsStore;
use tracing::debug;

/// Settings key the serialized credential set lives under.
pub const AWS_CONFIG_KEY: &str = "aws_config";

/// Persists exactly one current [`CredentialSet`] in the settings table.
///
/// `save` replaces the whole value (last-writer-wins upsert, no
/// optimistic-concurrency check); `load` treats an absent row as the valid
/// "never configured" state. Store failures propagate: masking them would
/// let a refresh "succeed" without durably saving anything.
#[derive(Clone)]
pub struct CredentialStore {
    settings: SettingsStore,
}

impl CredentialStore {
    pub fn new(settings: SettingsStore) -> Self {
        Self { settings }
    }

    /// Stamps `last_refresh` and upserts the set under [`AWS_CONFIG_KEY`].
    pub fn save(&self, creds: &CredentialSet) -> MediaResult<CredentialSet> {
        let mut stamped = creds.clone();
        stamped.last_refresh = Some(Utc::now());
        self.settings
            .set(AWS_CONFIG_KEY, &serde_json::to_value(&stamped)?)?;
        debug!("saved media credentials, expire at {:?}", stamped.expires_at);
        Ok(stamped)
    }

    /// Returns the current set, or `None` when never configured.
    pub fn load(&self) -> MediaResult<Option<CredentialSet>> {
        match self.settings.get(AWS_CONFIG_KEY)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
