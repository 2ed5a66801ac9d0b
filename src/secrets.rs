use std::fmt;

use crate::{constants::ENV_SERVICE_ACCOUNT_KEY, errors::VerificationError};

/// Secret material needed to talk to the Google Play Developer API.
#[derive(Clone)]
pub struct PlaySecretsConfig {
    /// Base64-encoded service account JSON key, with access to the
    /// androidpublisher API for the apps being verified.
    pub service_account_key: String,
}

impl PlaySecretsConfig {
    pub fn new(service_account_key: impl Into<String>) -> Self {
        Self {
            service_account_key: service_account_key.into(),
        }
    }

    /// Load secrets from the environment (env: GOOGLE_PLAY_SERVICE_ACCOUNT_KEY).
    pub fn from_env() -> Result<Self, VerificationError> {
        let service_account_key = std::env::var(ENV_SERVICE_ACCOUNT_KEY)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                VerificationError::Config(format!("{ENV_SERVICE_ACCOUNT_KEY} is not set"))
            })?;
        Ok(Self::new(service_account_key))
    }
}

impl fmt::Debug for PlaySecretsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaySecretsConfig")
            .field("service_account_key", &"<redacted>")
            .finish()
    }
}
