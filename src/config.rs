//! Verifier configuration from environment variables.

use std::{str::FromStr, time::Duration};

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{
    constants::{
        DEFAULT_REQUEST_TIMEOUT_SECS, ENV_API_BASE_URL, ENV_CREDENTIAL_REUSE,
        ENV_REQUEST_TIMEOUT_SECS, ENV_TIME_ZONE, GOOGLE_PLAY_DEVELOPER_API_BASE_URL,
    },
    errors::VerificationError,
};

/// How service account credentials are shared between verifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialReuse {
    /// Credentials are built once when the verifier is constructed and used
    /// for every verification it performs.
    #[default]
    PerVerifier,
    /// A fresh access token is requested for every verification.
    PerVerification,
}

impl FromStr for CredentialReuse {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-verifier" => Ok(Self::PerVerifier),
            "per-verification" => Ok(Self::PerVerification),
            other => Err(VerificationError::Config(format!(
                "unknown credential reuse mode '{other}' (expected 'per-verifier' or 'per-verification')"
            ))),
        }
    }
}

/// Configuration for a `ReceiptVerifier`.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Zone purchase dates are expressed in (env: PLAY_RECEIPT_TIME_ZONE,
    /// e.g. "+09:00", default: UTC).
    pub time_zone: FixedOffset,
    /// Env: PLAY_RECEIPT_CREDENTIAL_REUSE, default: per-verifier.
    pub credential_reuse: CredentialReuse,
    /// Root of the Developer API (env: PLAY_RECEIPT_API_BASE_URL).
    pub api_base_url: String,
    /// Per-request timeout (env: PLAY_RECEIPT_REQUEST_TIMEOUT_SECS, default: 30).
    pub request_timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            time_zone: Utc.fix(),
            credential_reuse: CredentialReuse::default(),
            api_base_url: GOOGLE_PLAY_DEVELOPER_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl VerifierConfig {
    /// Load configuration from environment variables. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, VerificationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VerificationError> {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let mut config = Self::default();
        if let Some(tz) = get(ENV_TIME_ZONE) {
            config.time_zone = parse_utc_offset(&tz)?;
        }
        if let Some(mode) = get(ENV_CREDENTIAL_REUSE) {
            config.credential_reuse = mode.parse()?;
        }
        if let Some(url) = get(ENV_API_BASE_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                VerificationError::Config(format!("{ENV_REQUEST_TIMEOUT_SECS}: {e}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn with_credential_reuse(mut self, credential_reuse: CredentialReuse) -> Self {
        self.credential_reuse = credential_reuse;
        self
    }

    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Accepts "Z", "UTC" or an RFC 3339 offset such as "+09:00".
fn parse_utc_offset(s: &str) -> Result<FixedOffset, VerificationError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }
    DateTime::parse_from_rfc3339(&format!("1970-01-01T00:00:00{s}"))
        .map(|dt| *dt.offset())
        .map_err(|e| VerificationError::Config(format!("{ENV_TIME_ZONE} '{s}': {e}")))
}
