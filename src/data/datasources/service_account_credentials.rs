use std::fmt;

use yup_oauth2::{
    authenticator::DefaultAuthenticator, parse_service_account_key, ServiceAccountAuthenticator,
    ServiceAccountKey,
};

use crate::{constants::ANDROID_PUBLISHER_SCOPE, errors::VerificationError};

use super::utils::decode_base64;

/// Signed service account credentials for the androidpublisher scope.
///
/// Holds the authenticator rather than a bare token: every callout asks it
/// for the current token, which is cached until shortly before it expires
/// and then refreshed. Cloning shares the same token cache.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    client_email: String,
    tokens: TokenProvider,
}

#[derive(Clone)]
enum TokenProvider {
    Authenticator(DefaultAuthenticator),
    #[cfg(test)]
    Static(String),
}

impl ServiceAccountCredentials {
    /// Builds credentials from a base64-encoded service account JSON key, as
    /// downloaded from the Google Cloud console and stored in app secrets.
    ///
    /// The key is parsed in memory; nothing is written to disk. A first
    /// token is requested right away, so a key Google rejects fails here.
    pub async fn from_base64_key(encoded_key: &str) -> Result<Self, VerificationError> {
        Self::from_service_account_key(decode_service_account_key(encoded_key)?).await
    }

    pub(crate) async fn from_service_account_key(
        key: ServiceAccountKey,
    ) -> Result<Self, VerificationError> {
        let client_email = key.client_email.clone();
        let authenticator = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                VerificationError::Credential(format!(
                    "service account authenticator could not be built: {e}"
                ))
            })?;
        let credentials = Self {
            client_email,
            tokens: TokenProvider::Authenticator(authenticator),
        };
        credentials.access_token().await?;
        tracing::debug!(client_email = %credentials.client_email, "built Google Play service account credentials");
        Ok(credentials)
    }

    /// Service account the access token was issued to.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Current access token, refreshed if the cached one has expired.
    pub(crate) async fn access_token(&self) -> Result<String, VerificationError> {
        match &self.tokens {
            TokenProvider::Authenticator(authenticator) => Ok(authenticator
                .token(&[ANDROID_PUBLISHER_SCOPE])
                .await
                .map_err(|e| {
                    VerificationError::Credential(format!(
                        "service account token could not be built: {e}"
                    ))
                })?
                .token()
                .ok_or_else(|| {
                    VerificationError::Credential("service account token is empty".to_string())
                })?
                .to_string()),
            #[cfg(test)]
            TokenProvider::Static(token) => Ok(token.clone()),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_access_token(client_email: &str, access_token: &str) -> Self {
        Self {
            client_email: client_email.to_string(),
            tokens: TokenProvider::Static(access_token.to_string()),
        }
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Decodes and parses the base64-encoded service account key, without
/// contacting Google.
pub(crate) fn decode_service_account_key(
    encoded_key: &str,
) -> Result<ServiceAccountKey, VerificationError> {
    let json = decode_base64(encoded_key.as_bytes()).map_err(|e| {
        VerificationError::Credential(format!("service account key is not valid base64: {e}"))
    })?;
    parse_service_account_key(json).map_err(|e| {
        VerificationError::Credential(format!("service account key could not be parsed: {e}"))
    })
}

/// Where a datasource gets its access token from on each callout.
pub(crate) enum CredentialSource {
    /// One set of credentials shared by every callout; its token is
    /// refreshed when it expires.
    Shared(ServiceAccountCredentials),
    /// Fresh credentials, and so a fresh token, for every callout.
    PerRequest(ServiceAccountKey),
}

impl CredentialSource {
    pub(crate) async fn access_token(&self) -> Result<String, VerificationError> {
        match self {
            CredentialSource::Shared(credentials) => credentials.access_token().await,
            CredentialSource::PerRequest(key) => {
                ServiceAccountCredentials::from_service_account_key(key.clone())
                    .await?
                    .access_token()
                    .await
            }
        }
    }
}
