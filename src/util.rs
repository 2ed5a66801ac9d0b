use crate::{
    config::VerifierConfig,
    data::{
        datasources::{
            google_play_developer_api_datasource::GooglePlayDeveloperApiDatasourceImpl,
            service_account_credentials::ServiceAccountCredentials,
        },
        repositories::receipt_repository_impl::ReceiptRepositoryImpl,
    },
    domain::{
        entities::{receipt_payload::ReceiptPayload, verification_result::VerificationResult},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::VerificationError,
    secrets::PlaySecretsConfig,
};

/// Verifies Google Play in-app product receipts.
///
/// Holds only immutable state, so one verifier can serve concurrent
/// verifications.
pub struct ReceiptVerifier<R: ReceiptRepository> {
    receipt_repository: R,
}

impl<R: ReceiptRepository> ReceiptVerifier<R> {
    /// Decodes a raw receipt (base64-encoded JSON with `packageName`,
    /// `productId` and `purchaseToken`) and looks the purchase up with Google.
    ///
    /// Makes one outbound call to the Google Play Developer API (plus a token
    /// request when credentials are built per verification). Nothing is
    /// retried.
    pub async fn verify(
        &self,
        raw_receipt: impl AsRef<[u8]>,
    ) -> Result<VerificationResult, VerificationError> {
        let receipt = ReceiptPayload::decode(raw_receipt)?;
        self.verify_payload(&receipt).await
    }

    /// Same as `verify`, for a receipt that has already been decoded.
    pub async fn verify_payload(
        &self,
        receipt: &ReceiptPayload,
    ) -> Result<VerificationResult, VerificationError> {
        let result = self
            .receipt_repository
            .verify_product_purchase(receipt)
            .await?;
        tracing::info!(
            package_name = %receipt.package_name,
            product_id = %receipt.product_id,
            purchased = result.is_purchased(),
            "verified Google Play receipt"
        );
        Ok(result)
    }
}

/// The verifier wired to the live Google Play Developer API.
pub type GooglePlayReceiptVerifier =
    ReceiptVerifier<ReceiptRepositoryImpl<GooglePlayDeveloperApiDatasourceImpl>>;

impl GooglePlayReceiptVerifier {
    /// Builds a verifier from app secrets. With
    /// `CredentialReuse::PerVerifier` (the default) this requests an access
    /// token up front.
    pub async fn new(
        secrets: &PlaySecretsConfig,
        config: VerifierConfig,
    ) -> Result<Self, VerificationError> {
        Ok(Self {
            receipt_repository: ReceiptRepositoryImpl::new(secrets, &config).await?,
        })
    }

    /// Builds a verifier around credentials the caller already holds.
    pub fn with_credentials(
        credentials: ServiceAccountCredentials,
        config: VerifierConfig,
    ) -> Result<Self, VerificationError> {
        Ok(Self {
            receipt_repository: ReceiptRepositoryImpl::with_credentials(credentials, &config)?,
        })
    }

    /// One-shot verification: decodes the receipt, then builds a fresh
    /// verifier (and fresh credentials) for this single call. Prefer a
    /// long-lived verifier when verifying more than occasionally.
    pub async fn verify_once(
        secrets: &PlaySecretsConfig,
        raw_receipt: impl AsRef<[u8]>,
    ) -> Result<VerificationResult, VerificationError> {
        let receipt = ReceiptPayload::decode(raw_receipt)?;
        Self::new(secrets, VerifierConfig::default())
            .await?
            .verify_payload(&receipt)
            .await
    }
}

#[cfg(test)]
impl<R: ReceiptRepository> ReceiptVerifier<R> {
    pub(crate) fn from_repository(receipt_repository: R) -> Self {
        Self { receipt_repository }
    }
}
