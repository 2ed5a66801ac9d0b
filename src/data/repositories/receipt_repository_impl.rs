use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::OnceCell;

use crate::{
    config::{CredentialReuse, VerifierConfig},
    data::{
        datasources::{
            google_play_developer_api_datasource::{
                ApiReply, GooglePlayDeveloperApiDatasource, GooglePlayDeveloperApiDatasourceImpl,
            },
            service_account_credentials::{
                decode_service_account_key, CredentialSource, ServiceAccountCredentials,
            },
        },
        models::google_play_developer_api::product_purchase_model as gp,
    },
    domain::{
        entities::{receipt_payload::ReceiptPayload, verification_result::VerificationResult},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::VerificationError,
    secrets::PlaySecretsConfig,
};

pub(crate) struct ReceiptRepositoryImpl<C: GooglePlayDeveloperApiDatasource> {
    google_play_developer_api_datasource: C,
    time_zone: FixedOffset,
}

#[async_trait]
impl<C: GooglePlayDeveloperApiDatasource> ReceiptRepository for ReceiptRepositoryImpl<C> {
    async fn verify_product_purchase(
        &self,
        receipt: &ReceiptPayload,
    ) -> Result<VerificationResult, VerificationError> {
        let reply = self
            .google_play_developer_api_datasource
            .get_product_purchase(
                &receipt.package_name,
                &receipt.product_id,
                &receipt.purchase_token,
            )
            .await?
            .ok_or_else(|| {
                VerificationError::Validation(format!(
                    "no purchase of '{}' found for package '{}'",
                    receipt.product_id, receipt.package_name
                ))
            })?;
        VerificationResult::from_google_product_purchase(reply, receipt, self.time_zone)
    }
}

impl<C: GooglePlayDeveloperApiDatasource> ReceiptRepositoryImpl<C> {
    pub(crate) fn from_datasource(datasource: C, time_zone: FixedOffset) -> Self {
        Self {
            google_play_developer_api_datasource: datasource,
            time_zone,
        }
    }
}

impl ReceiptRepositoryImpl<GooglePlayDeveloperApiDatasourceImpl> {
    pub(crate) async fn new(
        secrets: &PlaySecretsConfig,
        config: &VerifierConfig,
    ) -> Result<Self, VerificationError> {
        let key = decode_service_account_key(&secrets.service_account_key)?;
        let credentials = match config.credential_reuse {
            CredentialReuse::PerVerifier => CredentialSource::Shared(
                ServiceAccountCredentials::from_service_account_key(key).await?,
            ),
            CredentialReuse::PerVerification => CredentialSource::PerRequest(key),
        };
        Self::with_credential_source(credentials, config)
    }

    pub(crate) fn with_credentials(
        credentials: ServiceAccountCredentials,
        config: &VerifierConfig,
    ) -> Result<Self, VerificationError> {
        Self::with_credential_source(CredentialSource::Shared(credentials), config)
    }

    fn with_credential_source(
        credentials: CredentialSource,
        config: &VerifierConfig,
    ) -> Result<Self, VerificationError> {
        Ok(Self::from_datasource(
            GooglePlayDeveloperApiDatasourceImpl::new(
                &config.api_base_url,
                config.request_timeout,
                credentials,
            )?,
            config.time_zone,
        ))
    }
}

// Model -> entity mapping.
// ---------------------------

impl VerificationResult {
    fn from_google_product_purchase(
        reply: ApiReply<gp::ProductPurchaseModel>,
        receipt: &ReceiptPayload,
        time_zone: FixedOffset,
    ) -> Result<Self, VerificationError> {
        let ApiReply { model: m, raw } = reply;
        let purchase_time = DateTime::from_timestamp_millis(m.purchase_time_millis).ok_or_else(
            || {
                VerificationError::Validation(format!(
                    "purchaseTimeMillis {} is out of range",
                    m.purchase_time_millis
                ))
            },
        )?;
        Ok(Self {
            consumption_state: m.consumption_state as u8,
            purchase_state: m.purchase_state as u8,
            acknowledgement_state: m.acknowledgement_state as u8,
            developer_payload: m.developer_payload,
            kind: m.kind,
            order_id: m.order_id,
            purchase_time_millis: m.purchase_time_millis,
            purchase_type: m.purchase_type.map(|t| t as u8),
            quantity: m.quantity,
            refundable_quantity: m.refundable_quantity,
            region_code: m.region_code,
            obfuscated_external_account_id: m.obfuscated_external_account_id,
            obfuscated_external_profile_id: m.obfuscated_external_profile_id,
            bundle_id: receipt.package_name.clone(),
            product_id: receipt.product_id.clone(),
            original_response: raw,
            purchase_time,
            time_zone,
            purchase_date: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Offset, TimeZone, Utc};
    use serde_json::json;

    use crate::data::datasources::google_play_developer_api_datasource::mock::MockGooglePlayDeveloperApiDatasource;

    use super::*;

    fn purchase(purchase_state: u8, consumption_state: u8, order_id: &str) -> serde_json::Value {
        json!({
            "kind": "androidpublisher#productPurchase",
            "purchaseTimeMillis": "1700000000000",
            "purchaseState": purchase_state,
            "consumptionState": consumption_state,
            "developerPayload": "payload",
            "orderId": order_id,
            "acknowledgementState": 1,
            "regionCode": "NL"
        })
    }

    fn repository(
        datasource: MockGooglePlayDeveloperApiDatasource,
    ) -> ReceiptRepositoryImpl<MockGooglePlayDeveloperApiDatasource> {
        ReceiptRepositoryImpl::from_datasource(datasource, Utc.fix())
    }

    #[tokio::test]
    async fn test_purchased_and_consumed_predicates() {
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default()
                .with_purchase("token-1", purchase(0, 0, "GPA.1")),
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let result = repo.verify_product_purchase(&receipt).await.unwrap();
        assert!(result.is_purchased());
        assert!(result.is_consumed());
        assert!(result.is_acknowledged());
        assert!(!result.is_test_purchase());
        assert_eq!(result.order_id(), Some("GPA.1"));
        assert_eq!(result.developer_payload(), Some("payload"));
        assert_eq!(result.kind(), "androidpublisher#productPurchase");
        assert_eq!(result.quantity(), 1);
        assert_eq!(result.region_code(), Some("NL"));
    }

    #[tokio::test]
    async fn test_canceled_purchase_is_not_purchased() {
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default()
                .with_purchase("token-1", purchase(1, 1, "GPA.2")),
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let result = repo.verify_product_purchase(&receipt).await.unwrap();
        assert!(!result.is_purchased());
        assert!(!result.is_consumed());
        assert_eq!(result.purchase_state(), 1);
        assert_eq!(result.consumption_state(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_validation_error() {
        let repo = repository(MockGooglePlayDeveloperApiDatasource::default());
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "unknown-token");
        let result = repo.verify_product_purchase(&receipt).await;
        assert!(matches!(result, Err(VerificationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_echoes_request_identifiers() {
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default()
                .with_purchase("token-1", purchase(0, 1, "GPA.3")),
        );
        let receipt = ReceiptPayload::new("com.Some.Thing", "Coins_100 ", "token-1");
        let result = repo.verify_product_purchase(&receipt).await.unwrap();
        assert_eq!(result.bundle_id(), "com.Some.Thing");
        assert_eq!(result.product_id(), "Coins_100 ");
        assert_eq!(result.original_response()["orderId"], "GPA.3");
    }

    #[tokio::test]
    async fn test_out_of_range_purchase_time_is_validation_error() {
        let mut record = purchase(0, 0, "GPA.4");
        record["purchaseTimeMillis"] = json!(i64::MAX.to_string());
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default().with_purchase("token-1", record),
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let result = repo.verify_product_purchase(&receipt).await;
        assert!(matches!(result, Err(VerificationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_purchase_date_from_millis() {
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default()
                .with_purchase("token-1", purchase(0, 0, "GPA.5")),
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let result = repo.verify_product_purchase(&receipt).await.unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(result.purchase_time_millis(), 1_700_000_000_000);
        assert_eq!(result.purchase_date(), expected);
        assert_eq!(result.purchase_date(), result.purchase_date());
        assert_eq!(result.purchase_date().timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_purchase_date_keeps_millis_and_zone() {
        let mut record = purchase(0, 0, "GPA.6");
        record["purchaseTimeMillis"] = json!("1700000000250");
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let repo = ReceiptRepositoryImpl::from_datasource(
            MockGooglePlayDeveloperApiDatasource::default().with_purchase("token-1", record),
            tokyo,
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let date = repo
            .verify_product_purchase(&receipt)
            .await
            .unwrap()
            .purchase_date();
        assert_eq!(date.offset(), &tokyo);
        assert_eq!(date.timestamp_millis(), 1_700_000_000_250);
        assert_eq!(date.to_rfc3339(), "2023-11-15T07:13:20.250+09:00");
    }

    #[tokio::test]
    async fn test_test_purchase_flag() {
        let mut record = purchase(0, 0, "GPA.7");
        record["purchaseType"] = json!(0);
        record["quantity"] = json!(3);
        let repo = repository(
            MockGooglePlayDeveloperApiDatasource::default().with_purchase("token-1", record),
        );
        let receipt = ReceiptPayload::new("com.some.thing", "coins_100", "token-1");
        let result = repo.verify_product_purchase(&receipt).await.unwrap();
        assert!(result.is_test_purchase());
        assert_eq!(result.purchase_type(), Some(0));
        assert_eq!(result.quantity(), 3);
    }
}
