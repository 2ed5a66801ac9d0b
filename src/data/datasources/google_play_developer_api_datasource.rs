use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    data::models::google_play_developer_api::product_purchase_model::ProductPurchaseModel,
    errors::VerificationError,
};

use super::service_account_credentials::CredentialSource;

/// A parsed API reply, together with the raw JSON it was parsed from.
#[derive(Debug)]
pub(crate) struct ApiReply<T> {
    pub(crate) model: T,
    pub(crate) raw: serde_json::Value,
}

#[async_trait]
pub(crate) trait GooglePlayDeveloperApiDatasource: Send + Sync {
    /// purchases.products.get:
    /// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.products/get
    ///
    /// packageName:
    ///   The package name of the application the inapp product was sold in (for
    ///   example, 'com.some.thing').
    /// productId:
    ///   The inapp product SKU (for example, 'com.some.thing.inapp1').
    /// token:
    ///   The token provided to the user's device when the inapp product was
    ///   purchased.
    ///
    /// Returns `None` if Google has no purchase for this token.
    async fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<Option<ApiReply<ProductPurchaseModel>>, VerificationError>;
}

pub(crate) struct GooglePlayDeveloperApiDatasourceImpl {
    client: reqwest::Client,
    base_url: Url,
    credentials: CredentialSource,
}

#[async_trait]
impl GooglePlayDeveloperApiDatasource for GooglePlayDeveloperApiDatasourceImpl {
    async fn get_product_purchase(
        &self,
        package_name: &str,
        product_id: &str,
        token: &str,
    ) -> Result<Option<ApiReply<ProductPurchaseModel>>, VerificationError> {
        let url = product_purchase_url(&self.base_url, package_name, product_id, token)?;
        tracing::debug!(package_name, product_id, "looking up Google Play product purchase");
        self.callout(url, "purchases.products.get").await
    }
}

impl GooglePlayDeveloperApiDatasourceImpl {
    pub(crate) fn new(
        base_url: &str,
        request_timeout: Duration,
        credentials: CredentialSource,
    ) -> Result<Self, VerificationError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            VerificationError::Config(format!("invalid API base URL '{base_url}': {e}"))
        })?;
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    async fn callout<T: DeserializeOwned>(
        &self,
        url: Url,
        function_name: &'static str,
    ) -> Result<Option<ApiReply<T>>, VerificationError> {
        let access_token = self.credentials.access_token().await?;
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_reply(function_name, status, &body)
    }
}

fn product_purchase_url(
    base_url: &Url,
    package_name: &str,
    product_id: &str,
    token: &str,
) -> Result<Url, VerificationError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| {
            VerificationError::Config(format!("API base URL '{base_url}' cannot be a base"))
        })?
        .pop_if_empty()
        .extend([
            "androidpublisher",
            "v3",
            "applications",
            package_name,
            "purchases",
            "products",
            product_id,
            "tokens",
            token,
        ]);
    Ok(url)
}

/// Turns a raw HTTP reply into a parsed model. "Not found" replies, and
/// successful replies without a body, yield `None`.
fn interpret_reply<T: DeserializeOwned>(
    function_name: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<Option<ApiReply<T>>, VerificationError> {
    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        tracing::debug!(function_name, %status, "no matching purchase");
        return Ok(None);
    }
    if !status.is_success() {
        tracing::warn!(function_name, %status, "Google Play Developer API callout failed");
        return Err(VerificationError::GooglePlayDeveloperApi {
            function: function_name,
            status,
            body: body.to_string(),
        });
    }
    if body.trim().is_empty() {
        return Ok(None);
    }
    let raw: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        VerificationError::Validation(format!("{function_name}: response is not JSON: {e}"))
    })?;
    if raw.is_null() || raw.as_object().is_some_and(|o| o.is_empty()) {
        return Ok(None);
    }
    let model = serde_json::from_value(raw.clone()).map_err(|e| {
        VerificationError::Validation(format!("{function_name}: failed to parse response: {e}"))
    })?;
    Ok(Some(ApiReply { model, raw }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURCHASE: &str = r#"{
        "kind": "androidpublisher#productPurchase",
        "purchaseTimeMillis": "1700000000000",
        "purchaseState": 0,
        "consumptionState": 0,
        "orderId": "GPA.1111-2222-3333-44444"
    }"#;

    #[test]
    fn test_url_layout() {
        let base = Url::parse("https://androidpublisher.googleapis.com").unwrap();
        let url = product_purchase_url(&base, "com.some.thing", "com.some.thing.inapp1", "tok.en-1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://androidpublisher.googleapis.com/androidpublisher/v3/applications/com.some.thing/purchases/products/com.some.thing.inapp1/tokens/tok.en-1"
        );
    }

    #[test]
    fn test_url_escapes_segments() {
        let base = Url::parse("http://localhost:8080/").unwrap();
        let url = product_purchase_url(&base, "com.app", "sku", "a/b?c").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/androidpublisher/v3/applications/com.app/purchases/products/sku/tokens/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_success_is_parsed() {
        let reply: ApiReply<ProductPurchaseModel> =
            interpret_reply("purchases.products.get", StatusCode::OK, PURCHASE)
                .unwrap()
                .unwrap();
        assert_eq!(reply.model.purchase_time_millis, 1_700_000_000_000);
        assert_eq!(reply.raw["orderId"], "GPA.1111-2222-3333-44444");
    }

    #[test]
    fn test_not_found_is_none() {
        for status in [StatusCode::NOT_FOUND, StatusCode::GONE] {
            let reply = interpret_reply::<ProductPurchaseModel>(
                "purchases.products.get",
                status,
                r#"{"error": {"code": 404}}"#,
            )
            .unwrap();
            assert!(reply.is_none());
        }
    }

    #[test]
    fn test_empty_success_is_none() {
        for body in ["", "  ", "null", "{}"] {
            let reply =
                interpret_reply::<ProductPurchaseModel>("purchases.products.get", StatusCode::OK, body)
                    .unwrap();
            assert!(reply.is_none(), "body {body:?} should mean no purchase");
        }
    }

    #[test]
    fn test_error_status_propagates() {
        let result = interpret_reply::<ProductPurchaseModel>(
            "purchases.products.get",
            StatusCode::UNAUTHORIZED,
            "bad token",
        );
        match result {
            Err(VerificationError::GooglePlayDeveloperApi {
                function,
                status,
                body,
            }) => {
                assert_eq!(function, "purchases.products.get");
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "bad token");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_schema_mismatch_is_validation_error() {
        let result = interpret_reply::<ProductPurchaseModel>(
            "purchases.products.get",
            StatusCode::OK,
            r#"{"kind": "androidpublisher#productPurchase", "purchaseState": 0}"#,
        );
        assert!(matches!(result, Err(VerificationError::Validation(_))));

        let result = interpret_reply::<ProductPurchaseModel>(
            "purchases.products.get",
            StatusCode::OK,
            "<html>",
        );
        assert!(matches!(result, Err(VerificationError::Validation(_))));
    }
}
