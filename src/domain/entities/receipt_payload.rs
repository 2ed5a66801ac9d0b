use serde::Deserialize;

use crate::{data::datasources::utils::decode_base64, errors::VerificationError};

/// Receipt as submitted by the app after a Google Play purchase: a base64
/// encoded JSON object naming the purchase to look up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    /// Package name of the app the product was sold in.
    pub package_name: String,
    /// The in-app product SKU.
    pub product_id: String,
    /// Token provided to the device when the product was purchased.
    pub purchase_token: String,
}

impl ReceiptPayload {
    pub fn new(
        package_name: impl Into<String>,
        product_id: impl Into<String>,
        purchase_token: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            product_id: product_id.into(),
            purchase_token: purchase_token.into(),
        }
    }

    /// Decodes a raw receipt (base64, then JSON). All three fields are
    /// required and must be non-empty; other keys are ignored.
    pub fn decode(raw_receipt: impl AsRef<[u8]>) -> Result<Self, VerificationError> {
        let json = decode_base64(raw_receipt.as_ref()).map_err(|e| {
            VerificationError::InvalidReceipt(format!("receipt is not valid base64: {e}"))
        })?;
        let payload: ReceiptPayload = serde_json::from_slice(&json).map_err(|e| {
            VerificationError::InvalidReceipt(format!("failed to parse receipt: {e}"))
        })?;
        for (field, value) in [
            ("packageName", &payload.package_name),
            ("productId", &payload.product_id),
            ("purchaseToken", &payload.purchase_token),
        ] {
            if value.trim().is_empty() {
                return Err(VerificationError::InvalidReceipt(format!(
                    "receipt field '{field}' is empty"
                )));
            }
        }
        Ok(payload)
    }
}
