use async_trait::async_trait;

use crate::{
    domain::entities::{receipt_payload::ReceiptPayload, verification_result::VerificationResult},
    errors::VerificationError,
};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Looks up the one-time product purchase named by the receipt and
    /// returns its verified details. Fails with `VerificationError::Validation`
    /// if Google has no such purchase.
    async fn verify_product_purchase(
        &self,
        receipt: &ReceiptPayload,
    ) -> Result<VerificationResult, VerificationError>;
}
