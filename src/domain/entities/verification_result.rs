use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::OnceCell;

/// Outcome of a successful receipt verification: a snapshot of the purchase
/// record Google returned, plus the identifiers the lookup was made with.
///
/// Only exists if the lookup succeeded; never mutated after construction.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// 0 = yet to be consumed, 1 = consumed.
    pub(crate) consumption_state: u8,
    /// 0 = purchased, 1 = canceled, 2 = pending.
    pub(crate) purchase_state: u8,
    /// 0 = yet to be acknowledged, 1 = acknowledged.
    pub(crate) acknowledgement_state: u8,
    pub(crate) developer_payload: Option<String>,
    pub(crate) kind: String,
    pub(crate) order_id: Option<String>,
    pub(crate) purchase_time_millis: i64,
    /// 0 = test, 1 = promo, 2 = rewarded. Absent for regular purchases.
    pub(crate) purchase_type: Option<u8>,
    pub(crate) quantity: Option<i32>,
    pub(crate) refundable_quantity: Option<i32>,
    pub(crate) region_code: Option<String>,
    pub(crate) obfuscated_external_account_id: Option<String>,
    pub(crate) obfuscated_external_profile_id: Option<String>,
    pub(crate) bundle_id: String,
    pub(crate) product_id: String,
    pub(crate) original_response: serde_json::Value,

    /// `purchase_time_millis` as an instant; range-checked on construction.
    pub(crate) purchase_time: DateTime<Utc>,
    pub(crate) time_zone: FixedOffset,
    pub(crate) purchase_date: OnceCell<DateTime<FixedOffset>>,
}

impl VerificationResult {
    /// True iff the purchase state is 0 (purchased).
    pub fn is_purchased(&self) -> bool {
        self.purchase_state == 0
    }

    /// True iff the consumption state is 0.
    pub fn is_consumed(&self) -> bool {
        self.consumption_state == 0
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledgement_state == 1
    }

    /// Purchased by a license tester.
    pub fn is_test_purchase(&self) -> bool {
        self.purchase_type == Some(0)
    }

    /// Time of purchase in the configured time zone. Computed on first read.
    pub fn purchase_date(&self) -> DateTime<FixedOffset> {
        *self
            .purchase_date
            .get_or_init(|| self.purchase_time.with_timezone(&self.time_zone))
    }

    pub fn consumption_state(&self) -> u8 {
        self.consumption_state
    }

    pub fn purchase_state(&self) -> u8 {
        self.purchase_state
    }

    pub fn acknowledgement_state(&self) -> u8 {
        self.acknowledgement_state
    }

    pub fn developer_payload(&self) -> Option<&str> {
        self.developer_payload.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn purchase_time_millis(&self) -> i64 {
        self.purchase_time_millis
    }

    pub fn purchase_type(&self) -> Option<u8> {
        self.purchase_type
    }

    /// Defaults to 1 when Google leaves it out.
    pub fn quantity(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }

    pub fn refundable_quantity(&self) -> Option<i32> {
        self.refundable_quantity
    }

    pub fn region_code(&self) -> Option<&str> {
        self.region_code.as_deref()
    }

    pub fn obfuscated_external_account_id(&self) -> Option<&str> {
        self.obfuscated_external_account_id.as_deref()
    }

    pub fn obfuscated_external_profile_id(&self) -> Option<&str> {
        self.obfuscated_external_profile_id.as_deref()
    }

    /// Package name the receipt was verified for.
    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// The purchase record exactly as Google returned it.
    pub fn original_response(&self) -> &serde_json::Value {
        &self.original_response
    }
}
