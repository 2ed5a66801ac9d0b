#![allow(dead_code)]

use serde::Deserialize;
use serde_repr::Deserialize_repr;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Data structure returned by the Google Play Developer API when querying for a
/// product purchase.
///
/// https://developers.google.com/android-publisher/api-ref/rest/v3/purchases.products#ProductPurchase
///
/// Whether fields are nullable is not documented explicitly in the API
/// reference, so reasonable assumptions are made. Unknown keys are ignored,
/// unknown enum values are not.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPurchaseModel {
    /// This kind represents an inappPurchase object in the androidpublisher
    /// service.
    pub(crate) kind: String,
    /// The time the product was purchased, in milliseconds since the epoch (Jan
    /// 1, 1970). Sent as a string (int64 JSON encoding).
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub(crate) purchase_time_millis: i64,
    /// The purchase state of the order.
    pub(crate) purchase_state: PurchaseState,
    /// The consumption state of the inapp product.
    pub(crate) consumption_state: ConsumptionState,
    /// A developer-specified string that contains supplemental information
    /// about an order.
    pub(crate) developer_payload: Option<String>,
    /// The order id associated with the purchase of the inapp product. Not set
    /// for promo code redemptions.
    pub(crate) order_id: Option<String>,
    /// The type of purchase of the inapp product. This field is only set if
    /// this purchase was not made using the standard in-app billing flow.
    pub(crate) purchase_type: Option<PurchaseType>,
    /// The acknowledgement state of the inapp product.
    #[serde(default)]
    pub(crate) acknowledgement_state: AcknowledgementState,
    /// The purchase token generated to identify this purchase. May not be
    /// present.
    pub(crate) purchase_token: Option<String>,
    /// The inapp product SKU. May not be present.
    pub(crate) product_id: Option<String>,
    /// The quantity associated with the purchase of the inapp product. If not
    /// present, the quantity is 1.
    pub(crate) quantity: Option<i32>,
    /// An obfuscated version of the id that is uniquely associated with the
    /// user's account in your app.
    pub(crate) obfuscated_external_account_id: Option<String>,
    /// An obfuscated version of the id that is uniquely associated with the
    /// user's profile in your app.
    pub(crate) obfuscated_external_profile_id: Option<String>,
    /// ISO 3166-1 alpha-2 billing region code of the user at the time the
    /// product was granted.
    pub(crate) region_code: Option<String>,
    /// The quantity eligible for refund, i.e. quantity that hasn't been
    /// refunded.
    pub(crate) refundable_quantity: Option<i32>,
}

#[derive(Debug, Clone, Copy, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum PurchaseState {
    Purchased = 0,
    Canceled = 1,
    Pending = 2,
}

#[derive(Debug, Clone, Copy, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum ConsumptionState {
    YetToBeConsumed = 0,
    Consumed = 1,
}

#[derive(Debug, Clone, Copy, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum PurchaseType {
    Test = 0,
    Promo = 1,
    Rewarded = 2,
}

#[derive(Debug, Clone, Copy, Default, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum AcknowledgementState {
    #[default]
    YetToBeAcknowledged = 0,
    Acknowledged = 1,
}
