pub(crate) const GOOGLE_PLAY_DEVELOPER_API_BASE_URL: &str = "https://androidpublisher.googleapis.com";

pub(crate) const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Environment variables.
pub(crate) const ENV_SERVICE_ACCOUNT_KEY: &str = "GOOGLE_PLAY_SERVICE_ACCOUNT_KEY";
pub(crate) const ENV_TIME_ZONE: &str = "PLAY_RECEIPT_TIME_ZONE";
pub(crate) const ENV_CREDENTIAL_REUSE: &str = "PLAY_RECEIPT_CREDENTIAL_REUSE";
pub(crate) const ENV_API_BASE_URL: &str = "PLAY_RECEIPT_API_BASE_URL";
pub(crate) const ENV_REQUEST_TIMEOUT_SECS: &str = "PLAY_RECEIPT_REQUEST_TIMEOUT_SECS";
