use reqwest::StatusCode;

/// Errors surfaced by receipt verification.
///
/// Callers either get a complete `VerificationResult` or one of these; there
/// is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The client-submitted receipt is not base64-encoded JSON, or lacks one
    /// of the required fields.
    #[error("invalid receipt: {0}")]
    InvalidReceipt(String),

    /// The lookup completed but no usable purchase record came back.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The service account key is malformed, or no access token could be
    /// obtained with it.
    #[error("invalid service account credentials: {0}")]
    Credential(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("Google Play Developer API error ({function}): returned with {status} status code: {body}")]
    GooglePlayDeveloperApi {
        function: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
