//! Wire format of the provider's send endpoint.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::domain::{ApiKey, ApiSecret, CallbackUrl, EncodingMode, TelAddress};

/// Provider send endpoint.
pub const SEND_URL: &str = "https://rest.nexmo.com/sms/json";

/// The provider's per-message success code, a literal string.
pub const STATUS_SUCCESS: &str = "0";

/// Rate-limit responses carry the mandated wait in milliseconds.
static THROTTLED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Throughput Rate Exceeded - please wait \[ (\d+) \] and retry")
        .expect("throttle pattern")
});

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no messages element")]
    NoMessages,
}

#[derive(Debug, Clone, Copy)]
/// Everything that goes into one part's form-encoded send request.
pub struct SendForm<'a> {
    pub api_key: &'a ApiKey,
    pub api_secret: &'a ApiSecret,
    pub from: &'a TelAddress,
    pub to: &'a TelAddress,
    pub text: &'a str,
    pub callback: &'a CallbackUrl,
    pub mode: EncodingMode,
}

/// Encode one part as the send endpoint's form body.
///
/// Addresses lose their leading `+`, delivery reports are always requested,
/// and the `type` tag carries the message-wide encoding mode.
pub fn encode_send_form(form: &SendForm<'_>) -> Vec<(String, String)> {
    vec![
        (ApiKey::FIELD.to_owned(), form.api_key.as_str().to_owned()),
        (
            ApiSecret::FIELD.to_owned(),
            form.api_secret.as_str().to_owned(),
        ),
        ("from".to_owned(), form.from.wire().to_owned()),
        ("to".to_owned(), form.to.wire().to_owned()),
        ("text".to_owned(), form.text.to_owned()),
        ("status-report-req".to_owned(), "1".to_owned()),
        (
            CallbackUrl::FIELD.to_owned(),
            form.callback.as_str().to_owned(),
        ),
        (EncodingMode::FIELD.to_owned(), form.mode.wire().to_owned()),
    ]
}

#[derive(Debug, Clone, Deserialize)]
struct SendJsonResponse {
    #[serde(default)]
    messages: Vec<MessageJsonResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResult {
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "message-id")]
    message_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The first element of the response's `messages` array, which is the one
/// that describes the part just submitted.
pub struct SendResponse {
    pub status: Option<String>,
    pub external_id: Option<String>,
}

/// Decode a send response body.
///
/// Callers treat a decode error the same as a missing or non-success status
/// code: the part failed. The external id is surfaced even alongside error
/// statuses so it can be kept for diagnostics.
pub fn decode_send_response(body: &str) -> Result<SendResponse, TransportError> {
    let parsed: SendJsonResponse = serde_json::from_str(body)?;
    let first = parsed.messages.into_iter().next().ok_or(TransportError::NoMessages)?;
    Ok(SendResponse {
        status: first.status,
        external_id: first.message_id,
    })
}

/// Detect the provider's rate-limit signal in a raw response body.
///
/// Returns the mandated wait when the body matches, `None` otherwise.
pub fn throttle_delay(body: &str) -> Option<Duration> {
    let caps = THROTTLED_RE.captures(body)?;
    let millis: u64 = caps[1].parse().ok()?;
    Some(Duration::from_millis(millis))
}
