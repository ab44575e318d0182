//! Form shapes of the provider's inbound webhooks.
//!
//! The host framework owns request routing and form decoding; these structs
//! are the decode targets. Every field defaults to empty because the
//! provider omits fields freely and a malformed call must never fail
//! decoding outright — the translators answer with an explicit "ignored"
//! instead.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
/// Receipt webhook (`GET`/`POST`): a new inbound message.
pub struct ReceiptForm {
    #[serde(default)]
    pub to: String,
    #[serde(default, rename = "msisdn")]
    pub from: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Status webhook (`GET`): a delivery report for an earlier send.
pub struct StatusForm {
    #[serde(default)]
    pub to: String,
    #[serde(default, rename = "messageID")]
    pub message_id: String,
    #[serde(default)]
    pub status: String,
}
