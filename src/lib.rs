//! Nexmo SMS channel adapter for a multi-provider messaging gateway.
//!
//! The design follows three layers: a domain layer of strong types, a
//! transport layer for wire-format quirks, and a client layer orchestrating
//! requests. On top of those sit the webhook translators and a handler
//! registry the host gateway resolves providers from.
//!
//! Outbound, a logical message is classified (GSM-7 vs unicode), segmented
//! under the provider's 1600-character budget, and submitted part by part
//! with a bounded retry loop for the provider's rate-limit signal. Inbound,
//! receipt and status webhooks are translated into gateway records; calls
//! the adapter cannot act on are acknowledged as ignored rather than
//! errored, so the provider does not retry them forever.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nexmo_channel::{
//!     Backend, ChannelConfig, ChannelHandler, ChannelId, NexmoClient, NexmoHandler,
//!     OutboundMessage, TelAddress, CONFIG_API_KEY, CONFIG_API_SECRET,
//! };
//!
//! async fn wire_one_message(backend: Arc<dyn Backend>) -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = ChannelConfig::new(
//!         ChannelId::new("8eb23e93-5ecb-45ba-b726-3b064e0c56ab")?,
//!         TelAddress::new("+2020")?,
//!         "example.com",
//!     )
//!     .with_config(CONFIG_API_KEY, "key")
//!     .with_config(CONFIG_API_SECRET, "secret");
//!
//!     let msg = OutboundMessage::new(TelAddress::new("+250788383383")?, "Simple message");
//!     let handler = NexmoHandler::new(NexmoClient::new(), backend);
//!     let status = handler.send_message(&channel, &msg).await?;
//!     println!("sent: {:?}", status.status());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod backend;
pub mod channel;
pub mod client;
pub mod domain;
pub mod handler;
pub mod registry;
mod transport;

pub use backend::{Backend, BackendError};
pub use channel::{
    CONFIG_API_KEY, CONFIG_API_SECRET, CONFIG_APP_ID, CONFIG_APP_PRIVATE_KEY, ChannelConfig,
    ConfigError, Credentials,
};
pub use client::{NexmoClient, NexmoClientBuilder};
pub use domain::{
    ApiKey, ApiSecret, CallbackUrl, ChannelId, DeliveryStatus, EncodingMode, ExternalMessageId,
    InboundMessage, MAX_MSG_LENGTH, OutboundMessage, OutboundStatus, PhoneNumber, SendAttempt,
    StatusUpdate, TelAddress, ValidationError, segment,
};
pub use handler::{
    CHANNEL_NAME, CHANNEL_TYPE, NexmoHandler, ReceiptOutcome, StatusOutcome, WebhookError,
};
pub use registry::{ChannelHandler, HandlerRegistry, RegistryError, Route};
pub use transport::{ReceiptForm, StatusForm};
