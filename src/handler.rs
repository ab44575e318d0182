//! The Nexmo channel handler: outbound sends plus the two inbound webhook
//! translators (message receipt and delivery-status reports).
//!
//! Webhook anomalies the adapter cannot act on — missing fields, unknown
//! status vocabulary, status reports for message parts the gateway never
//! stored — are answered with an explicit ignored/benign outcome so the
//! host keeps acknowledging the provider and no retry storm builds up.

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{Backend, BackendError};
use crate::channel::{ChannelConfig, ConfigError};
use crate::client::NexmoClient;
use crate::domain::{
    DeliveryStatus, ExternalMessageId, InboundMessage, OutboundMessage, OutboundStatus,
    PhoneNumber, StatusUpdate, ValidationError,
};
use crate::registry::{ChannelHandler, Route};
use crate::transport::{ReceiptForm, StatusForm};

/// Provider code this handler registers under.
pub const CHANNEL_TYPE: &str = "NX";
/// Human-readable provider name.
pub const CHANNEL_NAME: &str = "Nexmo";

const ROUTES: &[Route] = &[
    Route {
        method: "GET",
        path: "receive",
    },
    Route {
        method: "POST",
        path: "receive",
    },
    Route {
        method: "GET",
        path: "status",
    },
];

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// A field failed domain validation, e.g. an unparseable sender address.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone)]
/// Outcome of a receipt webhook call.
pub enum ReceiptOutcome {
    /// An inbound message was written to the backend.
    Received(InboundMessage),
    /// Nothing to act on; acknowledge the provider and move on.
    Ignored(&'static str),
}

#[derive(Debug, Clone)]
/// Outcome of a status webhook call. All variants are acknowledged to the
/// provider as success.
pub enum StatusOutcome {
    /// The status update was written to the backend.
    Updated(StatusUpdate),
    /// No stored message matches the external id; benign for multi-part
    /// sends, where only one part's id is on record.
    NotFound(ExternalMessageId),
    /// Nothing to act on; acknowledge the provider and move on.
    Ignored(&'static str),
}

/// Handler wiring the sender and the webhook translators to a backend.
pub struct NexmoHandler {
    client: NexmoClient,
    backend: Arc<dyn Backend>,
}

impl NexmoHandler {
    pub fn new(client: NexmoClient, backend: Arc<dyn Backend>) -> Self {
        Self { client, backend }
    }
}

#[async_trait]
impl ChannelHandler for NexmoHandler {
    fn channel_type(&self) -> &'static str {
        CHANNEL_TYPE
    }

    fn name(&self) -> &'static str {
        CHANNEL_NAME
    }

    fn routes(&self) -> &'static [Route] {
        ROUTES
    }

    async fn send_message(
        &self,
        channel: &ChannelConfig,
        msg: &OutboundMessage,
    ) -> Result<OutboundStatus, ConfigError> {
        self.client.send_message(channel, msg).await
    }

    async fn receive_message(
        &self,
        channel: &ChannelConfig,
        form: &ReceiptForm,
    ) -> Result<ReceiptOutcome, WebhookError> {
        if form.to.trim().is_empty() {
            tracing::debug!(channel = channel.id().as_str(), "no to parameter, ignored");
            return Ok(ReceiptOutcome::Ignored("no to parameter, ignored"));
        }

        let sender = PhoneNumber::parse(channel.country(), form.from.as_str())?;
        let msg = InboundMessage {
            channel: channel.id().clone(),
            sender,
            text: form.text.clone(),
            external_id: ExternalMessageId::new(form.message_id.as_str()).ok(),
        };

        self.backend.write_inbound_message(&msg).await?;
        Ok(ReceiptOutcome::Received(msg))
    }

    async fn receive_status(
        &self,
        channel: &ChannelConfig,
        form: &StatusForm,
    ) -> Result<StatusOutcome, WebhookError> {
        if form.message_id.trim().is_empty() {
            tracing::debug!(
                channel = channel.id().as_str(),
                "no messageID parameter, ignored"
            );
            return Ok(StatusOutcome::Ignored("no messageID parameter, ignored"));
        }

        let Some(status) = DeliveryStatus::from_provider(&form.status) else {
            tracing::debug!(
                channel = channel.id().as_str(),
                status = form.status.as_str(),
                "ignoring unknown status report"
            );
            return Ok(StatusOutcome::Ignored("ignoring unknown status report"));
        };

        let update = StatusUpdate {
            channel: channel.id().clone(),
            external_id: ExternalMessageId::new(form.message_id.as_str())?,
            status,
        };

        match self.backend.write_status_update(&update).await {
            Ok(()) => Ok(StatusOutcome::Updated(update)),
            // multi-part sends leave several ids with the provider, only one
            // of which the gateway stored; reports for the others are benign
            Err(BackendError::MsgNotFound) => {
                tracing::info!(
                    channel = channel.id().as_str(),
                    external_id = update.external_id.as_str(),
                    "status update for unknown message, ignored"
                );
                Ok(StatusOutcome::NotFound(update.external_id))
            }
            Err(err) => Err(err.into()),
        }
    }
}
