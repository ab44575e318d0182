//! Delivery statuses and the per-send aggregate.

use crate::domain::value::ExternalMessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The gateway's internal delivery-status vocabulary.
pub enum DeliveryStatus {
    /// The send failed before the provider accepted it.
    Errored,
    /// The provider reported the message undeliverable.
    Failed,
    /// Accepted by the provider, not yet handed to the carrier.
    Sent,
    /// Handed to the provider; final hand-off state of a successful send.
    Wired,
    /// Confirmed delivered to the handset.
    Delivered,
}

impl DeliveryStatus {
    /// Map the provider's status-callback vocabulary onto ours.
    ///
    /// Returns `None` for anything unrecognized; the provider emits extra
    /// vocabulary from time to time and callers must treat unknown strings
    /// as ignorable, not as errors.
    pub fn from_provider(value: &str) -> Option<Self> {
        Some(match value {
            "failed" | "expired" | "rejected" => Self::Failed,
            "buffered" | "accepted" => Self::Sent,
            "unknown" => Self::Wired,
            "delivered" => Self::Delivered,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One HTTP exchange for one message part, kept for diagnostics.
pub struct SendAttempt {
    /// Zero-based retry index within the part (0..=2).
    pub retry: u8,
    /// HTTP status, when a response was received.
    pub http_status: Option<u16>,
    /// Raw response body, when a response was received.
    pub body: Option<String>,
    /// Transport error text, when the exchange failed outright.
    pub error: Option<String>,
    /// Provider status code string parsed from the body, if any.
    pub provider_status: Option<String>,
    /// Provider message id parsed from the body, if any.
    pub external_id: Option<ExternalMessageId>,
}

#[derive(Debug, Clone)]
/// Aggregate outcome of sending one [`OutboundMessage`].
///
/// Starts out [`DeliveryStatus::Errored`] and is marked
/// [`DeliveryStatus::Wired`] only once every part has been accepted with the
/// provider's success code. The external id is that of the last part which
/// returned one; multi-part correlation is the provider's concern, not ours.
///
/// [`OutboundMessage`]: crate::domain::OutboundMessage
pub struct OutboundStatus {
    status: DeliveryStatus,
    external_id: Option<ExternalMessageId>,
    attempts: Vec<SendAttempt>,
}

impl OutboundStatus {
    /// The pessimistic initial state.
    pub fn errored() -> Self {
        Self {
            status: DeliveryStatus::Errored,
            external_id: None,
            attempts: Vec::new(),
        }
    }

    /// Final delivery status.
    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    /// External id of the most recent successfully sent part.
    pub fn external_id(&self) -> Option<&ExternalMessageId> {
        self.external_id.as_ref()
    }

    /// Every HTTP exchange made for this message, in send order.
    pub fn attempts(&self) -> &[SendAttempt] {
        &self.attempts
    }

    pub(crate) fn record_attempt(&mut self, attempt: SendAttempt) {
        self.attempts.push(attempt);
    }

    pub(crate) fn set_external_id(&mut self, id: ExternalMessageId) {
        self.external_id = Some(id);
    }

    pub(crate) fn mark_wired(&mut self) {
        self.status = DeliveryStatus::Wired;
    }
}
