use crate::domain::segment::MAX_MSG_LENGTH;
use crate::domain::status::DeliveryStatus;
use crate::domain::value::{ChannelId, ExternalMessageId, PhoneNumber, TelAddress};

#[derive(Debug, Clone)]
/// A logical outbound text message, as handed over by the gateway.
///
/// The adapter only reads it; segmentation and encoding selection happen at
/// send time and never mutate the message.
pub struct OutboundMessage {
    destination: TelAddress,
    text: String,
    max_part_length: usize,
}

impl OutboundMessage {
    /// Create a message with the provider's default per-part budget.
    pub fn new(destination: TelAddress, text: impl Into<String>) -> Self {
        Self {
            destination,
            text: text.into(),
            max_part_length: MAX_MSG_LENGTH,
        }
    }

    /// Override the per-part character budget.
    pub fn with_max_part_length(mut self, max_part_length: usize) -> Self {
        self.max_part_length = max_part_length;
        self
    }

    /// Destination address.
    pub fn destination(&self) -> &TelAddress {
        &self.destination
    }

    /// Full message text, before segmentation.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Per-part character budget.
    pub fn max_part_length(&self) -> usize {
        self.max_part_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An inbound message decoded from a receipt webhook, ready for the backend.
pub struct InboundMessage {
    pub channel: ChannelId,
    pub sender: PhoneNumber,
    pub text: String,
    pub external_id: Option<ExternalMessageId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A delivery-status update decoded from a status webhook, keyed by the
/// provider-assigned message identifier.
pub struct StatusUpdate {
    pub channel: ChannelId,
    pub external_id: ExternalMessageId,
    pub status: DeliveryStatus,
}
