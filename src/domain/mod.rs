//! Domain layer: strong types with validation and invariants (no I/O).

mod encoding;
mod message;
mod segment;
mod status;
mod validation;
mod value;

pub use encoding::EncodingMode;
pub use message::{InboundMessage, OutboundMessage, StatusUpdate};
pub use segment::{MAX_MSG_LENGTH, segment};
pub use status::{DeliveryStatus, OutboundStatus, SendAttempt};
pub use validation::ValidationError;
pub use value::{
    ApiKey, ApiSecret, CallbackUrl, ChannelId, ExternalMessageId, PhoneNumber, TelAddress,
};
