//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod send;
mod webhook;

pub use send::{
    SEND_URL, STATUS_SUCCESS, SendForm, SendResponse, TransportError, decode_send_response,
    encode_send_form, throttle_delay,
};
pub use webhook::{ReceiptForm, StatusForm};
