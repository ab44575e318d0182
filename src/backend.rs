//! Persistence collaborator contract.
//!
//! The gateway owns durable storage; the adapter only hands it fully
//! translated records. `MsgNotFound` is a distinguished outcome because
//! multi-part sends leave the provider holding several external ids while
//! the gateway stores one — status callbacks for the other parts are
//! expected and must not be treated as failures.

use async_trait::async_trait;

use crate::domain::{InboundMessage, StatusUpdate};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No stored message matches the external id of a status update.
    #[error("message not found")]
    MsgNotFound,

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Persist a newly received inbound message.
    async fn write_inbound_message(&self, msg: &InboundMessage) -> Result<(), BackendError>;

    /// Persist a delivery-status update keyed by external message id.
    async fn write_status_update(&self, update: &StatusUpdate) -> Result<(), BackendError>;
}
