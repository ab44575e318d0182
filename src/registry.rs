//! Handler registry: provider code → channel handler.
//!
//! The gateway constructs and registers handlers once at startup, then
//! resolves them per request by provider code. There is no global mutable
//! handler state beyond this table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::channel::{ChannelConfig, ConfigError};
use crate::domain::{OutboundMessage, OutboundStatus};
use crate::handler::{ReceiptOutcome, StatusOutcome, WebhookError};
use crate::transport::{ReceiptForm, StatusForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A webhook route a handler wants the host router to expose.
pub struct Route {
    /// HTTP method, e.g. `"GET"`.
    pub method: &'static str,
    /// Route suffix under the channel's URL prefix, e.g. `"receive"`.
    pub path: &'static str,
}

/// Capability interface every channel handler implements.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Provider code the handler registers under, e.g. `"NX"`.
    fn channel_type(&self) -> &'static str;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Webhook routes the host router should wire up for this handler.
    fn routes(&self) -> &'static [Route];

    /// Send one outbound message on a channel.
    async fn send_message(
        &self,
        channel: &ChannelConfig,
        msg: &OutboundMessage,
    ) -> Result<OutboundStatus, ConfigError>;

    /// Translate a receipt webhook call.
    async fn receive_message(
        &self,
        channel: &ChannelConfig,
        form: &ReceiptForm,
    ) -> Result<ReceiptOutcome, WebhookError>;

    /// Translate a status webhook call.
    async fn receive_status(
        &self,
        channel: &ChannelConfig,
        form: &StatusForm,
    ) -> Result<StatusOutcome, WebhookError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("handler for `{0}` already registered")]
    AlreadyRegistered(String),
}

#[derive(Default)]
/// In-memory registry of channel handlers keyed by provider code.
pub struct HandlerRegistry {
    entries: HashMap<&'static str, Arc<dyn ChannelHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own provider code.
    pub fn register(&mut self, handler: Arc<dyn ChannelHandler>) -> Result<(), RegistryError> {
        let code = handler.channel_type();
        if self.entries.contains_key(code) {
            return Err(RegistryError::AlreadyRegistered(code.to_owned()));
        }
        self.entries.insert(code, handler);
        Ok(())
    }

    /// Resolve a handler by provider code.
    pub fn resolve(&self, code: &str) -> Option<Arc<dyn ChannelHandler>> {
        self.entries.get(code).cloned()
    }
}
