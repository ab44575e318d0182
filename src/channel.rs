//! Channel configuration: credentials, addressing, and callback routing.
//!
//! Configuration values arrive from the gateway's channel store as a flat
//! string map; this module turns that surface into validated domain types at
//! the moment of use, so a misconfigured channel fails before any network
//! call is made.

use std::collections::HashMap;

use phonenumber::country;

use crate::domain::{ApiKey, ApiSecret, CallbackUrl, ChannelId, TelAddress, ValidationError};

/// Channel config key holding the API key.
pub const CONFIG_API_KEY: &str = "nexmo_api_key";
/// Channel config key holding the API secret.
pub const CONFIG_API_SECRET: &str = "nexmo_api_secret";
/// Channel config key holding the application id (unused by the SMS flow).
pub const CONFIG_APP_ID: &str = "nexmo_app_id";
/// Channel config key holding the application private key (unused by the SMS flow).
pub const CONFIG_APP_PRIVATE_KEY: &str = "nexmo_app_private_key";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required config key is absent or empty.
    #[error("no {key} set for NX channel")]
    MissingKey { key: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// API credentials resolved from channel configuration.
pub struct Credentials {
    pub api_key: ApiKey,
    pub api_secret: ApiSecret,
}

#[derive(Debug, Clone)]
/// One provisioned Nexmo channel, read-only during sends and webhook calls.
pub struct ChannelConfig {
    id: ChannelId,
    address: TelAddress,
    country: Option<country::Id>,
    callback_domain: String,
    config: HashMap<String, String>,
}

impl ChannelConfig {
    /// Create a channel with its identity, sender address, and the domain
    /// status callbacks should be routed to.
    pub fn new(id: ChannelId, address: TelAddress, callback_domain: impl Into<String>) -> Self {
        Self {
            id,
            address,
            country: None,
            callback_domain: callback_domain.into(),
            config: HashMap::new(),
        }
    }

    /// Default country for parsing bare national numbers on inbound webhooks.
    pub fn with_country(mut self, country: country::Id) -> Self {
        self.country = Some(country);
        self
    }

    /// Attach one collaborator-supplied config entry.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Channel identity.
    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    /// The channel's sender address.
    pub fn address(&self) -> &TelAddress {
        &self.address
    }

    /// Default country context, if configured.
    pub fn country(&self) -> Option<country::Id> {
        self.country
    }

    /// Raw config lookup.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Resolve and validate the channel's API credentials.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let key = self
            .config_value(CONFIG_API_KEY)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingKey {
                key: CONFIG_API_KEY,
            })?;
        let secret = self
            .config_value(CONFIG_API_SECRET)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingKey {
                key: CONFIG_API_SECRET,
            })?;
        Ok(Credentials {
            api_key: ApiKey::new(key)?,
            api_secret: ApiSecret::new(secret)?,
        })
    }

    /// The status-callback URL delivery reports for this channel are sent to.
    ///
    /// Built from channel configuration, never from request input.
    pub fn status_callback_url(&self) -> Result<CallbackUrl, ConfigError> {
        let url = format!(
            "https://{}/c/nx/{}/status",
            self.callback_domain,
            self.id.as_str()
        );
        Ok(CallbackUrl::new(url)?)
    }
}
