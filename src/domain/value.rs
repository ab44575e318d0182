use crate::domain::validation::ValidationError;

use phonenumber::country;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Nexmo API key.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Form field name used by the send endpoint (`api_key`).
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Nexmo API secret.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct ApiSecret(String);

impl ApiSecret {
    /// Form field name used by the send endpoint (`api_secret`).
    pub const FIELD: &'static str = "api_secret";

    /// Create a validated [`ApiSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Provider-assigned message identifier (`message-id` in send responses,
/// `messageID` in status callbacks).
///
/// Invariant: non-empty after trimming.
pub struct ExternalMessageId(String);

impl ExternalMessageId {
    /// Create a validated [`ExternalMessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "external message id",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Gateway channel identifier, used in status-callback URLs.
///
/// Invariant: non-empty after trimming.
pub struct ChannelId(String);

impl ChannelId {
    /// Create a validated [`ChannelId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "channel id" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Phone-number address as carried on messages and channels.
///
/// This type does not normalize; if you want E.164 normalization, parse into
/// [`PhoneNumber`] and convert it into [`TelAddress`]. The provider's form
/// fields omit the leading `+`, which [`TelAddress::wire`] strips.
pub struct TelAddress(String);

impl TelAddress {
    /// Create a validated (non-empty) address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "address" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The address as provided, e.g. `+14155551212`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address as sent on the wire, without a leading `+`.
    pub fn wire(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }
}

impl From<PhoneNumber> for TelAddress {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix, as with the bare MSISDNs the provider sends on
    /// receipt webhooks.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: "msisdn" });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Absolute URL the provider should call back with delivery reports.
///
/// Invariant: parses as an absolute `http`/`https` URL.
pub struct CallbackUrl(String);

impl CallbackUrl {
    /// Form field name used by the send endpoint (`callback`).
    pub const FIELD: &'static str = "callback";

    /// Create a validated [`CallbackUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let parsed = Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
