//! Transport encoding selection.
//!
//! The provider charges and truncates differently depending on whether a
//! message fits the GSM 03.38 repertoire; the `type` form field tells it
//! which alphabet to use. The mode is chosen once per logical message, over
//! the full text, so every part of a multi-part send carries the same tag.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Wire value of the send endpoint's `type` field.
pub enum EncodingMode {
    /// GSM 7-bit repertoire.
    Text,
    /// Anything outside it (sent as UCS-2 by the provider).
    Unicode,
}

impl EncodingMode {
    /// Form field name used by the send endpoint (`type`).
    pub const FIELD: &'static str = "type";

    /// Classify message text by its character repertoire.
    ///
    /// Pure and deterministic; classify the full text before segmentation
    /// so that one message is never sent with mixed encodings.
    pub fn classify(text: &str) -> Self {
        if text.chars().all(is_gsm7) {
            Self::Text
        } else {
            Self::Unicode
        }
    }

    /// Value sent on the wire.
    pub fn wire(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Unicode => "unicode",
        }
    }
}

/// GSM 03.38 default alphabet, basic and extension tables.
fn is_gsm7(c: char) -> bool {
    // Backtick sits in the ASCII range but has no GSM 03.38 encoding.
    if c == '`' {
        return false;
    }
    matches!(c,
        '\n' | '\r' | '\x0c'
        | ' '..='~'
        | '£' | '¥' | '¤' | '¡' | '¿' | '§'
        | 'è' | 'é' | 'ù' | 'ì' | 'ò' | 'à'
        | 'Ç' | 'Ø' | 'ø' | 'Å' | 'å' | 'Æ' | 'æ' | 'ß' | 'É'
        | 'Ä' | 'Ö' | 'Ñ' | 'Ü' | 'ä' | 'ö' | 'ñ' | 'ü'
        | 'Δ' | 'Φ' | 'Γ' | 'Λ' | 'Ω' | 'Π' | 'Ψ' | 'Σ' | 'Θ' | 'Ξ'
        | '€')
}
