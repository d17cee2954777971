//! Persisted message shape.
//!
//! This is the storage/wire contract a host keeps per comment:
//!
//! ```json
//! { "text": "Hi @Ana ", "mentions": [ { "userId": "u1", "display": "Ana Souza", "start": 3, "end": 7 } ] }
//! ```
//!
//! Offsets are char offsets into `text` unless converted with
//! [`StoredMessage::to_encoding`] (e.g. for hosts that index strings in UTF-16 code units).

use crate::candidate::LiteralStyle;
use crate::error::MentionError;
use crate::text::{CharIndex, char_offset_to_utf16, utf16_offset_to_char};
use serde::{Deserialize, Serialize};

/// A persisted mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMention {
    /// Id of the mentioned entity; read by notification dispatchers.
    pub user_id: String,
    /// Full display name of the entity.
    pub display: String,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl StoredMention {
    /// The span text if this mention is well formed against `text`.
    ///
    /// Well formed means: in bounds, non-empty, starts with `@`, and the rest is the literal a
    /// [`LiteralStyle`] writes for the display name.
    pub(crate) fn validated_span<'a>(&self, text: &'a str, index: &CharIndex) -> Option<&'a str> {
        if self.start >= self.end {
            return None;
        }
        let span = index.slice(text, self.start, self.end)?;
        self.accepts_span(span).then_some(span)
    }

    /// Whether `span` reads as a committed literal of this mention's display name.
    pub(crate) fn accepts_span(&self, span: &str) -> bool {
        span.strip_prefix('@')
            .is_some_and(|body| LiteralStyle::any_matches(&self.display, body))
    }

    /// Returns `true` if this mention is well formed against `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.validated_span(text, &CharIndex::new(text)).is_some()
    }
}

/// Offset unit used by a stored message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetEncoding {
    /// Unicode scalar values (the engine's native unit).
    #[default]
    Char,
    /// UTF-16 code units.
    Utf16,
}

/// Text plus its mentions, as stored by a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Message text.
    pub text: String,
    /// Mentions in `text`.
    #[serde(default)]
    pub mentions: Vec<StoredMention>,
}

impl StoredMessage {
    /// Create a stored message.
    pub fn new(text: impl Into<String>, mentions: Vec<StoredMention>) -> Self {
        Self {
            text: text.into(),
            mentions,
        }
    }

    /// Unique user ids to notify, in text order. Malformed mentions are skipped.
    pub fn recipients(&self) -> Vec<&str> {
        let index = CharIndex::new(&self.text);
        let mut sorted: Vec<&StoredMention> = self.mentions.iter().collect();
        sorted.sort_by_key(|m| m.start);
        let mut ids: Vec<&str> = Vec::new();
        for m in sorted {
            if m.validated_span(&self.text, &index).is_some() && !ids.contains(&m.user_id.as_str())
            {
                ids.push(m.user_id.as_str());
            }
        }
        ids
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, MentionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, MentionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert char offsets to `encoding`.
    pub fn to_encoding(&self, encoding: OffsetEncoding) -> Self {
        match encoding {
            OffsetEncoding::Char => self.clone(),
            OffsetEncoding::Utf16 => self.map_offsets(|o| char_offset_to_utf16(&self.text, o)),
        }
    }

    /// Convert offsets expressed in `encoding` back to char offsets.
    pub fn from_encoding(&self, encoding: OffsetEncoding) -> Self {
        match encoding {
            OffsetEncoding::Char => self.clone(),
            OffsetEncoding::Utf16 => self.map_offsets(|o| utf16_offset_to_char(&self.text, o)),
        }
    }

    fn map_offsets(&self, f: impl Fn(usize) -> usize) -> Self {
        Self {
            text: self.text.clone(),
            mentions: self
                .mentions
                .iter()
                .map(|m| StoredMention {
                    start: f(m.start),
                    end: f(m.end),
                    ..m.clone()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana(start: usize, end: usize) -> StoredMention {
        StoredMention {
            user_id: "u1".to_string(),
            display: "Ana Souza".to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let msg = StoredMessage::new("Hi @Ana ", vec![ana(3, 7)]);
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"userId\":\"u1\""));
        assert_eq!(StoredMessage::from_json(&json).unwrap(), msg);
    }

    #[test]
    fn test_validation_rejects_mismatch_and_bounds() {
        let text = "Hi @Ana ";
        assert!(ana(3, 7).is_valid_for(text));
        assert!(!ana(3, 6).is_valid_for(text));
        assert!(!ana(2, 7).is_valid_for(text));
        assert!(!ana(3, 12).is_valid_for(text));
        assert!(!ana(3, 3).is_valid_for(text));
    }

    #[test]
    fn test_utf16_roundtrip_with_emoji() {
        let msg = StoredMessage::new("👋 @Ana ", vec![ana(2, 6)]);
        let wire = msg.to_encoding(OffsetEncoding::Utf16);
        assert_eq!((wire.mentions[0].start, wire.mentions[0].end), (3, 7));
        assert_eq!(wire.from_encoding(OffsetEncoding::Utf16), msg);
    }
}
