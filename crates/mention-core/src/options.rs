//! Per-field configuration.

use crate::candidate::LiteralStyle;
use crate::error::MentionError;
use crate::matcher::DEFAULT_PAGE_SIZE;
use crate::scanner::ScanOptions;
use serde::{Deserialize, Serialize};

/// Options for a [`MentionField`](crate::MentionField).
///
/// Every key is optional when deserializing; missing keys take their default.
///
/// ```rust
/// use mention_core::{LiteralStyle, MentionOptions};
///
/// let options = MentionOptions::from_json_str(r#"{ "page_size": 5, "literal_style": "full_name" }"#).unwrap();
/// assert_eq!(options.page_size, 5);
/// assert_eq!(options.literal_style, LiteralStyle::FullName);
/// assert_eq!(options.scan.max_query_words, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionOptions {
    /// Maximum number of candidates in the dropdown.
    pub page_size: usize,
    /// Trigger scanning rules.
    pub scan: ScanOptions,
    /// How a confirmed candidate is written into the text.
    pub literal_style: LiteralStyle,
}

impl Default for MentionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scan: ScanOptions::default(),
            literal_style: LiteralStyle::default(),
        }
    }
}

impl MentionOptions {
    /// Parse options from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, MentionError> {
        Ok(serde_json::from_str(json)?)
    }
}
