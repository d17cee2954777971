//! Error types.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the mention span model and the storage codec.
pub enum MentionError {
    #[error("stale trigger: no '@' at offset {offset}")]
    /// The trigger offset no longer points at an `@` (the caret or text moved between scan and
    /// confirm).
    StaleTrigger {
        /// Char offset the trigger was expected at.
        offset: usize,
    },

    #[error("invalid range {start}..{end} for text of {len} chars")]
    /// A char range does not fit the text it is applied to.
    InvalidRange {
        /// Inclusive start char offset.
        start: usize,
        /// Exclusive end char offset.
        end: usize,
        /// Text length in chars.
        len: usize,
    },

    #[error("JSON error: {0}")]
    /// Encoding or decoding a stored message or options failed.
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Errors reported by a [`CandidateDirectory`](crate::CandidateDirectory).
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    /// The backing source could not be reached.
    Unavailable(String),

    #[error("invalid directory data: {0}")]
    /// The backing source returned data that could not be interpreted.
    InvalidData(String),
}
