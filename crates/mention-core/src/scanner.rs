//! Trigger scanning.
//!
//! Decides whether the caret sits inside an active `@` trigger by looking only at the text that
//! precedes it. The scan is cheap enough to run on every keystroke and every caret movement.

use serde::{Deserialize, Serialize};

/// Options that control what counts as an active trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Maximum number of space-separated words the query may contain.
    ///
    /// With the default of `1`, a space followed by another letter terminates the trigger.
    pub max_query_words: usize,
    /// If `true`, the `@` must be at the start of the text or follow whitespace/punctuation.
    pub require_word_boundary: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_query_words: 1,
            require_word_boundary: false,
        }
    }
}

/// Result of scanning the text before the caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerContext {
    /// Whether the caret is inside an active trigger.
    pub active: bool,
    /// Char offset of the `@` (meaningless when inactive).
    pub start_offset: usize,
    /// Trimmed partial query between the `@` and the caret.
    pub query: String,
}

impl TriggerContext {
    /// An inactive context.
    pub fn inactive() -> Self {
        Self::default()
    }

    fn active(start_offset: usize, query: String) -> Self {
        Self {
            active: true,
            start_offset,
            query,
        }
    }
}

/// Scan with [`ScanOptions::default`].
pub fn scan(text: &str, caret_offset: usize) -> TriggerContext {
    scan_with(text, caret_offset, &ScanOptions::default())
}

/// Scan backward from `caret_offset` (char offset) for the nearest `@`.
///
/// The trigger is active only if every char between the `@` and the caret is a letter or a
/// plain space, the first char after the `@` is not a space, the `@` is not doubled, and the
/// query does not exceed [`ScanOptions::max_query_words`]. A caret past the end of the text is
/// clamped.
pub fn scan_with(text: &str, caret_offset: usize, options: &ScanOptions) -> TriggerContext {
    let before: Vec<char> = text.chars().take(caret_offset).collect();
    let caret = before.len();

    let mut at = None;
    for idx in (0..caret).rev() {
        let ch = before[idx];
        if ch == '@' {
            at = Some(idx);
            break;
        }
        if !is_query_char(ch) {
            tracing::trace!(caret, offset = idx, "trigger scan stopped at disallowed char");
            return TriggerContext::inactive();
        }
    }

    let Some(at) = at else {
        return TriggerContext::inactive();
    };

    if before.get(at + 1).is_some_and(|c| c.is_whitespace()) {
        return TriggerContext::inactive();
    }

    // "@@" is an escaped at-sign, not a trigger.
    if at > 0 && before[at - 1] == '@' {
        return TriggerContext::inactive();
    }

    if options.require_word_boundary && at > 0 {
        let prev = before[at - 1];
        if prev.is_alphanumeric() || prev == '_' {
            return TriggerContext::inactive();
        }
    }

    let raw: String = before[at + 1..].iter().collect();
    if raw.split_whitespace().count() > options.max_query_words.max(1) {
        return TriggerContext::inactive();
    }

    let query = raw.trim().to_string();
    tracing::trace!(start = at, query = %query, "trigger active");
    TriggerContext::active(at, query)
}

fn is_query_char(ch: char) -> bool {
    ch.is_alphabetic() || ch == ' '
}
