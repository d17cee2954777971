//! Committed mention spans and their reconciliation with buffer edits.
//!
//! A [`MentionSet`] is the authoritative list of mentions for one text buffer. It is kept
//! sorted by `start` and never contains overlapping spans. Two paths change it:
//!
//! - [`MentionSet::commit`]: the engine's own splice, which inserts `"@" + literal + " "` and
//!   registers the new span.
//! - [`MentionSet::apply_edit`]: any other edit. Spans the edit touches are dropped (a
//!   partially edited mention is no longer trustworthy); spans after the edit are shifted.
//!
//! All offsets are char offsets.

use crate::candidate::{Candidate, LiteralStyle};
use crate::delta::TextEdit;
use crate::error::MentionError;
use crate::message::StoredMention;
use crate::text::{CharIndex, char_len};
use std::ops::Range;

/// One committed mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Id of the mentioned entity.
    pub entity_id: String,
    /// Full display name at commit time (the literal may be abbreviated).
    pub display_text: String,
    /// Exact text the span covered at commit time, including the `@`.
    pub literal: String,
    /// Inclusive start char offset (the `@`).
    pub start: usize,
    /// Exclusive end char offset (before the trailing space).
    pub end: usize,
}

impl Mention {
    /// Span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` if the span covers `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns `true` if the two spans intersect.
    pub fn overlaps(&self, other: &Mention) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Persisted form of this mention.
    pub fn to_stored(&self) -> StoredMention {
        StoredMention {
            user_id: self.entity_id.clone(),
            display: self.display_text.clone(),
            start: self.start,
            end: self.end,
        }
    }

    fn shift(&mut self, delta: isize) {
        self.start = self.start.saturating_add_signed(delta);
        self.end = self.end.saturating_add_signed(delta);
    }
}

/// Outcome of a successful [`commit_mention`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Text after the splice.
    pub text: String,
    /// The new span.
    pub mention: Mention,
    /// Caret char offset after the trailing space.
    pub caret: usize,
    /// The splice as an edit of the pre-commit text.
    pub edit: TextEdit,
}

/// Replace `text[trigger_start..caret]` with `"@" + literal + " "`.
///
/// The trigger is re-validated first: `trigger_start <= caret <= len(text)` and the char at
/// `trigger_start` must be `@`. A stale trigger yields [`MentionError::StaleTrigger`] and the
/// text is left untouched.
pub fn commit_mention(
    text: &str,
    trigger_start: usize,
    caret: usize,
    candidate: &Candidate,
    style: LiteralStyle,
) -> Result<Commit, MentionError> {
    let index = CharIndex::new(text);
    let len = index.char_count();
    if trigger_start > caret || caret > len {
        return Err(MentionError::InvalidRange {
            start: trigger_start,
            end: caret,
            len,
        });
    }
    if index.slice(text, trigger_start, trigger_start + 1) != Some("@") {
        return Err(MentionError::StaleTrigger {
            offset: trigger_start,
        });
    }

    let literal = format!("@{}", style.literal_for(candidate));
    let literal_len = char_len(&literal);

    let head = &text[..index.char_to_byte(trigger_start)];
    let tail = &text[index.char_to_byte(caret)..];
    let mut out = String::with_capacity(text.len() + literal.len() + 1);
    out.push_str(head);
    out.push_str(&literal);
    out.push(' ');
    out.push_str(tail);

    let mention = Mention {
        entity_id: candidate.id.clone(),
        display_text: candidate.display_name.clone(),
        literal,
        start: trigger_start,
        end: trigger_start + literal_len,
    };

    tracing::debug!(
        entity_id = %mention.entity_id,
        start = mention.start,
        end = mention.end,
        "mention committed"
    );

    Ok(Commit {
        text: out,
        caret: mention.end + 1,
        edit: TextEdit::replacement(trigger_start, caret, literal_len + 1),
        mention,
    })
}

/// The ordered, non-overlapping mentions of one text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionSet {
    mentions: Vec<Mention>,
}

impl MentionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from persisted mentions, dropping any that do not validate against
    /// `text` or overlap an earlier span.
    pub fn from_stored(text: &str, stored: &[StoredMention]) -> Self {
        let index = CharIndex::new(text);
        let mut set = Self::new();
        let mut sorted: Vec<&StoredMention> = stored.iter().collect();
        sorted.sort_by_key(|m| (m.start, m.end));
        for m in sorted {
            let Some(span) = m.validated_span(text, &index) else {
                tracing::warn!(
                    user_id = %m.user_id,
                    start = m.start,
                    end = m.end,
                    "dropping malformed stored mention"
                );
                continue;
            };
            let mention = Mention {
                entity_id: m.user_id.clone(),
                display_text: m.display.clone(),
                literal: span.to_string(),
                start: m.start,
                end: m.end,
            };
            if set.mentions.last().is_some_and(|last| last.overlaps(&mention)) {
                tracing::warn!(user_id = %m.user_id, "dropping overlapping stored mention");
                continue;
            }
            set.mentions.push(mention);
        }
        set
    }

    /// Mentions sorted by `start`.
    pub fn as_slice(&self) -> &[Mention] {
        &self.mentions
    }

    /// Iterate mentions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mention> {
        self.mentions.iter()
    }

    /// Number of mentions.
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Returns `true` if there are no mentions.
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// Remove every mention.
    pub fn clear(&mut self) {
        self.mentions.clear();
    }

    /// Mention covering `offset`, if any.
    pub fn mention_at(&self, offset: usize) -> Option<&Mention> {
        let idx = self.mentions.partition_point(|m| m.start <= offset);
        idx.checked_sub(1)
            .and_then(|i| self.mentions.get(i))
            .filter(|m| m.contains(offset))
    }

    /// Mention whose span starts exactly at `offset`.
    pub fn mention_starting_at(&self, offset: usize) -> Option<&Mention> {
        self.mentions
            .binary_search_by_key(&offset, |m| m.start)
            .ok()
            .map(|i| &self.mentions[i])
    }

    /// Unique entity ids in text order (for notification dispatch).
    pub fn entity_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.mentions.len());
        for m in &self.mentions {
            if !ids.contains(&m.entity_id.as_str()) {
                ids.push(m.entity_id.as_str());
            }
        }
        ids
    }

    /// Persisted form of every mention.
    pub fn to_stored(&self) -> Vec<StoredMention> {
        self.mentions.iter().map(Mention::to_stored).collect()
    }

    /// Commit `candidate` over `text[trigger_start..caret]` and register the new span.
    ///
    /// Existing spans are reconciled against the splice first, so a span the replaced range
    /// overlaps is dropped and later spans shift.
    pub fn commit(
        &mut self,
        text: &str,
        trigger_start: usize,
        caret: usize,
        candidate: &Candidate,
        style: LiteralStyle,
    ) -> Result<Commit, MentionError> {
        let commit = commit_mention(text, trigger_start, caret, candidate, style)?;
        self.apply_edit(&commit.edit);
        self.insert(commit.mention.clone());
        Ok(commit)
    }

    /// Reconcile spans with an edit that did not come from [`MentionSet::commit`].
    ///
    /// Returns the dropped mentions.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Vec<Mention> {
        if edit.is_noop() {
            return Vec::new();
        }
        let delta = edit.delta();
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.mentions.len());

        for mut mention in self.mentions.drain(..) {
            if edit.touches(mention.start, mention.end) {
                dropped.push(mention);
            } else if edit.end() <= mention.start {
                mention.shift(delta);
                kept.push(mention);
            } else {
                kept.push(mention);
            }
        }
        self.mentions = kept;

        for m in &dropped {
            tracing::debug!(
                entity_id = %m.entity_id,
                start = m.start,
                end = m.end,
                "mention invalidated by edit"
            );
        }
        dropped
    }

    /// Drop mentions that are out of bounds for `text` or whose span no longer reads as the
    /// committed literal. Returns the dropped mentions.
    pub fn validate(&mut self, text: &str) -> Vec<Mention> {
        let index = CharIndex::new(text);
        let (kept, dropped): (Vec<Mention>, Vec<Mention>) =
            self.mentions.drain(..).partition(|m| {
                m.start < m.end && index.slice(text, m.start, m.end) == Some(m.literal.as_str())
            });
        self.mentions = kept;
        for m in &dropped {
            tracing::debug!(
                entity_id = %m.entity_id,
                start = m.start,
                end = m.end,
                "mention drifted from its literal"
            );
        }
        dropped
    }

    /// Reconcile with a buffer change known only by its before/after text.
    pub fn reconcile_text(&mut self, old: &str, new: &str) -> Vec<Mention> {
        let mut dropped = match TextEdit::between(old, new) {
            Some(edit) => self.apply_edit(&edit),
            None => Vec::new(),
        };
        dropped.extend(self.validate(new));
        dropped
    }

    fn insert(&mut self, mention: Mention) {
        let pos = self.mentions.partition_point(|m| m.start < mention.start);
        debug_assert!(
            self.mentions.get(pos).is_none_or(|next| !next.overlaps(&mention))
                && pos
                    .checked_sub(1)
                    .is_none_or(|prev| !self.mentions[prev].overlaps(&mention)),
            "mention spans must not overlap"
        );
        self.mentions.insert(pos, mention);
    }
}

impl<'a> IntoIterator for &'a MentionSet {
    type Item = &'a Mention;
    type IntoIter = std::slice::Iter<'a, Mention>;

    fn into_iter(self) -> Self::IntoIter {
        self.mentions.iter()
    }
}
