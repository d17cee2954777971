//! Render splitting.
//!
//! Turns `(text, mentions)` into an ordered run of plain-text and mention segments. The same
//! splitter serves the live editing preview ([`Mention`]) and read-only display of stored
//! messages ([`StoredMention`]), which only has the persisted pair and no directory access.
//!
//! Mentions that do not validate against the text (out of bounds, span text mismatch, overlap
//! with an earlier span) are rendered as plain text instead of failing.

use crate::mentions::Mention;
use crate::message::{StoredMention, StoredMessage};
use crate::text::CharIndex;

/// A contiguous run of rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// A mention.
    Mention {
        /// Span text (e.g. `"@Ana"`).
        text: String,
        /// Id of the mentioned entity.
        entity_id: String,
    },
}

impl Segment {
    /// The segment's text.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Mention { text, .. } => text,
        }
    }

    /// Returns `true` for mention segments.
    pub fn is_mention(&self) -> bool {
        matches!(self, Self::Mention { .. })
    }
}

/// Something the splitter can place in text.
pub trait MentionSpan {
    /// Inclusive start char offset.
    fn start(&self) -> usize;
    /// Exclusive end char offset.
    fn end(&self) -> usize;
    /// Id of the mentioned entity.
    fn entity_id(&self) -> &str;
    /// Whether `span_text` (the text currently at `start..end`) is what this mention expects.
    fn accepts(&self, span_text: &str) -> bool;
}

impl MentionSpan for Mention {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn accepts(&self, span_text: &str) -> bool {
        span_text == self.literal
    }
}

impl MentionSpan for StoredMention {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn entity_id(&self) -> &str {
        &self.user_id
    }

    fn accepts(&self, span_text: &str) -> bool {
        self.accepts_span(span_text)
    }
}

/// Split `text` into plain and mention segments.
///
/// `split(text, &[])` yields a single text segment, or nothing for empty text. Concatenating
/// the segment texts always reproduces `text`.
pub fn split<M: MentionSpan>(text: &str, mentions: &[M]) -> Vec<Segment> {
    let index = CharIndex::new(text);
    let mut sorted: Vec<&M> = mentions.iter().collect();
    sorted.sort_by_key(|m| (m.start(), m.end()));

    let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut cursor = 0usize;

    for mention in sorted {
        let (start, end) = (mention.start(), mention.end());
        if start < cursor {
            tracing::warn!(
                entity_id = mention.entity_id(),
                start,
                end,
                "skipping overlapping mention"
            );
            continue;
        }
        let Some(span) = index
            .slice(text, start, end)
            .filter(|s| start < end && mention.accepts(s))
        else {
            tracing::warn!(
                entity_id = mention.entity_id(),
                start,
                end,
                "skipping malformed mention"
            );
            continue;
        };

        if cursor < start {
            let gap = &text[index.char_to_byte(cursor)..index.char_to_byte(start)];
            push_text(&mut segments, gap);
        }
        segments.push(Segment::Mention {
            text: span.to_string(),
            entity_id: mention.entity_id().to_string(),
        });
        cursor = end;
    }

    if cursor < index.char_count() {
        push_text(&mut segments, &text[index.char_to_byte(cursor)..]);
    }
    segments
}

/// Split a stored message for read-only display.
pub fn render_segments(message: &StoredMessage) -> Vec<Segment> {
    split(&message.text, &message.mentions)
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Text(prev)) = segments.last_mut() {
        prev.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}
