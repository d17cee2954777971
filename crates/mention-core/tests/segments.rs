use mention_core::{
    Candidate, LiteralStyle, MentionSet, Segment, StoredMention, StoredMessage, render_segments,
    split,
};
use pretty_assertions::assert_eq;

fn stored(user_id: &str, display: &str, start: usize, end: usize) -> StoredMention {
    StoredMention {
        user_id: user_id.to_string(),
        display: display.to_string(),
        start,
        end,
    }
}

fn mention(text: &str, entity_id: &str) -> Segment {
    Segment::Mention {
        text: text.to_string(),
        entity_id: entity_id.to_string(),
    }
}

fn joined(segments: &[Segment]) -> String {
    segments.iter().map(Segment::text).collect()
}

#[test]
fn test_no_mentions_is_one_text_segment() {
    let none: &[StoredMention] = &[];
    assert_eq!(
        split("just text", none),
        vec![Segment::Text("just text".to_string())]
    );
    assert!(split("", none).is_empty());
}

#[test]
fn test_split_stored_message() {
    let message = StoredMessage::new(
        "@Ana and @Bruno Lima, see below",
        vec![
            stored("u1", "Ana Souza", 0, 4),
            stored("u2", "Bruno Lima", 9, 20),
        ],
    );
    let segments = render_segments(&message);
    assert_eq!(
        segments,
        vec![
            mention("@Ana", "u1"),
            Segment::Text(" and ".to_string()),
            mention("@Bruno Lima", "u2"),
            Segment::Text(", see below".to_string()),
        ]
    );
    assert_eq!(joined(&segments), message.text);
}

#[test]
fn test_adjacent_mentions() {
    let text = "@Ana@Bruno";
    let segments = split(
        text,
        &[stored("u2", "Bruno", 4, 10), stored("u1", "Ana", 0, 4)],
    );
    assert_eq!(segments, vec![mention("@Ana", "u1"), mention("@Bruno", "u2")]);
}

#[test]
fn test_malformed_mentions_degrade_to_text() {
    let text = "hi @Ana and @Bruno";
    let segments = split(
        text,
        &[
            // Span text does not match the display name.
            stored("u9", "Zoe", 3, 7),
            // Out of bounds.
            stored("u8", "Bruno", 12, 40),
            // Empty.
            stored("u7", "Ana", 5, 5),
            stored("u2", "Bruno", 12, 18),
        ],
    );
    assert_eq!(
        segments,
        vec![
            Segment::Text("hi @Ana and ".to_string()),
            mention("@Bruno", "u2"),
        ]
    );
    assert_eq!(joined(&segments), text);
}

#[test]
fn test_overlapping_mentions_keep_the_first() {
    let text = "@Ana Souza!";
    let segments = split(
        text,
        &[stored("u1", "Ana Souza", 0, 10), stored("u1", "Ana Souza", 0, 4)],
    );
    // Sorted by (start, end), so the shorter span is placed first.
    assert_eq!(
        segments,
        vec![mention("@Ana", "u1"), Segment::Text(" Souza!".to_string())]
    );
}

#[test]
fn test_non_ascii_offsets_are_chars() {
    let text = "olá 👋 @Zoë, até";
    let segments = split(text, &[stored("u1", "Zoë Kim", 6, 10)]);
    assert_eq!(
        segments,
        vec![
            Segment::Text("olá 👋 ".to_string()),
            mention("@Zoë", "u1"),
            Segment::Text(", até".to_string()),
        ]
    );
}

#[test]
fn test_live_mentions_split_like_stored_ones() {
    let mut set = MentionSet::new();
    let ana = Candidate::new("u1", "Ana Souza");
    let commit = set
        .commit("ping @a", 5, 7, &ana, LiteralStyle::FirstName)
        .unwrap();

    let live = split(&commit.text, set.as_slice());
    let stored = split(&commit.text, &set.to_stored());
    assert_eq!(live, stored);
    assert_eq!(
        live,
        vec![
            Segment::Text("ping ".to_string()),
            mention("@Ana", "u1"),
            Segment::Text(" ".to_string()),
        ]
    );
    assert!(live[1].is_mention());
}

#[test]
fn test_splitting_is_idempotent() {
    let message = StoredMessage::new("a @Ana b", vec![stored("u1", "Ana", 2, 6)]);
    assert_eq!(render_segments(&message), render_segments(&message));
}
