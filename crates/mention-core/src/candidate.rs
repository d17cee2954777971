//! Mentionable entities offered by a directory.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A mentionable entity (usually a person).
///
/// Candidates are immutable from the engine's point of view: they are produced by a
/// [`CandidateDirectory`](crate::CandidateDirectory) and only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Stable entity id (stored as `userId` in persisted messages).
    pub id: String,
    /// Full display name.
    pub display_name: String,
    /// Secondary label shown next to the name (role, organizational unit).
    #[serde(default)]
    pub secondary_label: String,
    /// Extra searchable text (contact address, aliases).
    #[serde(default)]
    pub searchable_text: String,
}

impl Candidate {
    /// Create a candidate with an id and display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            secondary_label: String::new(),
            searchable_text: String::new(),
        }
    }

    /// Set the secondary label.
    pub fn with_secondary_label(mut self, label: impl Into<String>) -> Self {
        self.secondary_label = label.into();
        self
    }

    /// Set the extra searchable text.
    pub fn with_searchable_text(mut self, text: impl Into<String>) -> Self {
        self.searchable_text = text.into();
        self
    }

    /// All fields a query is matched against, in priority order.
    pub fn searchable_fields(&self) -> [&str; 3] {
        [
            self.display_name.as_str(),
            self.secondary_label.as_str(),
            self.searchable_text.as_str(),
        ]
    }

    /// First whitespace-separated part of the display name that contains a word, trimmed to
    /// its words (`"Anne-Marie Dupont"` gives `"Anne-Marie"`, `"🚀 Bia Costa"` gives `"Bia"`).
    pub fn first_name(&self) -> &str {
        first_name_of(&self.display_name)
    }
}

fn first_name_of(display: &str) -> &str {
    display
        .split_whitespace()
        .find_map(word_run)
        .unwrap_or_else(|| display.trim())
}

/// `part` cut down to the run from its first to its last Unicode word.
fn word_run(part: &str) -> Option<&str> {
    let mut words = part.unicode_word_indices();
    let (start, first) = words.next()?;
    let end = words.last().map_or(start + first.len(), |(i, w)| i + w.len());
    Some(&part[start..end])
}

/// How a committed candidate is rendered into the text buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralStyle {
    /// `@` followed by the first word of the display name.
    #[default]
    FirstName,
    /// `@` followed by the full display name.
    FullName,
}

impl LiteralStyle {
    /// Literal text (without the leading `@`) for `candidate`.
    pub fn literal_for<'a>(&self, candidate: &'a Candidate) -> &'a str {
        self.literal_for_display(&candidate.display_name)
    }

    /// Literal text (without the leading `@`) for a bare display name.
    pub fn literal_for_display<'a>(&self, display: &'a str) -> &'a str {
        match self {
            Self::FirstName => first_name_of(display),
            Self::FullName => display.trim(),
        }
    }

    /// Returns `true` if `body` (span text after the `@`) is what some style writes for
    /// `display`. Persisted mentions only keep the display name, so this is how they are
    /// checked against their span.
    pub fn any_matches(display: &str, body: &str) -> bool {
        !body.is_empty()
            && [Self::FirstName, Self::FullName]
                .iter()
                .any(|style| style.literal_for_display(display) == body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_uses_unicode_words() {
        let c = Candidate::new("u1", "Élodie Martin-Durand");
        assert_eq!(c.first_name(), "Élodie");
        assert_eq!(LiteralStyle::FullName.literal_for(&c), "Élodie Martin-Durand");
    }

    #[test]
    fn test_first_name_keeps_compound_names_whole() {
        assert_eq!(Candidate::new("1", "Anne-Marie Dupont").first_name(), "Anne-Marie");
        assert_eq!(Candidate::new("2", "Jean-Luc").first_name(), "Jean-Luc");
    }

    #[test]
    fn test_first_name_skips_symbols_and_quotes() {
        assert_eq!(Candidate::new("1", "🚀 Bia Costa").first_name(), "Bia");
        assert_eq!(Candidate::new("2", "\"Bia\" Costa").first_name(), "Bia");
        assert_eq!(Candidate::new("3", "(Rui)").first_name(), "Rui");
        assert_eq!(Candidate::new("4", " 🚀 ").first_name(), "🚀");
    }

    #[test]
    fn test_any_matches_accepts_both_styles_only() {
        assert!(LiteralStyle::any_matches("🚀 Bia Costa", "Bia"));
        assert!(LiteralStyle::any_matches("🚀 Bia Costa", "🚀 Bia Costa"));
        assert!(!LiteralStyle::any_matches("🚀 Bia Costa", "Bi"));
        assert!(!LiteralStyle::any_matches("Ana", ""));
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let c: Candidate =
            serde_json::from_str(r#"{"id":"7","displayName":"Ana Souza"}"#).unwrap();
        assert_eq!(c.secondary_label, "");
        assert_eq!(c.first_name(), "Ana");
    }
}
