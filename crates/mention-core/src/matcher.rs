//! Candidate matching and paging.
//!
//! Filtering is plain case-insensitive substring containment over every searchable field;
//! there is no relevance scoring, so the directory order is the ranking.

use crate::candidate::Candidate;
use crate::directory::CandidateDirectory;
use crate::text::CharIndex;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Number of candidates shown in one dropdown page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Filters directory results against a partial query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMatcher {
    page_size: usize,
}

impl Default for CandidateMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CandidateMatcher {
    /// Create a matcher capped at `page_size` results (at least one).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Maximum number of results returned.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Return the candidates matching `query`, in directory order, capped at the page size.
    ///
    /// An empty (or whitespace-only) query returns the first page of `candidates` unfiltered.
    pub fn match_candidates(&self, query: &str, candidates: &[Candidate]) -> Vec<Candidate> {
        let query = query.trim();
        if query.is_empty() {
            return candidates.iter().take(self.page_size).cloned().collect();
        }

        let needle = QueryPattern::new(query);
        candidates
            .iter()
            .filter(|c| c.searchable_fields().iter().any(|f| needle.is_match(f)))
            .take(self.page_size)
            .cloned()
            .collect()
    }

    /// Search `directory` for `query` and filter the results.
    ///
    /// A failing lookup yields an empty list; the failure is logged and never propagated, so
    /// the trigger stays usable while the user keeps typing.
    pub fn lookup(&self, directory: &dyn CandidateDirectory, query: &str) -> Vec<Candidate> {
        match directory.search(query) {
            Ok(results) => self.match_candidates(query, &results),
            Err(err) => {
                tracing::warn!(error = %err, query, "candidate lookup failed");
                Vec::new()
            }
        }
    }
}

/// Char ranges of every case-insensitive occurrence of `query` in `text`.
///
/// Used by hosts to emphasize the matched part of a label.
pub fn highlight_ranges(query: &str, text: &str) -> Vec<Range<usize>> {
    let query = query.trim();
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let Some(regex) = compile_query(query) else {
        return Vec::new();
    };
    let index = CharIndex::new(text);
    regex
        .find_iter(text)
        .map(|m| index.byte_to_char(m.start())..index.byte_to_char(m.end()))
        .collect()
}

fn compile_query(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

enum QueryPattern {
    Regex(Regex),
    Lowercase(String),
}

impl QueryPattern {
    fn new(query: &str) -> Self {
        match compile_query(query) {
            Some(regex) => Self::Regex(regex),
            None => Self::Lowercase(query.to_lowercase()),
        }
    }

    fn is_match(&self, field: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(field),
            Self::Lowercase(needle) => field.to_lowercase().contains(needle.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accented_case_insensitive_match() {
        let list = vec![Candidate::new("1", "ÉLODIE Martin"), Candidate::new("2", "Bob")];
        let out = CandidateMatcher::default().match_candidates("élo", &list);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn test_highlight_ranges_are_char_offsets() {
        assert_eq!(highlight_ranges("an", "Ñandú Ana"), vec![1..3, 6..8]);
    }
}
