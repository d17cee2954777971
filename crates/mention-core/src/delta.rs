//! Text edits expressed in char offsets.
//!
//! Span reconciliation only needs to know *where* the buffer changed and by how much, so an
//! edit is described by the replaced range in the pre-edit text plus the length of what
//! replaced it.

/// A single replacement: `old_len` chars starting at `start` were replaced by `new_len` chars.
///
/// Pure insertions have `old_len == 0`; pure deletions have `new_len == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEdit {
    /// Start char offset in the pre-edit text.
    pub start: usize,
    /// Number of chars removed.
    pub old_len: usize,
    /// Number of chars inserted.
    pub new_len: usize,
}

impl TextEdit {
    /// Insertion of `len` chars at `at`.
    pub fn insertion(at: usize, len: usize) -> Self {
        Self {
            start: at,
            old_len: 0,
            new_len: len,
        }
    }

    /// Deletion of the char range `start..end`.
    pub fn deletion(start: usize, end: usize) -> Self {
        Self {
            start,
            old_len: end.saturating_sub(start),
            new_len: 0,
        }
    }

    /// Replacement of `start..end` by `new_len` chars.
    pub fn replacement(start: usize, end: usize, new_len: usize) -> Self {
        Self {
            start,
            old_len: end.saturating_sub(start),
            new_len,
        }
    }

    /// Exclusive end char offset in the pre-edit text.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.old_len)
    }

    /// Net change in length.
    pub fn delta(&self) -> isize {
        self.new_len as isize - self.old_len as isize
    }

    /// Returns `true` if the edit changes nothing.
    pub fn is_noop(&self) -> bool {
        self.old_len == 0 && self.new_len == 0
    }

    /// Whether this edit touches the half-open span `start..end`.
    ///
    /// Replacements overlap when the ranges intersect. Insertions overlap only when they land
    /// strictly inside the span; inserting exactly at either boundary does not.
    pub fn touches(&self, start: usize, end: usize) -> bool {
        if self.old_len == 0 {
            start < self.start && self.start < end
        } else {
            self.start < end && start < self.end()
        }
    }

    /// Derive the single edit that turns `old` into `new`, using the longest common prefix and
    /// suffix. Returns `None` if the texts are equal.
    pub fn between(old: &str, new: &str) -> Option<Self> {
        if old == new {
            return None;
        }
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();

        let prefix = old_chars
            .iter()
            .zip(new_chars.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let max_suffix = old_chars.len().min(new_chars.len()) - prefix;
        let suffix = old_chars
            .iter()
            .rev()
            .zip(new_chars.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        Some(Self {
            start: prefix,
            old_len: old_chars.len() - prefix - suffix,
            new_len: new_chars.len() - prefix - suffix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_finds_minimal_replacement() {
        let edit = TextEdit::between("Hello @Jane world", "Hello @Jne world").unwrap();
        assert_eq!(edit, TextEdit::deletion(8, 9));

        let edit = TextEdit::between("aaa", "aaaa").unwrap();
        assert_eq!(edit, TextEdit::insertion(3, 1));

        assert_eq!(TextEdit::between("same", "same"), None);
    }

    #[test]
    fn test_insertion_at_boundary_does_not_touch() {
        assert!(!TextEdit::insertion(6, 3).touches(6, 11));
        assert!(!TextEdit::insertion(11, 3).touches(6, 11));
        assert!(TextEdit::insertion(7, 3).touches(6, 11));
        assert!(TextEdit::deletion(10, 12).touches(6, 11));
        assert!(!TextEdit::deletion(11, 12).touches(6, 11));
    }
}
