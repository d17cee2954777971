//! Character-offset helpers shared by the scanner, span model and splitter.
//!
//! All public offsets in this crate are Unicode scalar value (`char`) offsets, never byte
//! offsets.

/// Byte offset of every char boundary in one `&str`, so char offsets coming from the caret,
/// spans and edits can be turned into slices without rescanning the text.
///
/// `boundaries[i]` is the byte offset of char `i`; the last entry is the text's byte length.
#[derive(Debug)]
pub(crate) struct CharIndex {
    boundaries: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { boundaries }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn byte_len(&self) -> usize {
        self.boundaries[self.char_count()]
    }

    /// Byte offset of `char_offset`, clamped to the end of the text.
    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        self.boundaries[char_offset.min(self.char_count())]
    }

    /// Char offset of `byte_offset`. A byte inside a multi-byte char maps to the next char.
    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let byte = byte_offset.min(self.byte_len());
        self.boundaries.partition_point(|&b| b < byte)
    }

    /// Text at the char range `start..end` (a span, a gap between spans, the `@`), or `None`
    /// if the range is reversed or runs past the end.
    pub(crate) fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> Option<&'a str> {
        if start > end || end > self.char_count() {
            return None;
        }
        text.get(self.boundaries[start]..self.boundaries[end])
    }
}

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by a half-open char range, or `None` when the range is invalid.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    CharIndex::new(text).slice(text, start, end)
}

/// Char offset to UTF-16 code-unit offset.
pub fn char_offset_to_utf16(text: &str, char_offset: usize) -> usize {
    text.chars().take(char_offset).map(char::len_utf16).sum()
}

/// UTF-16 code-unit offset to char offset.
///
/// An offset that lands inside a surrogate pair rounds up to the next char.
pub fn utf16_offset_to_char(text: &str, utf16_offset: usize) -> usize {
    let mut current_utf16 = 0;
    let mut char_offset = 0;
    for ch in text.chars() {
        if current_utf16 >= utf16_offset {
            break;
        }
        current_utf16 += ch.len_utf16();
        char_offset += 1;
    }
    char_offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_index_roundtrip_with_multibyte() {
        let text = "a👋é b";
        let index = CharIndex::new(text);
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.char_to_byte(1), 1);
        assert_eq!(index.char_to_byte(2), 5);
        assert_eq!(index.byte_to_char(5), 2);
        assert_eq!(index.slice(text, 1, 3), Some("👋é"));
        assert_eq!(index.slice(text, 3, 9), None);
    }

    #[test]
    fn test_utf16_conversion() {
        let text = "x👋y";
        assert_eq!(char_offset_to_utf16(text, 2), 3);
        assert_eq!(utf16_offset_to_char(text, 3), 2);
        assert_eq!(utf16_offset_to_char(text, 2), 2);
    }
}
