//! Content store.
//!
//! Owns the canonical text buffer. Offsets are Unicode scalar values (`char`s), matching
//! [`Line::start`](crate::Line::start). Out-of-range offsets are clamped the way a string slice
//! would be: `end` to the buffer length, `start` to `end`.

use ropey::Rope;
use serde::Serialize;

/// A half-open character-offset range (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextRange {
    /// Range start offset (inclusive), in `char`s.
    pub start: usize,
    /// Range end offset (exclusive), in `char`s.
    pub end: usize,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in `char`s (zero for inverted ranges).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Rope-backed text buffer.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    rope: Rope,
}

impl ContentStore {
    /// Create a store holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// The whole buffer.
    pub fn get_content(&self) -> String {
        self.rope.to_string()
    }

    /// Buffer length in `char`s.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Text inside `range`; empty when `start == end`.
    pub fn get_content_at_range(&self, range: TextRange) -> String {
        if range.start == range.end {
            return String::new();
        }
        let (start, end) = self.clamp(range);
        self.rope.slice(start..end).to_string()
    }

    /// Replace the whole buffer. Returns `false` (and leaves the buffer untouched) when `text`
    /// equals the current content.
    pub fn replace(&mut self, text: &str) -> bool {
        if self.rope == text {
            return false;
        }
        self.rope = Rope::from_str(text);
        true
    }

    /// The buffer as it would read after replacing `range` with `text`.
    ///
    /// The store itself is not modified; callers feed the result back through
    /// [`ContentStore::replace`] so that no-op detection stays in one place.
    pub fn spliced(&self, range: TextRange, text: &str) -> String {
        let (start, end) = self.clamp(range);
        let mut rope = self.rope.clone();
        rope.remove(start..end);
        rope.insert(start, text);
        rope.to_string()
    }

    fn clamp(&self, range: TextRange) -> (usize, usize) {
        let end = range.end.min(self.rope.len_chars());
        let start = range.start.min(end);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_reads() {
        let store = ContentStore::new("héllo");
        assert_eq!(store.get_content_at_range(TextRange::new(1, 3)), "él");
        assert_eq!(store.get_content_at_range(TextRange::new(2, 2)), "");
        assert_eq!(store.get_content_at_range(TextRange::new(3, 99)), "lo");
        assert_eq!(store.get_content_at_range(TextRange::new(4, 2)), "");
    }

    #[test]
    fn test_replace_reports_noop() {
        let mut store = ContentStore::new("abc");
        assert!(!store.replace("abc"));
        assert!(store.replace("abd"));
        assert_eq!(store.get_content(), "abd");
    }

    #[test]
    fn test_spliced_does_not_mutate() {
        let store = ContentStore::new("abc");
        assert_eq!(store.spliced(TextRange::new(1, 2), "Z"), "aZc");
        assert_eq!(store.spliced(TextRange::new(0, 0), "x"), "xabc");
        assert_eq!(store.spliced(TextRange::new(3, 3), "!"), "abc!");
        assert_eq!(store.get_content(), "abc");
    }
}
