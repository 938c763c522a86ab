//! Line splitting.

use crate::content::TextRange;
use serde::Serialize;

/// One line of the split buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Raw line text, without the trailing `\n`.
    pub content: String,
    /// 1-based position in the buffer; `0` is the empty sentinel line.
    pub idx: usize,
    /// Absolute char offset of the line's first character.
    pub start: usize,
}

impl Line {
    /// Length of the line in `char`s.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Absolute char range covered by this line (excluding the line break).
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.start + self.char_len())
    }

    /// Translate a line-relative range into an absolute buffer range.
    pub fn absolute(&self, range: TextRange) -> TextRange {
        TextRange::new(self.start + range.start, self.start + range.end)
    }

    /// Returns `true` for the idx-0 sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.idx == 0
    }
}

/// Split `text` into lines, preceded by the empty sentinel line at idx 0.
///
/// `str::split('\n')` keeps trailing empty segments (N newlines => N+1 lines), so every char of
/// the buffer belongs to exactly one line or one separator.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = vec![Line {
        content: String::new(),
        idx: 0,
        start: 0,
    }];
    let mut start = 0;
    for (i, content) in text.split('\n').enumerate() {
        let len = content.chars().count();
        lines.push(Line {
            content: content.to_string(),
            idx: i + 1,
            start,
        });
        start += len + 1;
    }
    lines
}
