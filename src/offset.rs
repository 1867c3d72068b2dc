//! Byte, character, and UTF-16 offset conversion.
//!
//! Spans produced by the annotator are byte offsets into the source, which
//! is what slicing a Rust `&str` needs. Editors count differently:
//!
//! ```text
//! Text:   "Zoë met 🙂 Ann"
//!
//!          Z  o  ë  ␠  m  e  t  ␠  🙂 ␠  A  n  n
//! byte     0  1  2  4  5  6  7  8  9  13 14 15 16
//! char     0  1  2  3  4  5  6  7  8  9  10 11 12
//! utf16    0  1  2  3  4  5  6  7  8  10 11 12 13
//! ```
//!
//! A browser overlay positions highlights in UTF-16 code units (JS string
//! indices); most other tools count characters. [`TextSpan`] carries all
//! three so a span can be handed to either without re-deriving it.

use rapport_core::Span;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A span in all three coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    /// Byte offset (start, inclusive)
    pub byte_start: usize,
    /// Byte offset (end, exclusive)
    pub byte_end: usize,
    /// Character offset (start, inclusive)
    pub char_start: usize,
    /// Character offset (end, exclusive)
    pub char_end: usize,
    /// UTF-16 code unit offset (start, inclusive)
    pub utf16_start: usize,
    /// UTF-16 code unit offset (end, exclusive)
    pub utf16_end: usize,
}

impl TextSpan {
    /// Span from byte offsets, computing the rest from `text`.
    ///
    /// ```
    /// use rapport::offset::TextSpan;
    ///
    /// let text = "Zoë met Ann";
    /// let span = TextSpan::from_bytes(text, 9, 12); // "Ann"
    /// assert_eq!(span.char_range(), 8..11);
    /// ```
    #[must_use]
    pub fn from_bytes(text: &str, byte_start: usize, byte_end: usize) -> Self {
        SpanConverter::new(text).from_bytes(byte_start, byte_end)
    }

    /// Span for ASCII text, where all three systems agree.
    #[must_use]
    pub const fn ascii(start: usize, end: usize) -> Self {
        Self {
            byte_start: start,
            byte_end: end,
            char_start: start,
            char_end: end,
            utf16_start: start,
            utf16_end: end,
        }
    }

    /// Byte range, for slicing.
    #[must_use]
    pub const fn byte_range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    /// Character range.
    #[must_use]
    pub const fn char_range(&self) -> Range<usize> {
        self.char_start..self.char_end
    }

    /// UTF-16 range.
    #[must_use]
    pub const fn utf16_range(&self) -> Range<usize> {
        self.utf16_start..self.utf16_end
    }

    /// Length in characters.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.byte_start >= self.byte_end
    }
}

/// Convert byte offsets to character offsets.
///
/// Offsets past the end clamp to the character count.
#[must_use]
pub fn bytes_to_chars(text: &str, byte_start: usize, byte_end: usize) -> (usize, usize) {
    let conv = SpanConverter::new(text);
    (conv.byte_to_char(byte_start), conv.byte_to_char(byte_end))
}

/// Convert character offsets to byte offsets.
///
/// Offsets past the end clamp to the byte length.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let conv = SpanConverter::new(text);
    (conv.char_to_byte(char_start), conv.char_to_byte(char_end))
}

/// Converter for many spans over the same text.
///
/// Built once per text; each lookup is a binary search.
#[derive(Debug, Clone)]
pub struct SpanConverter {
    /// (byte offset, utf16 offset) at every char boundary, including the end.
    /// Empty for ASCII text.
    boundaries: Vec<(usize, usize)>,
    len: usize,
}

impl SpanConverter {
    /// Create a converter for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                boundaries: Vec::new(),
                len: text.len(),
            };
        }
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        let mut utf16 = 0;
        for (byte, c) in text.char_indices() {
            boundaries.push((byte, utf16));
            utf16 += c.len_utf16();
        }
        boundaries.push((text.len(), utf16));
        Self {
            boundaries,
            len: text.len(),
        }
    }

    /// Whether the text is ASCII (all conversions are identity).
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Character index of the boundary at or before `byte`.
    #[must_use]
    pub fn byte_to_char(&self, byte: usize) -> usize {
        if self.is_ascii() {
            return byte.min(self.len);
        }
        self.boundaries
            .partition_point(|&(b, _)| b <= byte)
            .saturating_sub(1)
    }

    /// Byte offset of character `char_idx`.
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        if self.is_ascii() {
            return char_idx.min(self.len);
        }
        self.boundaries
            .get(char_idx)
            .map_or(self.len, |&(b, _)| b)
    }

    /// UTF-16 offset of the boundary at or before `byte`.
    #[must_use]
    pub fn byte_to_utf16(&self, byte: usize) -> usize {
        if self.is_ascii() {
            return byte.min(self.len);
        }
        let i = self.byte_to_char(byte);
        self.boundaries[i].1
    }

    /// Byte offset for a UTF-16 offset.
    ///
    /// An offset between the two halves of a surrogate pair maps to the
    /// start of that character.
    #[must_use]
    pub fn utf16_to_byte(&self, utf16: usize) -> usize {
        if self.is_ascii() {
            return utf16.min(self.len);
        }
        let i = self
            .boundaries
            .partition_point(|&(_, u)| u <= utf16)
            .saturating_sub(1);
        self.boundaries[i].0
    }

    /// Convert a byte range.
    #[must_use]
    pub fn from_bytes(&self, byte_start: usize, byte_end: usize) -> TextSpan {
        if self.is_ascii() {
            let (s, e) = (byte_start.min(self.len), byte_end.min(self.len));
            return TextSpan::ascii(s, e);
        }
        TextSpan {
            byte_start,
            byte_end,
            char_start: self.byte_to_char(byte_start),
            char_end: self.byte_to_char(byte_end),
            utf16_start: self.byte_to_utf16(byte_start),
            utf16_end: self.byte_to_utf16(byte_end),
        }
    }

    /// Convert a UTF-16 range, as reported by a browser selection.
    #[must_use]
    pub fn from_utf16(&self, utf16_start: usize, utf16_end: usize) -> TextSpan {
        self.from_bytes(self.utf16_to_byte(utf16_start), self.utf16_to_byte(utf16_end))
    }

    /// Convert an annotator span.
    #[must_use]
    pub fn span(&self, span: &Span) -> TextSpan {
        self.from_bytes(span.start, span.end)
    }
}
