use std::fmt;

use xi_rope::Rope;

/// Text content of an inline span.
///
/// Backed by an `xi_rope::Rope` so that snapshots taken by the record are
/// cheap clones. All offsets on this type are character offsets; byte offsets
/// never leak out.
#[derive(Clone)]
pub struct Text(Rope);

impl Text {
    pub fn new(content: &str) -> Self {
        Self(Rope::from(content))
    }

    /// Number of characters in the span
    pub fn char_len(&self) -> usize {
        self.0
            .iter_chunks(0..self.0.len())
            .map(|chunk| chunk.chars().count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// Insert `content` at character offset `at` (clamped to the end)
    pub fn insert(&mut self, at: usize, content: &str) {
        let byte = self.byte_offset(at);
        self.0.edit(byte..byte, content);
    }

    /// Delete the characters in `start..end` (clamped to the span)
    pub fn delete(&mut self, start: usize, end: usize) {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end).max(start);
        if start < end {
            self.0.edit(start..end, "");
        }
    }

    /// Split at character offset `at`, keeping the head and returning the tail
    pub fn split_off(&mut self, at: usize) -> Text {
        let byte = self.byte_offset(at);
        let len = self.0.len();
        let tail = Text::new(&self.0.slice_to_cow(byte..len));
        if byte < len {
            self.0.edit(byte..len, "");
        }
        tail
    }

    pub fn push_str(&mut self, content: &str) {
        let len = self.0.len();
        self.0.edit(len..len, content);
    }

    fn as_cow(&self) -> std::borrow::Cow<'_, str> {
        self.0.slice_to_cow(0..self.0.len())
    }

    /// Walks the rope's leaf chunks; offsets past the end clamp to the length
    fn byte_offset(&self, char_offset: usize) -> usize {
        let mut remaining = char_offset;
        let mut base = 0;
        for chunk in self.0.iter_chunks(0..self.0.len()) {
            if let Some((byte, _)) = chunk.char_indices().nth(remaining) {
                return base + byte;
            }
            remaining -= chunk.chars().count();
            base += chunk.len();
        }
        self.0.len()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cow())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text({:?})", self.as_cow())
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.as_cow() == other.as_cow()
    }
}

impl Eq for Text {}

impl From<&str> for Text {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}
