use serde::{Deserialize, Serialize};

/// Half-open byte range into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// True when the two spans share at least one byte.
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The source text covered by this span.
    ///
    /// Returns `None` when the span falls outside `source` or cuts a UTF-8
    /// character in half.
    pub fn slice(self, source: &str) -> Option<&str> {
        if self.end < self.start {
            return None;
        }
        source.get(self.start..self.end)
    }
}
