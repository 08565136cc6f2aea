//! Search options and results.

use bitflags::bitflags;

use super::CursorLocation;

bitflags! {
    /// Options for substring search.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SearchSettings: u8 {
        /// Reject matches touching a letter, digit or underscore on either side.
        const WHOLE_WORD = 0b0000_0001;
        /// Compare characters after simple case folding.
        const CASE_INSENSITIVE = 0b0000_0010;
    }
}

/// One match of a search term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub row: usize,
    pub col: usize,
    /// Match length in characters.
    pub size: usize,
}

impl SearchResult {
    #[must_use]
    pub const fn new(row: usize, col: usize, size: usize) -> Self {
        Self { row, col, size }
    }

    #[must_use]
    pub const fn start(&self) -> CursorLocation {
        CursorLocation::new(self.row, self.col)
    }

    /// Position just past the match. Matches never span lines.
    #[must_use]
    pub const fn end(&self) -> CursorLocation {
        CursorLocation::new(self.row, self.col + self.size)
    }
}
