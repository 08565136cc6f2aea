//! Cursor positions and normalized selection ranges.

use std::fmt;

/// A position in a [`TextBuffer`](super::TextBuffer).
///
/// Ordered row-major, then by column. `col == line.len()` is the virtual
/// end-of-line position where the implicit newline sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorLocation {
    /// Line index (0-indexed).
    pub row: usize,
    /// Character index within the line (0-indexed).
    pub col: usize,
}

impl CursorLocation {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CursorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for CursorLocation {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A selection normalized so that `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionInfo {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
    /// First row touched by per-line actions (indent, comment).
    pub lines_start: usize,
    /// Last row touched by per-line actions. A selection ending at column 0
    /// does not include that row.
    pub lines_end: usize,
    /// True when the live cursor sits at the end of the range.
    pub forwards: bool,
}

impl SelectionInfo {
    /// Normalize an anchor and a live cursor into a selection.
    #[must_use]
    pub fn from_endpoints(anchor: CursorLocation, cursor: CursorLocation) -> Self {
        let forwards = anchor <= cursor;
        let (start, end) = if forwards {
            (anchor, cursor)
        } else {
            (cursor, anchor)
        };
        let (col_start, col_end) = (start.col, end.col);

        let mut lines_end = end.row;
        if col_end == 0 && end.row > start.row {
            lines_end -= 1;
        }

        Self {
            row_start: start.row,
            col_start,
            row_end: end.row,
            col_end,
            lines_start: start.row,
            lines_end,
            forwards,
        }
    }

    #[must_use]
    pub fn start(&self) -> CursorLocation {
        CursorLocation::new(self.row_start, self.col_start)
    }

    #[must_use]
    pub fn end(&self) -> CursorLocation {
        CursorLocation::new(self.row_end, self.col_end)
    }

    /// Whether the selection spans no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Whether `cl` lies inside the half-open range `[start, end)`.
    #[must_use]
    pub fn contains(&self, cl: CursorLocation) -> bool {
        self.start() <= cl && cl < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_ordering() {
        let a = CursorLocation::new(0, 5);
        let b = CursorLocation::new(1, 0);
        let c = CursorLocation::new(1, 3);
        assert!(a < b);
        assert!(b < c);
        assert!(c > a);
        assert_eq!(CursorLocation::from((1, 3)), c);
        assert_eq!(c.to_string(), "(1, 3)");
    }

    #[test]
    fn test_selection_forwards() {
        let si = SelectionInfo::from_endpoints(CursorLocation::new(1, 4), CursorLocation::new(3, 2));
        assert_eq!(si.start(), CursorLocation::new(1, 4));
        assert_eq!(si.end(), CursorLocation::new(3, 2));
        assert!(si.forwards);
        assert_eq!((si.lines_start, si.lines_end), (1, 3));
    }

    #[test]
    fn test_selection_backwards() {
        let si = SelectionInfo::from_endpoints(CursorLocation::new(3, 2), CursorLocation::new(1, 4));
        assert_eq!(si.start(), CursorLocation::new(1, 4));
        assert_eq!(si.end(), CursorLocation::new(3, 2));
        assert!(!si.forwards);
    }

    #[test]
    fn test_selection_same_row_swaps_columns() {
        let si = SelectionInfo::from_endpoints(CursorLocation::new(2, 7), CursorLocation::new(2, 1));
        assert_eq!((si.col_start, si.col_end), (1, 7));
        assert!(!si.forwards);

        let si = SelectionInfo::from_endpoints(CursorLocation::new(2, 1), CursorLocation::new(2, 7));
        assert_eq!((si.col_start, si.col_end), (1, 7));
        assert!(si.forwards);
    }

    #[test]
    fn test_selection_lines_end_excludes_column_zero() {
        let si = SelectionInfo::from_endpoints(CursorLocation::new(0, 3), CursorLocation::new(2, 0));
        assert_eq!(si.lines_end, 1);
        assert!(si.contains(CursorLocation::new(1, 9)));
        assert!(!si.contains(CursorLocation::new(2, 0)));
    }
}
