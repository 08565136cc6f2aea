//! Journaled mutation of a [`TextBuffer`].
//!
//! An [`Editor`] is created for one logical operation. When it has a journal
//! it mints a single activity id up front and records the prior state of each
//! touched line before mutating it, so the whole operation undoes as one step.
//!
//! # Examples
//!
//! ```
//! use doctext::{CursorLocation, Editor, TextBuffer, UndoJournal};
//!
//! let mut buffer = TextBuffer::with_text("abcd\nefgh");
//! let mut journal = UndoJournal::new();
//! journal.add_save_point();
//!
//! let start = CursorLocation::new(0, 2);
//! let mut editor = Editor::new(&mut buffer, Some(&mut journal), start);
//! editor.insert_text(start, "PO\nLIT\nIKA");
//! assert_eq!(editor.end_location(), CursorLocation::new(2, 3));
//! assert_eq!(buffer.to_string(), "abPO\nLIT\nIKAcd\nefgh");
//!
//! assert_eq!(journal.undo(&mut buffer), Some(start));
//! assert_eq!(buffer.to_string(), "abcd\nefgh");
//! ```

use super::undo::{ActivityId, UndoJournal};
use super::{CursorLocation, TextBuffer};

/// Scoped mutation façade over a buffer and an optional journal.
#[derive(Debug)]
pub struct Editor<'a> {
    buffer: &'a mut TextBuffer,
    journal: Option<&'a mut UndoJournal>,
    activity: ActivityId,
    start: CursorLocation,
    end: CursorLocation,
}

impl<'a> Editor<'a> {
    /// `start` is the cursor restored when this operation is undone.
    pub fn new(
        buffer: &'a mut TextBuffer,
        mut journal: Option<&'a mut UndoJournal>,
        start: CursorLocation,
    ) -> Self {
        let activity = journal
            .as_deref_mut()
            .map_or(ActivityId::NONE, UndoJournal::new_activity);
        Self {
            buffer,
            journal,
            activity,
            start,
            end: start,
        }
    }

    /// Read access to the buffer being edited.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        self.buffer
    }

    #[must_use]
    pub fn activity(&self) -> ActivityId {
        self.activity
    }

    /// Where the cursor belongs after the last primitive.
    #[must_use]
    pub fn end_location(&self) -> CursorLocation {
        self.end
    }

    fn record_change(&mut self, row: usize) {
        if let Some(journal) = self.journal.as_deref_mut() {
            let text = self.buffer.line(row).to_string();
            journal.add_change_line(self.activity, row, text, self.start);
        }
    }

    fn record_remove(&mut self, row: usize) {
        if let Some(journal) = self.journal.as_deref_mut() {
            let text = self.buffer.line(row).to_string();
            journal.add_remove_line(self.activity, row, text, self.start);
        }
    }

    fn record_insert(&mut self, row: usize) {
        if let Some(journal) = self.journal.as_deref_mut() {
            journal.add_insert_line(self.activity, row, self.start);
        }
    }

    fn valid(&self, cl: CursorLocation, op: &'static str) -> bool {
        let ok = self.buffer.check(cl);
        if !ok {
            tracing::error!(op, row = cl.row, col = cl.col, "invalid cursor location, edit skipped");
        }
        ok
    }

    /// Remove the character at `cl`; at the end of a line, join the next line.
    pub fn remove_char(&mut self, cl: CursorLocation) {
        if !self.valid(cl, "remove_char") {
            return;
        }

        if cl.col == self.buffer.line(cl.row).len() {
            if cl.row + 1 >= self.buffer.len_lines() {
                tracing::error!(row = cl.row, "remove_char past the end of the buffer");
                return;
            }
            let next = self.buffer.line(cl.row + 1).to_string();
            self.record_remove(cl.row + 1);
            self.buffer.remove_line(cl.row + 1);
            self.record_change(cl.row);
            self.buffer.line_mut(cl.row).append_str(&next, 0);
        } else {
            self.record_change(cl.row);
            self.buffer.line_mut(cl.row).remove(cl.col);
        }
        self.end = cl;
    }

    pub fn insert_char(&mut self, cl: CursorLocation, ch: char) {
        self.insert_char_with_markup(cl, ch, 0);
    }

    /// Insert one character; `'\n'` splits the line.
    pub fn insert_char_with_markup(&mut self, cl: CursorLocation, ch: char, markup: u8) {
        if !self.valid(cl, "insert_char") {
            return;
        }

        if ch == '\n' {
            let len = self.buffer.line(cl.row).len();
            let mut tail = String::new();
            if cl.col != len {
                self.record_change(cl.row);
                let line = self.buffer.line_mut(cl.row);
                tail = line.to_string_range(cl.col, len);
                line.truncate(cl.col);
            }
            self.buffer.insert_line(cl.row + 1).append_str(&tail, markup);
            self.record_insert(cl.row + 1);
            self.end = CursorLocation::new(cl.row + 1, 0);
        } else {
            self.record_change(cl.row);
            self.buffer.line_mut(cl.row).insert_char(cl.col, ch, markup);
            self.end = CursorLocation::new(cl.row, cl.col + 1);
        }
    }

    /// Remove everything between `cl1` and `cl2`, in either order.
    pub fn remove_text(&mut self, cl1: CursorLocation, cl2: CursorLocation) {
        if !self.valid(cl1, "remove_text") || !self.valid(cl2, "remove_text") {
            return;
        }
        if cl1 == cl2 {
            return;
        }
        let (from, to) = if cl1 > cl2 { (cl2, cl1) } else { (cl1, cl2) };

        self.record_change(from.row);
        if from.row == to.row {
            self.buffer.line_mut(from.row).remove_range(from.col, to.col);
        } else {
            let last = self.buffer.line(to.row);
            let tail = last.to_string_range(to.col, last.len());
            let first = self.buffer.line_mut(from.row);
            first.truncate(from.col);
            first.append_str(&tail, 0);
            // Descending so lower indices stay valid.
            for row in (from.row + 1..=to.row).rev() {
                self.record_remove(row);
                self.buffer.remove_line(row);
            }
        }
        self.end = from;
    }

    pub fn insert_text(&mut self, cl: CursorLocation, text: &str) {
        self.insert_text_with_markup(cl, text, 0);
    }

    /// Insert text that may contain newlines.
    pub fn insert_text_with_markup(&mut self, cl: CursorLocation, text: &str, markup: u8) {
        if !self.valid(cl, "insert_text") {
            return;
        }
        if text.is_empty() {
            return;
        }

        let pieces: Vec<&str> = text.split('\n').collect();
        self.record_change(cl.row);

        if let [single] = pieces.as_slice() {
            let line = self.buffer.line_mut(cl.row);
            line.insert_str(cl.col, single, markup);
            self.end = CursorLocation::new(cl.row, cl.col + single.chars().count());
            return;
        }

        let line = self.buffer.line_mut(cl.row);
        let tail = line.to_string_range(cl.col, line.len());
        line.truncate(cl.col);
        line.append_str(pieces[0], markup);

        let last = pieces.len() - 1;
        for (i, piece) in pieces.iter().enumerate().skip(1) {
            let row = cl.row + i;
            let new_line = self.buffer.insert_line(row);
            new_line.append_str(piece, markup);
            self.end = CursorLocation::new(row, new_line.len());
            if i == last {
                new_line.append_str(&tail, markup);
            }
            self.record_insert(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cl(row: usize, col: usize) -> CursorLocation {
        CursorLocation::new(row, col)
    }

    fn mini() -> (TextBuffer, UndoJournal) {
        let mut journal = UndoJournal::new();
        journal.add_save_point();
        (TextBuffer::with_text("abcd\nefgh"), journal)
    }

    #[test]
    fn test_insert_char() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 2));
        editor.insert_char(cl(0, 2), 'X');
        assert_eq!(editor.end_location(), cl(0, 3));
        assert_eq!(buffer.to_string(), "abXcd\nefgh");

        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 2)));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
    }

    #[test]
    fn test_insert_newline_splits() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 2));
        editor.insert_char(cl(0, 2), '\n');
        assert_eq!(editor.end_location(), cl(1, 0));
        assert_eq!(buffer.to_string(), "ab\ncd\nefgh");

        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 2)));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
    }

    #[test]
    fn test_insert_newline_at_end_of_line() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 4));
        editor.insert_char(cl(0, 4), '\n');
        assert_eq!(buffer.to_string(), "abcd\n\nefgh");
        // Only the inserted line is journaled.
        assert_eq!(journal.len(), 2);
        journal.undo(&mut buffer);
        assert_eq!(buffer.to_string(), "abcd\nefgh");
    }

    #[test]
    fn test_remove_char_and_join() {
        let (mut buffer, mut journal) = mini();
        Editor::new(&mut buffer, Some(&mut journal), cl(1, 0)).remove_char(cl(1, 0));
        assert_eq!(buffer.to_string(), "abcd\nfgh");

        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 4));
        editor.remove_char(cl(0, 4));
        assert_eq!(editor.end_location(), cl(0, 4));
        assert_eq!(buffer.to_string(), "abcdfgh");

        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 4)));
        assert_eq!(buffer.to_string(), "abcd\nfgh");
        assert_eq!(journal.undo(&mut buffer), Some(cl(1, 0)));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
        assert_eq!(journal.undo(&mut buffer), None);
    }

    #[test]
    fn test_remove_char_at_buffer_end_is_rejected() {
        let (mut buffer, mut journal) = mini();
        Editor::new(&mut buffer, Some(&mut journal), cl(1, 4)).remove_char(cl(1, 4));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn test_remove_text_across_lines() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(1, 1));
        editor.remove_text(cl(0, 2), cl(1, 3));
        assert_eq!(editor.end_location(), cl(0, 2));
        assert_eq!(buffer.to_string(), "abh");

        assert_eq!(journal.undo(&mut buffer), Some(cl(1, 1)));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
    }

    #[test]
    fn test_remove_text_reversed_endpoints() {
        let (mut buffer, _) = mini();
        Editor::new(&mut buffer, None, cl(0, 0)).remove_text(cl(1, 3), cl(0, 2));
        assert_eq!(buffer.to_string(), "abh");
    }

    #[test]
    fn test_insert_text_single_line() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 2));
        editor.insert_text(cl(0, 2), "POLITIKA");
        assert_eq!(editor.end_location(), cl(0, 10));
        assert_eq!(buffer.to_string(), "abPOLITIKAcd\nefgh");
        journal.undo(&mut buffer);
        assert_eq!(buffer.to_string(), "abcd\nefgh");
    }

    #[test]
    fn test_compound_edit_undoes_as_one_step() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 2));
        editor.remove_text(cl(0, 2), cl(1, 2));
        editor.insert_text(cl(0, 2), "foo\nbar\nbaz");
        assert_eq!(buffer.to_string(), "abfoo\nbar\nbazgh");

        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 2)));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
        assert!(journal.is_save_point());
    }

    #[test]
    fn test_invalid_location_is_ignored() {
        let (mut buffer, mut journal) = mini();
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), cl(0, 0));
        editor.insert_text(cl(5, 0), "zzz");
        editor.insert_char(cl(0, 9), 'z');
        editor.remove_text(cl(0, 0), cl(3, 0));
        assert_eq!(buffer.to_string(), "abcd\nefgh");
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn test_without_journal() {
        let mut buffer = TextBuffer::new();
        let mut editor = Editor::new(&mut buffer, None, CursorLocation::default());
        assert_eq!(editor.activity(), ActivityId::NONE);
        editor.insert_text(cl(0, 0), "a\nb");
        assert_eq!(editor.buffer().len_lines(), 2);
    }
}
