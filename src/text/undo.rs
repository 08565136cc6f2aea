//! Append-only journal of reversible line edits.
//!
//! Every entry carries the [`ActivityId`] of the user operation that produced
//! it. [`UndoJournal::undo`] reverts the most recent activity as a whole, so a
//! paste spanning five lines comes back in one step.
//!
//! Save points mark the journal state matching the file on disk. The journal
//! keeps at most one: recording a new save point drops the older ones.

use super::{CursorLocation, TextBuffer};

/// Identifier shared by all entries of one logical operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityId(u64);

impl ActivityId {
    /// Activity used by edits that are not journaled.
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What an entry restores when undone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UndoKind {
    /// Line `row` had `text` before it was changed.
    ChangeLine { row: usize, text: String },
    /// Line `row` was inserted.
    InsertLine { row: usize },
    /// Line `row` held `text` before it was removed.
    RemoveLine { row: usize, text: String },
    /// The buffer matched the saved file here.
    SavePoint,
}

/// One journal record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoEntry {
    pub kind: UndoKind,
    pub activity: ActivityId,
    /// Cursor to restore when this entry is reverted.
    pub cursor_before: CursorLocation,
}

impl UndoEntry {
    #[must_use]
    pub fn is_save_point(&self) -> bool {
        matches!(self.kind, UndoKind::SavePoint)
    }
}

/// Undo log owned by one editable file.
#[derive(Clone, Debug, Default)]
pub struct UndoJournal {
    entries: Vec<UndoEntry>,
    counter: u64,
}

impl UndoJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh activity id.
    pub fn new_activity(&mut self) -> ActivityId {
        self.counter += 1;
        ActivityId(self.counter)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    /// Record the content of `row` before it changes.
    pub fn add_change_line(
        &mut self,
        activity: ActivityId,
        row: usize,
        text: String,
        cursor_before: CursorLocation,
    ) {
        self.push(UndoKind::ChangeLine { row, text }, activity, cursor_before);
    }

    /// Record that `row` was inserted.
    pub fn add_insert_line(&mut self, activity: ActivityId, row: usize, cursor_before: CursorLocation) {
        self.push(UndoKind::InsertLine { row }, activity, cursor_before);
    }

    /// Record the content of `row` before it is removed.
    pub fn add_remove_line(
        &mut self,
        activity: ActivityId,
        row: usize,
        text: String,
        cursor_before: CursorLocation,
    ) {
        self.push(UndoKind::RemoveLine { row, text }, activity, cursor_before);
    }

    /// Mark the current state as saved, replacing any older save point.
    pub fn add_save_point(&mut self) {
        self.entries.retain(|e| !e.is_save_point());
        self.push(UndoKind::SavePoint, ActivityId::NONE, CursorLocation::default());
    }

    /// Whether the newest entry is a save point.
    #[must_use]
    pub fn is_save_point(&self) -> bool {
        self.entries.last().is_some_and(UndoEntry::is_save_point)
    }

    fn push(&mut self, kind: UndoKind, activity: ActivityId, cursor_before: CursorLocation) {
        self.entries.push(UndoEntry {
            kind,
            activity,
            cursor_before,
        });
    }

    /// Revert the newest activity on `buffer`.
    ///
    /// Returns the cursor the activity started from, or `None` when there is
    /// nothing left to undo. The bootstrap save point is never consumed.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Option<CursorLocation> {
        if self.entries.is_empty() {
            return None;
        }
        if self.entries.len() == 1 && self.is_save_point() {
            return None;
        }

        while self.is_save_point() {
            self.entries.pop();
        }
        let activity = self.entries.last()?.activity;

        let mut cursor = None;
        while self.entries.last().is_some_and(|e| e.activity == activity) {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            match entry.kind {
                UndoKind::ChangeLine { row, text } => {
                    let line = buffer.line_mut(row);
                    line.truncate(0);
                    line.append_str(&text, 0);
                }
                UndoKind::InsertLine { row } => buffer.remove_line(row),
                UndoKind::RemoveLine { row, text } => {
                    buffer.insert_line(row).append_str(&text, 0);
                }
                UndoKind::SavePoint => {
                    tracing::warn!("unexpected save point inside an undo group");
                }
            }
            cursor = Some(entry.cursor_before);
        }

        tracing::trace!(activity = activity.get(), remaining = self.entries.len(), "undo");
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cl(row: usize, col: usize) -> CursorLocation {
        CursorLocation::new(row, col)
    }

    #[test]
    fn test_activity_ids_increase() {
        let mut journal = UndoJournal::new();
        let a = journal.new_activity();
        let b = journal.new_activity();
        assert!(b > a);
        assert_ne!(a, ActivityId::NONE);
    }

    #[test]
    fn test_undo_empty_and_bootstrap() {
        let mut buffer = TextBuffer::with_text("x");
        let mut journal = UndoJournal::new();
        assert_eq!(journal.undo(&mut buffer), None);

        journal.add_save_point();
        assert_eq!(journal.undo(&mut buffer), None);
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn test_undo_reverts_whole_group() {
        let mut buffer = TextBuffer::with_text("abc\ndef");
        let mut journal = UndoJournal::new();
        journal.add_save_point();

        // Simulate joining the two lines under one activity.
        let id = journal.new_activity();
        journal.add_remove_line(id, 1, buffer.line(1).to_string(), cl(0, 3));
        buffer.remove_line(1);
        journal.add_change_line(id, 0, buffer.line(0).to_string(), cl(0, 3));
        buffer.line_mut(0).append_str("def", 0);
        assert_eq!(buffer.to_string(), "abcdef");
        assert!(!journal.is_save_point());

        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 3)));
        assert_eq!(buffer.to_string(), "abc\ndef");
        assert!(journal.is_save_point());
        assert_eq!(journal.undo(&mut buffer), None);
    }

    #[test]
    fn test_save_point_replaces_older_ones() {
        let mut buffer = TextBuffer::with_text("a");
        let mut journal = UndoJournal::new();
        journal.add_save_point();

        let id = journal.new_activity();
        journal.add_change_line(id, 0, "a".to_string(), cl(0, 1));
        buffer.line_mut(0).append_char('b', 0);
        journal.add_save_point();

        assert_eq!(journal.entries().iter().filter(|e| e.is_save_point()).count(), 1);
        assert!(journal.is_save_point());

        // Undo crosses the trailing save point and reverts the edit.
        assert_eq!(journal.undo(&mut buffer), Some(cl(0, 1)));
        assert_eq!(buffer.to_string(), "a");
        assert!(!journal.is_save_point());
    }
}
