//! Undo scenarios driven through the public editing API.
//!
//! Every scenario checks that one undo step restores both the text and the
//! cursor the operation started from.

use doctext::{CursorLocation, Editor, SearchSettings, TextBuffer, TextFile, TextView, UndoJournal};

const BASE: &str = "abcd\nefgh";

fn journaled(text: &str) -> (TextBuffer, UndoJournal) {
    let mut journal = UndoJournal::new();
    journal.add_save_point();
    (TextBuffer::with_text(text), journal)
}

// ============================================================================
// Editor primitives
// ============================================================================

mod primitives {
    use super::*;

    #[test]
    fn single_line_insert_reverts() {
        let (mut buffer, mut journal) = journaled(BASE);
        let at = CursorLocation::new(0, 2);
        Editor::new(&mut buffer, Some(&mut journal), at).insert_text(at, "POLITIKA");
        assert_eq!(buffer.to_string(), "abPOLITIKAcd\nefgh");

        assert_eq!(journal.undo(&mut buffer), Some(at));
        assert_eq!(buffer.to_string(), BASE);
    }

    #[test]
    fn multi_line_insert_reverts() {
        let (mut buffer, mut journal) = journaled(BASE);
        let at = CursorLocation::new(0, 2);
        Editor::new(&mut buffer, Some(&mut journal), at).insert_text(at, "PO\nLIT\nIKA");
        assert_eq!(buffer.len_lines(), 4);

        assert_eq!(journal.undo(&mut buffer), Some(at));
        assert_eq!(buffer.to_string(), BASE);
        assert_eq!(buffer.len_lines(), 2);
    }

    #[test]
    fn remove_across_rows_restores_start_cursor() {
        let (mut buffer, mut journal) = journaled(BASE);
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), CursorLocation::new(1, 1));
        editor.remove_text(CursorLocation::new(0, 2), CursorLocation::new(1, 3));
        assert_eq!(editor.end_location(), CursorLocation::new(0, 2));
        assert_eq!(buffer.to_string(), "abh");

        assert_eq!(journal.undo(&mut buffer), Some(CursorLocation::new(1, 1)));
        assert_eq!(buffer.to_string(), BASE);
    }

    #[test]
    fn compound_edit_is_one_step() {
        let (mut buffer, mut journal) = journaled(BASE);
        let start = CursorLocation::new(0, 1);
        let mut editor = Editor::new(&mut buffer, Some(&mut journal), start);
        editor.remove_text(CursorLocation::new(0, 1), CursorLocation::new(1, 1));
        editor.insert_text(CursorLocation::new(0, 1), "XY\nZ");
        assert_eq!(buffer.to_string(), "aXY\nZfgh");

        assert_eq!(journal.undo(&mut buffer), Some(start));
        assert_eq!(buffer.to_string(), BASE);
        // Only the save point is left.
        assert_eq!(journal.undo(&mut buffer), None);
    }

    #[test]
    fn separate_activities_undo_separately() {
        let (mut buffer, mut journal) = journaled("x");
        let end = CursorLocation::new(0, 1);
        Editor::new(&mut buffer, Some(&mut journal), end).insert_char(end, 'y');
        let end = CursorLocation::new(0, 2);
        Editor::new(&mut buffer, Some(&mut journal), end).insert_char(end, '\n');
        assert_eq!(buffer.to_string(), "xy\n");

        assert_eq!(journal.undo(&mut buffer), Some(CursorLocation::new(0, 2)));
        assert_eq!(buffer.to_string(), "xy");
        assert_eq!(journal.undo(&mut buffer), Some(CursorLocation::new(0, 1)));
        assert_eq!(buffer.to_string(), "x");
    }

    #[test]
    fn edits_without_journal_are_permanent() {
        let mut buffer = TextBuffer::with_text(BASE);
        let at = CursorLocation::new(1, 0);
        Editor::new(&mut buffer, None, at).insert_text(at, ">> ");
        assert_eq!(buffer.to_string(), "abcd\n>> efgh");
    }

    #[test]
    fn invalid_location_is_skipped() {
        let (mut buffer, mut journal) = journaled(BASE);
        let bad = CursorLocation::new(7, 0);
        Editor::new(&mut buffer, Some(&mut journal), bad).insert_text(bad, "lost");
        assert_eq!(buffer.to_string(), BASE);
        assert_eq!(journal.undo(&mut buffer), None);
    }
}

// ============================================================================
// Save points
// ============================================================================

mod save_points {
    use super::*;

    #[test]
    fn save_marks_clean_and_undo_marks_dirty() {
        let mut file = TextFile::with_text(BASE);
        assert!(!file.has_unsaved_edits());

        {
            let (buffer, journal) = file.parts_mut();
            let mut view = TextView::new(buffer).journal(journal);
            view.paste("!");
        }
        assert!(file.has_unsaved_edits());

        let mut sink = Vec::new();
        file.save_to(&mut sink, false).unwrap();
        assert_eq!(sink, b"!abcd\nefgh");
        assert!(!file.has_unsaved_edits());

        assert_eq!(file.undo(), Some(CursorLocation::new(0, 0)));
        assert_eq!(file.buffer().to_string(), BASE);
        assert!(file.has_unsaved_edits());
    }

    #[test]
    fn fresh_file_has_nothing_to_undo() {
        let mut file = TextFile::with_text(BASE);
        assert_eq!(file.undo(), None);
        assert_eq!(file.buffer().to_string(), BASE);
    }
}

// ============================================================================
// View operations
// ============================================================================

mod view_operations {
    use super::*;

    #[test]
    fn replace_all_is_one_step() {
        let mut file = TextFile::with_text("foo bar\nfoo\nbaz foo");
        let (buffer, journal) = file.parts_mut();
        let mut view = TextView::new(buffer).journal(journal);
        let count = view.replace_all("foo", SearchSettings::empty(), "qux");
        assert_eq!(count, 3);
        assert_eq!(view.buffer().to_string(), "qux bar\nqux\nbaz qux");

        assert!(view.undo());
        assert_eq!(view.buffer().to_string(), "foo bar\nfoo\nbaz foo");
        assert!(!view.undo());
    }

    #[test]
    fn undo_clears_selection() {
        let mut file = TextFile::with_text(BASE);
        let (buffer, journal) = file.parts_mut();
        let mut view = TextView::new(buffer).journal(journal);
        view.paste("123");
        view.select_all();
        assert!(view.selection().is_some());

        assert!(view.undo());
        assert!(view.selection().is_none());
        assert_eq!(view.cursor(), CursorLocation::new(0, 0));
    }

    #[test]
    fn typed_characters_undo_one_at_a_time() {
        let mut file = TextFile::with_text("");
        let (buffer, journal) = file.parts_mut();
        let mut view = TextView::new(buffer).journal(journal);
        for c in "hey".chars() {
            view.insert_char(c);
        }
        assert!(view.undo());
        assert_eq!(view.buffer().to_string(), "he");
        assert_eq!(view.cursor(), CursorLocation::new(0, 2));
    }
}
