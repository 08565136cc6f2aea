//! Property-based tests for buffer, selection, undo and folding invariants.
//!
//! Uses proptest to verify laws that must hold across all valid inputs.

use doctext::{
    CursorLocation, Editor, FlowGrid, FlowStyle, LineEnding, SelectionInfo, TextBuffer, TextFile,
    TextView, ViewState,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Multi-line text without carriage returns.
fn document() -> impl Strategy<Value = String> {
    "[a-z0-9 \t{}();\n]{0,80}"
}

/// Short indented source-like documents.
fn indented_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (0usize..4, prop::sample::select(vec!["x", "fn f()", "}", "", "let y = 2;", ")"])),
        1..30,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(depth, text)| format!("{}{text}", "    ".repeat(depth)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn insertion() -> impl Strategy<Value = String> {
    "[A-Z\n]{0,20}"
}

/// Clamp arbitrary indices into a valid location of `buffer`.
fn location(buffer: &TextBuffer, row: usize, col: usize) -> CursorLocation {
    let row = row % buffer.len_lines();
    let col = col % (buffer.line(row).len() + 1);
    CursorLocation::new(row, col)
}

// ============================================================================
// Encoding
// ============================================================================

proptest! {
    /// Decoding then encoding with Unix endings reproduces the text.
    #[test]
    fn utf8_roundtrip(text in document()) {
        let buffer = TextBuffer::with_text(&text);
        prop_assert_eq!(buffer.to_utf8(LineEnding::Unix), text);
    }

    /// Line count is one more than the number of newlines.
    #[test]
    fn line_count_matches_newlines(text in document()) {
        let buffer = TextBuffer::with_text(&text);
        prop_assert_eq!(buffer.len_lines(), text.matches('\n').count() + 1);
    }
}

// ============================================================================
// Cursor arithmetic
// ============================================================================

proptest! {
    /// move_left and move_right are inverse away from the buffer ends.
    #[test]
    fn motion_is_invertible(text in document(), row in 0usize..100, col in 0usize..100) {
        let buffer = TextBuffer::with_text(&text);
        let cl = location(&buffer, row, col);
        if buffer.can_move_left(cl) {
            prop_assert_eq!(buffer.move_right(buffer.move_left(cl)), cl);
        }
        if buffer.can_move_right(cl) {
            prop_assert_eq!(buffer.move_left(buffer.move_right(cl)), cl);
        }
    }

    /// fix always yields a location check accepts.
    #[test]
    fn fix_is_valid(text in document(), row in 0usize..200, col in 0usize..200) {
        let buffer = TextBuffer::with_text(&text);
        let fixed = buffer.fix(CursorLocation::new(row, col));
        prop_assert!(buffer.check(fixed));
    }

    /// Selections are normalized whatever the endpoint order.
    #[test]
    fn selection_is_normalized(
        r1 in 0usize..50, c1 in 0usize..50, r2 in 0usize..50, c2 in 0usize..50,
    ) {
        let a = CursorLocation::new(r1, c1);
        let b = CursorLocation::new(r2, c2);
        let si = SelectionInfo::from_endpoints(a, b);
        prop_assert!(si.row_start <= si.row_end);
        if si.row_start == si.row_end {
            prop_assert!(si.col_start <= si.col_end);
        }
        prop_assert!(si.lines_start <= si.lines_end);
        prop_assert_eq!(si.forwards, a <= b);
        let reversed = SelectionInfo::from_endpoints(b, a);
        prop_assert_eq!((si.start(), si.end()), (reversed.start(), reversed.end()));
    }
}

// ============================================================================
// Editing and undo
// ============================================================================

proptest! {
    /// Inserting text with N newlines adds exactly N lines.
    #[test]
    fn insert_grows_by_newlines(
        text in document(), extra in insertion(), row in 0usize..100, col in 0usize..100,
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let before = buffer.len_lines();
        let at = location(&buffer, row, col);
        Editor::new(&mut buffer, None, at).insert_text(at, &extra);
        prop_assert_eq!(buffer.len_lines(), before + extra.matches('\n').count());
    }

    /// One undo reverts an insert exactly, cursor included.
    #[test]
    fn undo_reverts_insert(
        text in document(), extra in insertion(), row in 0usize..100, col in 0usize..100,
    ) {
        let mut file = TextFile::with_text(&text);
        let at = location(file.buffer(), row, col);
        {
            let (buffer, journal) = file.parts_mut();
            Editor::new(buffer, Some(journal), at).insert_text(at, &extra);
        }
        if extra.is_empty() {
            prop_assert_eq!(file.undo(), None);
        } else {
            prop_assert_eq!(file.undo(), Some(at));
        }
        prop_assert_eq!(file.buffer().to_string(), text);
        prop_assert!(!file.has_unsaved_edits());
    }

    /// One undo reverts a removal between any two locations.
    #[test]
    fn undo_reverts_remove(
        text in document(),
        r1 in 0usize..100, c1 in 0usize..100, r2 in 0usize..100, c2 in 0usize..100,
    ) {
        let mut file = TextFile::with_text(&text);
        let a = location(file.buffer(), r1, c1);
        let b = location(file.buffer(), r2, c2);
        {
            let (buffer, journal) = file.parts_mut();
            Editor::new(buffer, Some(journal), a).remove_text(a, b);
        }
        file.undo();
        prop_assert_eq!(file.buffer().to_string(), text);
    }

    /// Paste then undo through a view restores text and cursor.
    #[test]
    fn view_paste_undo(text in document(), extra in insertion(), row in 0usize..100, col in 0usize..100) {
        let mut file = TextFile::with_text(&text);
        let at = location(file.buffer(), row, col);
        let (buffer, journal) = file.parts_mut();
        let mut view = TextView::with_state(buffer, ViewState::new(at)).journal(journal);
        view.paste(&extra);
        view.undo();
        prop_assert_eq!(view.buffer().to_string(), text);
        prop_assert_eq!(view.cursor(), at);
    }
}

// ============================================================================
// Folding and layout
// ============================================================================

proptest! {
    /// After fold the cursor row is visible and no short folded run remains.
    #[test]
    fn fold_invariant(text in indented_document(), row in 0usize..100) {
        let mut buffer = TextBuffer::with_text(&text);
        let cursor = location(&buffer, row, 0);
        let last = buffer.len_lines() - 1;
        let mut view = TextView::with_state(&mut buffer, ViewState::new(cursor));
        view.fold(0, last);
        prop_assert_eq!(view.cursor(), cursor);

        prop_assert!(!buffer.line(cursor.row).is_folded());
        let folded: Vec<usize> = (0..buffer.len_lines())
            .filter(|&r| buffer.line(r).is_folded())
            .collect();
        for run in folded.chunk_by(|a, b| b - a == 1) {
            prop_assert!(run.len() >= 3, "short folded run {:?}", run);
        }
    }

    /// Without wrap the layout is as wide as the widest line and as tall as
    /// the sum of row heights.
    #[test]
    fn flow_geometry_without_wrap(text in indented_document(), fold_from in 0usize..30) {
        let mut buffer = TextBuffer::with_text(&text);
        for row in fold_from..buffer.len_lines() {
            buffer.line_mut(row).set_folded(true);
        }
        let style = FlowStyle::default().x_width(7).tab_width(28).line_height(12).folded_line_height(3);
        let mut grid = FlowGrid::new(style);
        grid.reflow(&buffer);

        let widest = buffer.lines().map(|l| l.len() as i32 * 7).max().unwrap_or(0);
        let height: i32 = buffer
            .lines()
            .map(|l| if l.is_folded() { 3 } else { 12 })
            .sum();
        prop_assert_eq!(grid.output_width(), widest);
        prop_assert_eq!(grid.output_height(), height);
    }
}
