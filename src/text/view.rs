//! Cursor and selection state machine over a [`TextBuffer`].
//!
//! A [`TextView`] borrows a buffer (and optionally the file's
//! [`UndoJournal`]) for the duration of one or more user operations. All of
//! its persistent state lives in the small [`ViewState`] value, which the
//! owning document keeps between calls and hands back through
//! [`TextView::with_state`].
//!
//! Every mutation goes through an [`Editor`] created per operation, so one
//! keystroke, paste or indent of a whole selection is one undo step.
//!
//! # Selection
//!
//! Cursor-moving operations take a `shift` flag. Entering such an operation
//! with shift held and no selection drops the anchor at the cursor; entering
//! without shift clears the selection. When the operation finishes, a
//! selection whose anchor coincides with the cursor collapses.
//!
//! # Examples
//!
//! ```
//! use doctext::{CursorLocation, TextBuffer, TextView, UndoJournal};
//!
//! let mut buffer = TextBuffer::with_text("hello world");
//! let mut journal = UndoJournal::new();
//! journal.add_save_point();
//!
//! let mut view = TextView::new(&mut buffer).journal(&mut journal);
//! view.skip_right(true);
//! assert_eq!(view.copy(), "hello");
//! view.paste("goodbye");
//! assert_eq!(view.cursor(), CursorLocation::new(0, 7));
//! assert!(view.undo());
//! assert_eq!(view.buffer().to_string(), "hello world");
//! ```

use super::edit::Editor;
use super::flow::FlowGrid;
use super::undo::UndoJournal;
use super::{CursorLocation, SearchSettings, SelectionInfo, TextBuffer};
use crate::unicode::{is_alnum, is_navigable, is_word_char};

/// Runs of folded rows shorter than this are not worth collapsing.
const MIN_FOLD_RUN: usize = 3;

/// Persistent cursor state of one view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: CursorLocation,
    /// Sticky column for vertical motion.
    pub preferred_x: usize,
    /// Fixed end of the selection, when one is active.
    pub anchor: Option<CursorLocation>,
}

impl ViewState {
    #[must_use]
    pub fn new(cursor: CursorLocation) -> Self {
        Self {
            cursor,
            preferred_x: cursor.col,
            anchor: None,
        }
    }

    /// The normalized selection, if one is active.
    #[must_use]
    pub fn selection(&self) -> Option<SelectionInfo> {
        self.anchor
            .map(|anchor| SelectionInfo::from_endpoints(anchor, self.cursor))
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some()
    }

    fn place(&mut self, cursor: CursorLocation) {
        self.cursor = cursor;
        self.preferred_x = cursor.col;
    }

    /// Move cursor and anchor columns on `row` after one character was
    /// inserted (`grow`) or removed at the start of the line.
    fn shift_col(&mut self, row: usize, grow: bool) {
        for cl in std::iter::once(&mut self.cursor).chain(self.anchor.as_mut()) {
            if cl.row != row {
                continue;
            }
            if grow {
                cl.col += 1;
            } else if cl.col > 0 {
                cl.col -= 1;
            }
        }
    }
}

/// Delete the active selection through `editor`.
fn remove_selection(state: &mut ViewState, editor: &mut Editor<'_>) {
    if let Some(si) = state.selection() {
        editor.remove_text(si.start(), si.end());
        state.place(editor.end_location());
        state.anchor = None;
    }
}

/// User-facing editing and navigation over a borrowed buffer.
#[derive(Debug)]
pub struct TextView<'a> {
    buffer: &'a mut TextBuffer,
    journal: Option<&'a mut UndoJournal>,
    state: ViewState,
}

impl<'a> TextView<'a> {
    /// A view with the cursor at the start of `buffer`.
    pub fn new(buffer: &'a mut TextBuffer) -> Self {
        Self::with_state(buffer, ViewState::default())
    }

    /// Resume a view from saved state. Stale positions are repaired.
    pub fn with_state(buffer: &'a mut TextBuffer, state: ViewState) -> Self {
        let mut view = Self {
            buffer,
            journal: None,
            state,
        };
        view.fix();
        view
    }

    /// Journal edits made through this view.
    #[must_use]
    pub fn journal(mut self, journal: &'a mut UndoJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        self.buffer
    }

    #[must_use]
    pub fn cursor(&self) -> CursorLocation {
        self.state.cursor
    }

    #[must_use]
    pub fn preferred_x(&self) -> usize {
        self.state.preferred_x
    }

    #[must_use]
    pub fn selection(&self) -> Option<SelectionInfo> {
        self.state.selection()
    }

    /// Split into an editor for one operation and the mutable state.
    fn edit(&mut self) -> (Editor<'_>, &mut ViewState) {
        let editor = Editor::new(
            &mut *self.buffer,
            self.journal.as_deref_mut(),
            self.state.cursor,
        );
        (editor, &mut self.state)
    }

    /// Run `body` under the selection guard.
    fn with_selection<R>(&mut self, shift: bool, body: impl FnOnce(&mut Self) -> R) -> R {
        if !shift {
            self.state.anchor = None;
        } else if self.state.anchor.is_none() {
            self.state.anchor = Some(self.state.cursor);
        }
        let result = body(self);
        if self.state.anchor == Some(self.state.cursor) {
            self.state.anchor = None;
        }
        result
    }

    fn last_row(&self) -> usize {
        self.buffer.len_lines() - 1
    }

    fn line_len(&self, row: usize) -> usize {
        self.buffer.line(row).len()
    }

    // ------------------------------------------------------------------
    // Vertical motion
    // ------------------------------------------------------------------

    pub fn cursor_up(&mut self, shift: bool, flow: Option<&FlowGrid>) {
        self.with_selection(shift, |v| v.up(flow));
    }

    pub fn cursor_down(&mut self, shift: bool, flow: Option<&FlowGrid>) {
        self.with_selection(shift, |v| v.down(flow));
    }

    fn up(&mut self, flow: Option<&FlowGrid>) {
        let cursor = self.state.cursor;
        let mut pixel_x = 0;
        if let Some(grid) = flow {
            pixel_x = grid.map_to_x(cursor.row, cursor.col);
            if grid.row_info(cursor.row).num_effective_rows > 1 {
                let er = grid.effective_row(cursor.row, cursor.col);
                if er > 0 {
                    let col = grid.effective_row_index(pixel_x, cursor.row, er - 1);
                    let col = col.min(self.line_len(cursor.row));
                    self.state.place(CursorLocation::new(cursor.row, col));
                    return;
                }
            }
        }

        if cursor.row == 0 {
            self.state.place(CursorLocation::new(0, 0));
            return;
        }

        let row = cursor.row - 1;
        if let Some(grid) = flow {
            let ri = grid.row_info(row);
            if ri.num_effective_rows > 1 {
                let col = grid.effective_row_index(pixel_x, row, ri.num_effective_rows - 1);
                self.state.place(CursorLocation::new(row, col.min(self.line_len(row))));
                return;
            }
        }
        self.state.cursor = CursorLocation::new(row, self.state.preferred_x.min(self.line_len(row)));
    }

    fn down(&mut self, flow: Option<&FlowGrid>) {
        let cursor = self.state.cursor;
        let mut pixel_x = 0;
        if let Some(grid) = flow {
            pixel_x = grid.map_to_x(cursor.row, cursor.col);
            let ri = grid.row_info(cursor.row);
            if ri.num_effective_rows > 1 {
                let er = grid.effective_row(cursor.row, cursor.col);
                if er + 1 < ri.num_effective_rows {
                    let col = grid.effective_row_index(pixel_x, cursor.row, er + 1);
                    let col = col.min(self.line_len(cursor.row));
                    self.state.place(CursorLocation::new(cursor.row, col));
                    return;
                }
            }
        }

        if cursor.row >= self.last_row() {
            let row = self.last_row();
            self.state.place(CursorLocation::new(row, self.line_len(row)));
            return;
        }

        let row = cursor.row + 1;
        if let Some(grid) = flow {
            if grid.row_info(row).num_effective_rows > 1 {
                let col = grid.effective_row_index(pixel_x, row, 0);
                self.state.place(CursorLocation::new(row, col.min(self.line_len(row))));
                return;
            }
        }
        self.state.cursor = CursorLocation::new(row, self.state.preferred_x.min(self.line_len(row)));
    }

    pub fn page_up(&mut self, page_size: usize, shift: bool, flow: Option<&FlowGrid>) {
        self.with_selection(shift, |v| {
            for _ in 0..page_size {
                v.up(flow);
            }
        });
    }

    pub fn page_down(&mut self, page_size: usize, shift: bool, flow: Option<&FlowGrid>) {
        self.with_selection(shift, |v| {
            for _ in 0..page_size {
                v.down(flow);
            }
        });
    }

    // ------------------------------------------------------------------
    // Horizontal motion
    // ------------------------------------------------------------------

    pub fn cursor_left(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let cl = v.buffer.move_left(v.state.cursor);
            v.state.place(cl);
        });
    }

    pub fn cursor_right(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let cl = v.buffer.move_right(v.state.cursor);
            v.state.place(cl);
        });
    }

    /// Character before the cursor, `None` at the start of the buffer.
    #[must_use]
    pub fn char_left(&self) -> Option<char> {
        let c = self.buffer.char_left(self.state.cursor);
        (!c.is_end()).then_some(c.ch)
    }

    /// Character under the cursor, `None` at the end of the buffer.
    #[must_use]
    pub fn char_right(&self) -> Option<char> {
        let c = self.buffer.char_right(self.state.cursor);
        (!c.is_end()).then_some(c.ch)
    }

    /// Move left over punctuation, then over one alphanumeric run.
    pub fn skip_left(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let mut entered_alnum = false;
            while let Some(c) = v.char_left() {
                if is_alnum(c) {
                    entered_alnum = true;
                } else if entered_alnum {
                    break;
                }
                let cl = v.buffer.move_left(v.state.cursor);
                v.state.place(cl);
            }
        });
    }

    /// Move right over punctuation, then over one alphanumeric run.
    pub fn skip_right(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let mut entered_alnum = false;
            while let Some(c) = v.char_right() {
                if is_alnum(c) {
                    entered_alnum = true;
                } else if entered_alnum {
                    break;
                }
                let cl = v.buffer.move_right(v.state.cursor);
                v.state.place(cl);
            }
        });
    }

    /// Move to the blank line above the current paragraph.
    pub fn skip_up(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            v.state.place(CursorLocation::new(v.state.cursor.row, 0));
            let mut entered_para = false;
            let mut row = v.state.cursor.row;
            while row > 0 {
                if v.buffer.line(row).is_whitespace() {
                    if entered_para {
                        break;
                    }
                } else {
                    entered_para = true;
                }
                row -= 1;
                v.up(None);
            }
        });
    }

    /// Move to the blank line below the current paragraph.
    pub fn skip_down(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            v.state.place(CursorLocation::new(v.state.cursor.row, 0));
            let mut entered_para = false;
            let mut row = v.state.cursor.row;
            while row < v.last_row() {
                if v.buffer.line(row).is_whitespace() {
                    if entered_para {
                        break;
                    }
                } else {
                    entered_para = true;
                }
                row += 1;
                v.down(None);
            }
        });
    }

    /// Toggle between the first non-blank column and column 0.
    pub fn home(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let cursor = v.state.cursor;
            let start = v.buffer.line(cursor.row).start();
            let col = if cursor.col == start { 0 } else { start };
            v.state.place(CursorLocation::new(cursor.row, col));
        });
    }

    /// Toggle between the last non-blank column and the line end.
    pub fn end(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let cursor = v.state.cursor;
            let line = v.buffer.line(cursor.row);
            let end = line.end();
            let col = if cursor.col == end { line.len() } else { end };
            v.state.place(CursorLocation::new(cursor.row, col));
        });
    }

    pub fn home_file(&mut self, shift: bool) {
        self.with_selection(shift, |v| v.state.place(CursorLocation::new(0, 0)));
    }

    pub fn end_file(&mut self, shift: bool) {
        self.with_selection(shift, |v| {
            let end = v.buffer.cursor_end();
            v.state.place(end);
        });
    }

    /// Place the cursor at `(row, col)`, clamped into the buffer.
    pub fn mouse(&mut self, row: usize, col: usize, shift: bool) {
        self.with_selection(shift, |v| {
            let cl = v.buffer.fix(CursorLocation::new(row, col));
            v.state.place(cl);
        });
    }

    /// Jump to the next start of a token of `kind`. Returns whether it moved.
    pub fn next_token_start(&mut self, kind: u8) -> bool {
        let cursor = self.state.cursor;
        let hit = (cursor.row..self.buffer.len_lines()).find_map(|row| {
            let after = (row == cursor.row).then_some(cursor.col);
            self.buffer
                .line(row)
                .tokens()
                .iter()
                .find(|t| t.kind == kind && t.start && after.is_none_or(|col| t.offset > col))
                .map(|t| CursorLocation::new(row, t.offset))
        });
        match hit {
            Some(cl) => {
                self.state.place(self.buffer.fix(cl));
                true
            }
            None => false,
        }
    }

    /// Jump to the previous start of a token of `kind`. Returns whether it moved.
    pub fn prev_token_start(&mut self, kind: u8) -> bool {
        let cursor = self.state.cursor;
        let hit = (0..=cursor.row).rev().find_map(|row| {
            let before = (row == cursor.row).then_some(cursor.col);
            self.buffer
                .line(row)
                .tokens()
                .iter()
                .rev()
                .find(|t| t.kind == kind && t.start && before.is_none_or(|col| t.offset < col))
                .map(|t| CursorLocation::new(row, t.offset))
        });
        match hit {
            Some(cl) => {
                self.state.place(self.buffer.fix(cl));
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Type one character, replacing the selection. A newline copies the
    /// indentation of the line above.
    pub fn insert_char(&mut self, ch: char) {
        let (mut editor, state) = self.edit();
        remove_selection(state, &mut editor);
        editor.insert_char(state.cursor, ch);
        state.cursor = editor.end_location();

        if ch == '\n' && state.cursor.row > 0 {
            let indent: String = editor
                .buffer()
                .line(state.cursor.row - 1)
                .chars()
                .iter()
                .map(|c| c.ch)
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            if !indent.is_empty() {
                editor.insert_text(state.cursor, &indent);
                state.cursor = editor.end_location();
            }
        }
        state.preferred_x = state.cursor.col;
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character under the cursor.
    pub fn delete_forward(&mut self) {
        if !self.state.has_selection() && !self.buffer.can_move_right(self.state.cursor) {
            return;
        }
        let (mut editor, state) = self.edit();
        if state.has_selection() {
            remove_selection(state, &mut editor);
            return;
        }
        editor.remove_char(state.cursor);
        state.place(editor.end_location());
    }

    /// Delete the selection, or the character before the cursor.
    pub fn delete_backward(&mut self) {
        if !self.state.has_selection() && !self.buffer.can_move_left(self.state.cursor) {
            return;
        }
        let (mut editor, state) = self.edit();
        if state.has_selection() {
            remove_selection(state, &mut editor);
            return;
        }
        let cl = editor.buffer().move_left(state.cursor);
        editor.remove_char(cl);
        state.place(editor.end_location());
    }

    /// Delete left of the cursor by the [`skip_left`](Self::skip_left) rule.
    pub fn delete_word(&mut self) {
        let end = self.state.cursor;
        let mut start = end;
        let mut entered_alnum = false;
        loop {
            let c = self.buffer.char_left(start);
            if c.is_end() {
                break;
            }
            if is_alnum(c.ch) {
                entered_alnum = true;
            } else if entered_alnum {
                break;
            }
            start = self.buffer.move_left(start);
        }

        if start != end {
            let (mut editor, _) = self.edit();
            editor.remove_text(start, end);
        }
        self.state.anchor = None;
        self.state.place(start);
    }

    /// Remove the selection and return its text.
    pub fn cut(&mut self) -> String {
        if !self.state.has_selection() {
            return String::new();
        }
        let text = self.selection_as_string();
        let (mut editor, state) = self.edit();
        remove_selection(state, &mut editor);
        text
    }

    #[must_use]
    pub fn copy(&self) -> String {
        self.selection_as_string()
    }

    /// Insert `text` at the cursor, replacing the selection.
    pub fn paste(&mut self, text: &str) {
        let (mut editor, state) = self.edit();
        remove_selection(state, &mut editor);
        editor.insert_text(state.cursor, text);
        state.place(editor.end_location());
    }

    /// Cut the selection, the rest of the line, or the line break at its end.
    pub fn kill(&mut self) -> String {
        if self.state.has_selection() {
            return self.cut();
        }
        let cursor = self.state.cursor;
        if !self.buffer.can_move_right(cursor) {
            return String::new();
        }

        let len = self.line_len(cursor.row);
        let (mut editor, state) = self.edit();
        if cursor.col >= len {
            let at = CursorLocation::new(cursor.row, len);
            editor.remove_char(at);
            state.place(editor.end_location());
            "\n".to_string()
        } else {
            let text = editor.buffer().line(cursor.row).to_string_range(cursor.col, len);
            editor.remove_text(cursor, CursorLocation::new(cursor.row, len));
            text
        }
    }

    /// Replace `term` starting at the cursor with `replacement`.
    pub fn replace(&mut self, term: &str, replacement: &str) {
        let cursor = self.state.cursor;
        let mut end = cursor;
        for _ in term.chars() {
            end = self.buffer.move_right(end);
        }
        let (mut editor, _) = self.edit();
        editor.remove_text(cursor, end);
        editor.insert_text(cursor, replacement);
    }

    /// Replace every match of `term` as one undo step; returns the count.
    pub fn replace_all(&mut self, term: &str, settings: SearchSettings, replacement: &str) -> usize {
        let results = self.buffer.search(term, settings);
        {
            let (mut editor, _) = self.edit();
            for sr in results.iter().rev() {
                let start = sr.start();
                let mut end = start;
                for _ in 0..sr.size {
                    end = editor.buffer().move_right(end);
                }
                editor.remove_text(start, end);
                editor.insert_text(start, replacement);
            }
        }
        tracing::debug!(term, count = results.len(), "replace all");
        let cursor = self.state.cursor;
        self.mouse(cursor.row, cursor.col, false);
        results.len()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_all(&mut self) {
        self.home_file(false);
        self.end_file(true);
    }

    pub fn select_none(&mut self) {
        self.state.anchor = None;
    }

    /// Column range of the run around the cursor matched by `class`.
    fn run_around(&self, class: fn(char) -> bool, extend_right: bool) -> (usize, usize) {
        let cursor = self.state.cursor;
        let chars = self.buffer.line(cursor.row).chars();
        let mut left = cursor.col.min(chars.len());
        while left > 0 && class(chars[left - 1].ch) {
            left -= 1;
        }
        let mut right = cursor.col.min(chars.len());
        if extend_right {
            while right < chars.len() && class(chars[right].ch) {
                right += 1;
            }
        }
        (left, right)
    }

    fn select_run(&mut self, left: usize, right: usize) {
        if left != right {
            let row = self.state.cursor.row;
            self.state.anchor = Some(CursorLocation::new(row, left));
            self.state.place(CursorLocation::new(row, right));
        }
    }

    /// Select the word around the cursor.
    pub fn select_word(&mut self) {
        let (left, right) = self.run_around(is_word_char, true);
        self.select_run(left, right);
    }

    /// Select the part of the word left of the cursor.
    pub fn select_word_left(&mut self) {
        let (left, right) = self.run_around(is_word_char, false);
        self.select_run(left, right);
    }

    fn run_text(&self, (left, right): (usize, usize)) -> String {
        self.buffer
            .line(self.state.cursor.row)
            .to_string_range(left, right)
    }

    /// The identifier around the cursor.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.run_text(self.run_around(is_word_char, true))
    }

    /// The identifier part left of the cursor, e.g. for completion.
    #[must_use]
    pub fn identifier_left(&self) -> String {
        self.run_text(self.run_around(is_word_char, false))
    }

    /// The path-like token around the cursor (`_ : . / \` allowed).
    #[must_use]
    pub fn navigable(&self) -> String {
        self.run_text(self.run_around(is_navigable, true))
    }

    #[must_use]
    pub fn selection_as_string(&self) -> String {
        self.state
            .selection()
            .map(|si| self.buffer.selection_as_string(&si))
            .unwrap_or_default()
    }

    /// Selected text up to the end of its first line.
    #[must_use]
    pub fn selection_as_string_first_line(&self) -> String {
        let Some(si) = self.state.selection() else {
            return String::new();
        };
        let line = self.buffer.line(si.row_start);
        let end = if si.row_start == si.row_end {
            si.col_end
        } else {
            line.len()
        };
        line.to_string_range(si.col_start, end)
    }

    /// Keep the selection but put the cursor at its start.
    pub fn selection_move_to_origin(&mut self) {
        let Some(si) = self.state.selection() else {
            return;
        };
        if si.start() == self.state.cursor {
            return;
        }
        self.state.anchor = Some(self.state.cursor);
        self.state.cursor = si.start();
    }

    /// Rows touched by the selection, or the cursor row.
    fn affected_rows(&self) -> std::ops::RangeInclusive<usize> {
        match self.state.selection() {
            Some(si) => si.lines_start..=si.lines_end,
            None => self.state.cursor.row..=self.state.cursor.row,
        }
    }

    // ------------------------------------------------------------------
    // Indentation and comments
    // ------------------------------------------------------------------

    /// Indent the affected rows. A positive `tabdef` rounds leading spaces
    /// up to the next multiple; otherwise one tab is inserted.
    pub fn tab(&mut self, tabdef: i32) {
        let rows = self.affected_rows();
        let (mut editor, state) = self.edit();
        for row in rows {
            let at = CursorLocation::new(row, 0);
            let count = match usize::try_from(tabdef) {
                Ok(width) if width > 0 => {
                    let spaces = editor.buffer().line(row).indentation().spaces;
                    (spaces / width + 1) * width - spaces
                }
                _ => {
                    editor.insert_char(at, '\t');
                    state.shift_col(row, true);
                    continue;
                }
            };
            for _ in 0..count {
                editor.insert_char(at, ' ');
                state.shift_col(row, true);
            }
        }
        state.preferred_x = state.cursor.col;
    }

    /// Unindent the affected rows, the inverse of [`tab`](Self::tab).
    pub fn untab(&mut self, tabdef: i32) {
        let rows = self.affected_rows();
        let (mut editor, state) = self.edit();
        for row in rows {
            let at = CursorLocation::new(row, 0);
            let first = |editor: &Editor<'_>| {
                let line = editor.buffer().line(row);
                (!line.is_empty()).then(|| line.char_at(0).ch)
            };

            let width = match usize::try_from(tabdef) {
                Ok(width) if width > 0 => width,
                _ => {
                    if first(&editor) == Some('\t') {
                        editor.remove_char(at);
                        state.shift_col(row, false);
                    }
                    continue;
                }
            };

            let spaces = editor.buffer().line(row).indentation().spaces;
            let to_remove = match spaces % width {
                0 => width,
                n => n,
            };
            for i in 0..to_remove {
                match first(&editor) {
                    Some('\t') if i == 0 => {
                        editor.remove_char(at);
                        state.shift_col(row, false);
                        break;
                    }
                    Some(' ') => {
                        editor.remove_char(at);
                        state.shift_col(row, false);
                    }
                    _ => break,
                }
            }
        }
        state.preferred_x = state.cursor.col;
    }

    /// Prefix the affected rows with `marker`.
    pub fn comment(&mut self, marker: &str) {
        let rows = self.affected_rows();
        let (mut editor, state) = self.edit();
        for row in rows {
            editor.insert_text(CursorLocation::new(row, 0), marker);
            for _ in marker.chars() {
                state.shift_col(row, true);
            }
        }
        state.preferred_x = state.cursor.col;
    }

    /// Remove a leading `marker` from the affected rows, ignoring blanks
    /// before and inside it.
    pub fn uncomment(&mut self, marker: &str) {
        let marker: Vec<char> = marker.chars().collect();
        let rows = self.affected_rows();
        let (mut editor, state) = self.edit();
        for row in rows {
            let mut matched = 0;
            let mut col = 0;
            while matched < marker.len() {
                let line = editor.buffer().line(row);
                if col >= line.len() {
                    break;
                }
                let c = line.char_at(col).ch;
                if c == ' ' || c == '\t' {
                    col += 1;
                } else if c == marker[matched] {
                    editor.remove_char(CursorLocation::new(row, col));
                    state.shift_col(row, false);
                    matched += 1;
                } else {
                    break;
                }
            }
        }
        state.preferred_x = state.cursor.col;
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Clamp cursor and anchor into the buffer.
    pub fn fix(&mut self) {
        self.state.cursor = self.buffer.fix(self.state.cursor);
        self.state.anchor = self.state.anchor.map(|a| self.buffer.fix(a));
        if self.state.anchor == Some(self.state.cursor) {
            self.state.anchor = None;
        }
    }

    /// Revert the newest activity. Returns whether anything was undone.
    pub fn undo(&mut self) -> bool {
        let Some(journal) = self.journal.as_deref_mut() else {
            return false;
        };
        match journal.undo(self.buffer) {
            Some(cl) => {
                self.state.anchor = None;
                let cl = self.buffer.fix(cl);
                self.state.place(cl);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Folding
    // ------------------------------------------------------------------

    fn is_folded(&self, row: usize) -> bool {
        self.buffer.line(row).is_folded()
    }

    fn set_folded(&mut self, row: usize, folded: bool) {
        if self.is_folded(row) != folded {
            self.buffer.line_mut(row).set_folded(folded);
        }
    }

    fn clamp_rows(&self, a: usize, b: usize) -> (usize, usize) {
        let last = self.last_row();
        (a.min(b).min(last), a.max(b).min(last))
    }

    /// Keep moving down while on a folded row.
    pub fn folded_momentum_down(&mut self, shift: bool) {
        while self.state.cursor.row < self.last_row() {
            if !self.is_folded(self.state.cursor.row) {
                return;
            }
            self.cursor_down(shift, None);
        }
        self.set_folded(self.last_row(), false);
    }

    /// Keep moving up while on a folded row.
    pub fn folded_momentum_up(&mut self, shift: bool) {
        while self.state.cursor.row > 0 {
            if !self.is_folded(self.state.cursor.row) {
                return;
            }
            self.cursor_up(shift, None);
        }
        self.set_folded(0, false);
    }

    /// Move down, opening the folded block entered.
    pub fn break_fold_down(&mut self) {
        self.cursor_down(false, None);
        let saved = self.state.cursor;
        if !self.is_folded(saved.row) {
            return;
        }
        let start = saved.row;
        let mut end = start;
        while self.state.cursor.row < self.last_row() {
            if !self.is_folded(self.state.cursor.row) {
                break;
            }
            end = self.state.cursor.row;
            self.down(None);
        }
        self.break_fold(start, end, true, true);
        self.set_folded(self.state.cursor.row, false);

        self.state.cursor = saved;
        self.folded_momentum_down(false);
    }

    /// Move up, opening the folded block entered.
    pub fn break_fold_up(&mut self) {
        self.cursor_up(false, None);
        let saved = self.state.cursor;
        if !self.is_folded(saved.row) {
            return;
        }
        let start = saved.row;
        let mut end = start;
        while self.state.cursor.row > 0 {
            if !self.is_folded(self.state.cursor.row) {
                break;
            }
            end = self.state.cursor.row;
            self.up(None);
        }
        self.break_fold(end, start, true, true);
        self.set_folded(self.state.cursor.row, false);

        self.state.cursor = saved;
        self.folded_momentum_up(false);
    }

    /// Unfold the outer structure of rows `start..=end`.
    ///
    /// Rows at the minimum indent stay visible (with `fold_punct`, rows
    /// holding only punctuation are ignored when finding it and may stay
    /// folded). Blank rows fold only next to a folded row. With
    /// `unfold_chain`, folded runs shorter than three rows are opened.
    pub fn break_fold(&mut self, start: usize, end: usize, unfold_chain: bool, fold_punct: bool) {
        let (start, end) = self.clamp_rows(start, end);
        if start == end {
            self.set_folded(start, false);
            return;
        }

        let min_level = (start..=end)
            .map(|row| self.buffer.line(row))
            .filter(|l| !l.is_whitespace() && !(fold_punct && l.is_non_word()))
            .map(|l| l.start())
            .min()
            .unwrap_or(usize::MAX);

        for row in start..=end {
            let line = self.buffer.line(row);
            if line.is_whitespace() {
                self.set_folded(row, false);
                continue;
            }
            let indent = line.start();
            if indent < min_level || (indent == min_level && !(fold_punct && line.is_non_word())) {
                self.set_folded(row, false);
            }
        }

        let mut prev_folded = false;
        for row in start..=end {
            if prev_folded && self.buffer.line(row).is_whitespace() {
                self.set_folded(row, true);
            }
            prev_folded = self.is_folded(row);
        }
        prev_folded = false;
        for row in (start..=end).rev() {
            if prev_folded && self.buffer.line(row).is_whitespace() {
                self.set_folded(row, true);
            }
            prev_folded = self.is_folded(row);
        }

        if unfold_chain {
            self.unfold_short_runs(start, end, false);
        }
    }

    /// Open folded runs shorter than [`MIN_FOLD_RUN`]. With `extend`, runs
    /// reaching outside `start..=end` are measured in full.
    fn unfold_short_runs(&mut self, start: usize, end: usize, extend: bool) {
        let (mut lo, mut hi) = (start, end);
        if extend {
            while lo > 0 && self.is_folded(lo - 1) {
                lo -= 1;
            }
            while hi < self.last_row() && self.is_folded(hi + 1) {
                hi += 1;
            }
        }

        let mut run = 0;
        for row in lo..=hi + 1 {
            if row <= hi && self.is_folded(row) {
                run += 1;
                continue;
            }
            if run > 0 && run < MIN_FOLD_RUN {
                for r in row - run..row {
                    self.set_folded(r, false);
                }
            }
            run = 0;
        }
    }

    /// Collapse the indented body of `start..=end`.
    ///
    /// Afterwards the cursor row is visible and no folded run of fewer than
    /// three rows touches the range.
    pub fn fold(&mut self, start: usize, end: usize) {
        let (start, end) = self.clamp_rows(start, end);
        for row in start..=end {
            self.set_folded(row, true);
        }
        self.break_fold(start, end, true, true);

        loop {
            let row = self.state.cursor.row;
            if !self.is_folded(row) {
                break;
            }
            if self.buffer.line(row).is_whitespace() {
                self.set_folded(row, false);
                break;
            }

            let mut run_start = row;
            while run_start > 0 && self.is_folded(run_start - 1) {
                run_start -= 1;
            }
            let mut run_end = row;
            while run_end < self.last_row() && self.is_folded(run_end + 1) {
                run_end += 1;
            }

            let before = (run_start..=run_end).filter(|r| self.is_folded(*r)).count();
            self.break_fold(run_start, run_end, false, true);
            let after = (run_start..=run_end).filter(|r| self.is_folded(*r)).count();
            if after == before && self.is_folded(row) {
                self.set_folded(row, false);
                break;
            }
        }

        self.unfold_short_runs(start, end, true);
        tracing::trace!(start, end, "fold");
    }

    /// Open every folded row.
    pub fn unfold_all(&mut self) {
        for row in 0..self.buffer.len_lines() {
            self.set_folded(row, false);
        }
    }
}
