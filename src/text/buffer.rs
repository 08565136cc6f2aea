//! Line-oriented text storage with cursor arithmetic.
//!
//! This module provides [`TextBuffer`], an ordered sequence of [`Line`]s that
//! always holds at least one line. It owns the cursor primitives used by the
//! view layer (validation, wrap-around motion, boundary characters), the
//! UTF-8 encode/decode pair, substring search and selection extraction.
//!
//! Mutations that should be undoable go through an
//! [`Editor`](super::Editor); the raw line accessors here bypass the journal.

use std::fmt;

use super::edit::Editor;
use super::line::{Character, Line};
use super::word::WordDef;
use super::{CursorLocation, SearchResult, SearchSettings, SelectionInfo};
use crate::error::Result;
use crate::unicode::is_word_char;

/// Line-ending convention of encoded text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// No line break seen yet.
    Unknown,
    /// `\n`
    #[default]
    Unix,
    /// `\r\n`
    Windows,
    /// Both conventions occur.
    Mixed,
}

impl LineEnding {
    /// Classify the line breaks found in `text`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let (mut unix, mut windows) = (false, false);
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'\n' {
                if i > 0 && bytes[i - 1] == b'\r' {
                    windows = true;
                } else {
                    unix = true;
                }
            }
        }
        match (unix, windows) {
            (false, false) => Self::Unknown,
            (true, false) => Self::Unix,
            (false, true) => Self::Windows,
            (true, true) => Self::Mixed,
        }
    }

    /// The separator written between lines.
    #[must_use]
    pub fn separator(self) -> &'static str {
        match self {
            Self::Windows => "\r\n",
            _ => "\n",
        }
    }
}

#[inline]
fn identifier_char(c: char) -> bool {
    is_word_char(c) || c == '$'
}

/// An ordered, non-empty sequence of [`Line`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Line>,
    revision: u64,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create a buffer holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            revision: 0,
        }
    }

    /// Create a buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.from_utf8(text);
        buffer
    }

    /// Number of lines, always at least 1.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.lines.len()
    }

    /// Total characters, not counting line breaks.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    /// Counter bumped by every mutation; layout caches compare against it.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Line at `row`. Panics when `row >= len_lines()`.
    #[track_caller]
    #[must_use]
    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    /// Mutable line at `row`, bypassing the undo journal.
    #[track_caller]
    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        self.revision += 1;
        &mut self.lines[row]
    }

    pub fn lines(&self) -> impl ExactSizeIterator<Item = &Line> {
        self.lines.iter()
    }

    #[must_use]
    pub fn last_line(&self) -> &Line {
        &self.lines[self.lines.len() - 1]
    }

    /// Insert an empty line at `row` (`row == len_lines()` appends).
    #[track_caller]
    pub fn insert_line(&mut self, row: usize) -> &mut Line {
        assert!(
            row <= self.lines.len(),
            "insert_line row {row} out of range for {} lines",
            self.lines.len()
        );
        self.revision += 1;
        self.lines.insert(row, Line::new());
        &mut self.lines[row]
    }

    /// Remove the line at `row`. Removing the only line leaves one empty line.
    #[track_caller]
    pub fn remove_line(&mut self, row: usize) {
        assert!(
            row < self.lines.len(),
            "remove_line row {row} out of range for {} lines",
            self.lines.len()
        );
        self.revision += 1;
        self.lines.remove(row);
        if self.lines.is_empty() {
            self.lines.push(Line::new());
        }
    }

    /// Keep only the last `size` lines (at least one).
    pub fn trim_lines_to_size(&mut self, size: usize) {
        let size = size.max(1);
        if self.lines.len() > size {
            let excess = self.lines.len() - size;
            self.lines.drain(..excess);
            self.revision += 1;
        }
    }

    /// Whether `cl` addresses an existing position.
    #[must_use]
    pub fn check(&self, cl: CursorLocation) -> bool {
        cl.row < self.lines.len() && cl.col <= self.lines[cl.row].len()
    }

    /// Clamp `cl` into the buffer.
    #[must_use]
    pub fn fix(&self, mut cl: CursorLocation) -> CursorLocation {
        if cl.row >= self.lines.len() {
            cl.row = self.lines.len() - 1;
        }
        cl.col = cl.col.min(self.lines[cl.row].len());
        cl
    }

    /// Clamp `cl`, logging when it was stale.
    #[must_use]
    pub fn check_and_fix(&self, cl: CursorLocation) -> CursorLocation {
        if !self.check(cl) {
            tracing::warn!(row = cl.row, col = cl.col, "stale cursor location, repairing");
        }
        self.fix(cl)
    }

    #[must_use]
    pub fn can_move_left(&self, cl: CursorLocation) -> bool {
        cl.row != 0 || cl.col != 0
    }

    #[must_use]
    pub fn can_move_right(&self, cl: CursorLocation) -> bool {
        let last = self.lines.len() - 1;
        if cl.row > last {
            return false;
        }
        !(cl.row == last && cl.col >= self.lines[last].len())
    }

    /// One position left, wrapping to the end of the previous line.
    #[must_use]
    pub fn move_left(&self, cl: CursorLocation) -> CursorLocation {
        let mut cl = self.check_and_fix(cl);
        if cl.col > 0 {
            cl.col -= 1;
        } else if cl.row > 0 {
            cl.row -= 1;
            cl.col = self.lines[cl.row].len();
        }
        cl
    }

    /// One position right, wrapping to the start of the next line.
    #[must_use]
    pub fn move_right(&self, cl: CursorLocation) -> CursorLocation {
        let mut cl = self.check_and_fix(cl);
        if cl.col < self.lines[cl.row].len() {
            cl.col += 1;
        } else if cl.row + 1 < self.lines.len() {
            cl.row += 1;
            cl.col = 0;
        }
        cl
    }

    /// Character under the cursor; `'\n'` at the virtual end of a line.
    #[must_use]
    pub fn at_cursor(&self, cl: CursorLocation) -> Character {
        let cl = self.check_and_fix(cl);
        let line = &self.lines[cl.row];
        if cl.col == line.len() {
            Character::plain('\n')
        } else {
            line.char_at(cl.col)
        }
    }

    /// Character before the cursor, or [`Character::END`] at the buffer start.
    #[must_use]
    pub fn char_left(&self, cl: CursorLocation) -> Character {
        if !self.can_move_left(cl) {
            return Character::END;
        }
        self.at_cursor(self.move_left(cl))
    }

    /// Character after the cursor, or [`Character::END`] at the buffer end.
    #[must_use]
    pub fn char_right(&self, cl: CursorLocation) -> Character {
        if !self.can_move_right(cl) {
            return Character::END;
        }
        self.at_cursor(cl)
    }

    /// The position after the last character.
    #[must_use]
    pub fn cursor_end(&self) -> CursorLocation {
        CursorLocation::new(self.lines.len() - 1, self.last_line().len())
    }

    /// The identifier (letters, digits, `_`, `$`) touching `cl`.
    #[must_use]
    pub fn word_at(&self, cl: CursorLocation) -> String {
        let line = &self.lines[cl.row];
        let chars = line.chars();
        let col = cl.col.min(chars.len());

        let mut left = col;
        while left > 0 && identifier_char(chars[left - 1].ch) {
            left -= 1;
        }
        let mut right = col;
        while right < chars.len() && identifier_char(chars[right].ch) {
            right += 1;
        }
        line.to_string_range(left, right)
    }

    /// The `word_def` word containing or touching `cl`, scanning from the line start.
    #[must_use]
    pub fn word_at_with(&self, cl: CursorLocation, word_def: WordDef) -> String {
        let line = &self.lines[cl.row];
        let mut start: Option<usize> = None;
        let mut prev = '\0';

        for (i, c) in line.chars().iter().enumerate() {
            match start {
                Some(left) => {
                    if !word_def.continue_word(prev, c.ch) {
                        if left <= cl.col && i >= cl.col {
                            return line.to_string_range(left, i);
                        }
                        start = None;
                    }
                }
                None => {
                    if word_def.start_word(c.ch) {
                        if i > cl.col {
                            return String::new();
                        }
                        start = Some(i);
                    }
                }
            }
            prev = c.ch;
        }

        match start {
            Some(left) if left <= cl.col => line.to_string_range(left, line.len()),
            _ => String::new(),
        }
    }

    /// All matches of `term` in line order.
    #[must_use]
    pub fn search(&self, term: &str, settings: SearchSettings) -> Vec<SearchResult> {
        self.lines
            .iter()
            .enumerate()
            .flat_map(|(row, line)| line.search(term, row, settings))
            .collect()
    }

    /// All whole-word, case-sensitive matches of `term`.
    #[must_use]
    pub fn search_word(&self, term: &str) -> Vec<SearchResult> {
        self.search(term, SearchSettings::WHOLE_WORD)
    }

    /// Text covered by `si`, with `\n` between lines.
    #[must_use]
    pub fn selection_as_string(&self, si: &SelectionInfo) -> String {
        if si.row_start == si.row_end {
            return self.lines[si.row_start].to_string_range(si.col_start, si.col_end);
        }
        let first = &self.lines[si.row_start];
        let mut s = first.to_string_range(si.col_start, first.len());
        for line in &self.lines[si.row_start + 1..si.row_end] {
            s.push('\n');
            s.push_str(&line.to_string());
        }
        s.push('\n');
        s.push_str(&self.lines[si.row_end].to_string_range(0, si.col_end));
        s
    }

    /// Encode every line, joined by the separator of `line_ending`.
    #[must_use]
    pub fn to_utf8(&self, line_ending: LineEnding) -> String {
        let sep = line_ending.separator();
        let mut s = String::with_capacity(self.len_chars() + self.lines.len() * sep.len());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                s.push_str(sep);
            }
            s.extend(line.chars().iter().map(|c| c.ch));
        }
        s
    }

    /// Replace the whole content. Splits on `\n` and drops one `\r` per line.
    pub fn from_utf8(&mut self, text: &str) {
        self.lines = text
            .split('\n')
            .map(|piece| {
                let mut line = Line::from(piece);
                line.trim_r();
                line
            })
            .collect();
        self.revision += 1;
    }

    /// Validate `bytes` as UTF-8 and replace the content.
    pub fn from_utf8_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(bytes)?;
        self.from_utf8(text);
        Ok(())
    }

    /// Append text at the end of the buffer without journaling it.
    pub fn append(&mut self, text: &str, markup: u8) {
        let end = self.cursor_end();
        let mut editor = Editor::new(self, None, end);
        editor.insert_text_with_markup(end, text, markup);
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8(LineEnding::Unix))
    }
}
