//! A single line of marked-up characters.
//!
//! Every index-taking mutator checks `index <= len()` and panics otherwise:
//! an out-of-range index is a caller bug, never user data.

use std::fmt;

use super::{SearchResult, SearchSettings};
use crate::unicode::{fold_case, is_word_char};

/// Largest markup tag a syntax highlighter may assign.
pub const MAX_MARKUP: u8 = 15;

/// A Unicode scalar value with an opaque markup tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Character {
    pub ch: char,
    pub markup: u8,
}

impl Character {
    /// Sentinel returned by boundary queries when no character exists.
    pub const END: Self = Self {
        ch: '\u{FFFF}',
        markup: u8::MAX,
    };

    #[must_use]
    pub const fn new(ch: char, markup: u8) -> Self {
        Self { ch, markup }
    }

    #[must_use]
    pub const fn plain(ch: char) -> Self {
        Self { ch, markup: 0 }
    }

    /// Whether this is the [`END`](Self::END) sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        *self == Self::END
    }
}

/// A syntax token written by an external tokenizer.
///
/// The engine never interprets `kind`; it only compares it when jumping
/// between tokens of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Token {
    pub kind: u8,
    /// True for the token's opening boundary, false for its closing one.
    pub start: bool,
    /// Column of the boundary.
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub const fn new(kind: u8, start: bool, offset: usize) -> Self {
        Self {
            kind,
            start,
            offset,
        }
    }
}

/// Per-line data owned by collaborators: fold flag and syntax tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineAnnotation {
    pub tokens: Vec<Token>,
    pub folded: bool,
}

/// Leading whitespace counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Indentation {
    pub tabs: usize,
    pub spaces: usize,
}

#[inline]
fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// An ordered, mutable sequence of [`Character`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    chars: Vec<Character>,
    annotation: LineAnnotation,
}

impl Line {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a line from text with every character tagged `markup`.
    #[must_use]
    pub fn with_markup(s: &str, markup: u8) -> Self {
        let mut line = Self::new();
        line.append_str(s, markup);
        line
    }

    #[track_caller]
    fn check_index(&self, index: usize) {
        assert!(
            index <= self.chars.len(),
            "line index {index} out of range for line of length {}",
            self.chars.len()
        );
    }

    /// Number of characters, excluding the implicit newline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn chars(&self) -> &[Character] {
        &self.chars
    }

    /// Character at `index`. Panics when `index >= len()`.
    #[track_caller]
    #[must_use]
    pub fn char_at(&self, index: usize) -> Character {
        self.chars[index]
    }

    #[must_use]
    pub fn annotation(&self) -> &LineAnnotation {
        &self.annotation
    }

    pub fn annotation_mut(&mut self) -> &mut LineAnnotation {
        &mut self.annotation
    }

    #[must_use]
    pub fn is_folded(&self) -> bool {
        self.annotation.folded
    }

    pub fn set_folded(&mut self, folded: bool) {
        self.annotation.folded = folded;
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.annotation.tokens
    }

    pub fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.annotation.tokens = tokens;
    }

    pub fn append_char(&mut self, ch: char, markup: u8) {
        self.chars.push(Character::new(ch, markup));
    }

    pub fn append_str(&mut self, s: &str, markup: u8) {
        self.chars.extend(s.chars().map(|ch| Character::new(ch, markup)));
    }

    #[track_caller]
    pub fn insert_char(&mut self, index: usize, ch: char, markup: u8) {
        self.check_index(index);
        self.chars.insert(index, Character::new(ch, markup));
    }

    #[track_caller]
    pub fn insert_str(&mut self, index: usize, s: &str, markup: u8) {
        self.check_index(index);
        self.chars
            .splice(index..index, s.chars().map(|ch| Character::new(ch, markup)));
    }

    /// Remove the character at `index`. Panics when `index >= len()`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) {
        self.check_index(index);
        self.chars.remove(index);
    }

    /// Remove the characters in `start..end`.
    #[track_caller]
    pub fn remove_range(&mut self, start: usize, end: usize) {
        self.check_index(start);
        self.check_index(end);
        self.chars.drain(start..end);
    }

    /// Drop every character from `index` on.
    #[track_caller]
    pub fn truncate(&mut self, index: usize) {
        self.check_index(index);
        self.chars.truncate(index);
    }

    /// Release spare capacity after a bulk load.
    pub fn shrink_to_fit(&mut self) {
        self.chars.shrink_to_fit();
    }

    /// Text of the characters in `start..end`.
    #[track_caller]
    #[must_use]
    pub fn to_string_range(&self, start: usize, end: usize) -> String {
        self.check_index(start);
        self.check_index(end);
        self.chars[start..end].iter().map(|c| c.ch).collect()
    }

    /// Column of the first non-blank character, or `len()` if all blank.
    #[must_use]
    pub fn start(&self) -> usize {
        self.chars
            .iter()
            .position(|c| !is_blank(c.ch))
            .unwrap_or(self.chars.len())
    }

    /// Column just past the last non-blank character, or `len()` if all blank.
    #[must_use]
    pub fn end(&self) -> usize {
        self.chars
            .iter()
            .rposition(|c| !is_blank(c.ch))
            .map_or(self.chars.len(), |i| i + 1)
    }

    /// True when the line holds nothing but spaces and tabs.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.chars.iter().all(|c| is_blank(c.ch))
    }

    /// Count of characters that are neither spaces nor tabs.
    #[must_use]
    pub fn num_real_chars(&self) -> usize {
        self.chars.iter().filter(|c| !is_blank(c.ch)).count()
    }

    /// True when the line has no letter, digit or underscore.
    #[must_use]
    pub fn is_non_word(&self) -> bool {
        !self.chars.iter().any(|c| is_word_char(c.ch))
    }

    #[must_use]
    pub fn indentation(&self) -> Indentation {
        let mut ind = Indentation::default();
        for c in &self.chars {
            match c.ch {
                ' ' => ind.spaces += 1,
                '\t' => ind.tabs += 1,
                _ => break,
            }
        }
        ind
    }

    /// Strip trailing blanks; an all-blank line becomes empty.
    pub fn trim_whitespace(&mut self) {
        let end = if self.is_whitespace() { 0 } else { self.end() };
        self.truncate(end);
    }

    /// Drop one trailing carriage return.
    pub fn trim_r(&mut self) {
        if self.chars.last().is_some_and(|c| c.ch == '\r') {
            self.chars.pop();
        }
    }

    /// Non-overlapping matches of `term`, reported on `row`.
    #[must_use]
    pub fn search(&self, term: &str, row: usize, settings: SearchSettings) -> Vec<SearchResult> {
        let case_insensitive = settings.contains(SearchSettings::CASE_INSENSITIVE);
        let fold = |c: char| if case_insensitive { fold_case(c) } else { c };
        let term: Vec<char> = term.chars().map(fold).collect();
        let n = term.len();

        let mut results = Vec::new();
        if n == 0 || n > self.chars.len() {
            return results;
        }

        let mut i = 0;
        while i + n <= self.chars.len() {
            let matched = self.chars[i..i + n]
                .iter()
                .zip(&term)
                .all(|(c, t)| fold(c.ch) == *t);
            if matched && (!settings.contains(SearchSettings::WHOLE_WORD) || self.is_word_at(i, n)) {
                results.push(SearchResult::new(row, i, n));
                i += n;
            } else {
                i += 1;
            }
        }
        results
    }

    fn is_word_at(&self, start: usize, len: usize) -> bool {
        let left_ok = start == 0 || !is_word_char(self.chars[start - 1].ch);
        let right_ok = self
            .chars
            .get(start + len)
            .is_none_or(|c| !is_word_char(c.ch));
        left_ok && right_ok
    }

    /// Columns where `ch` occurs.
    #[must_use]
    pub fn search_char(&self, ch: char) -> Vec<usize> {
        self.chars
            .iter()
            .enumerate()
            .filter(|(_, c)| c.ch == ch)
            .map(|(i, _)| i)
            .collect()
    }

    /// Replace the `term`-sized span at `col` with `replacement`.
    #[track_caller]
    pub fn replace(&mut self, term: &str, replacement: &str, col: usize) {
        let size = term.chars().count();
        self.remove_range(col, col + size);
        self.insert_str(col, replacement, 0);
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::with_markup(s, 0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in &self.chars {
            f.write_char(c.ch)?;
        }
        Ok(())
    }
}
