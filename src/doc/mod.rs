//! Documents: the capability set shared by editable files and consoles.
//!
//! A [`Doc`] exposes its buffer, cursor and selection for rendering and
//! accepts user input through `handle_*` methods. After every handled input
//! it notifies observers registered on [`Doc::hooks`] with a [`DocEvent`]
//! set describing what changed.
//!
//! # Examples
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use doctext::doc::{Doc, DocEvent, FileDoc, KeyCode, KeyEvent};
//!
//! let mut doc = FileDoc::with_text("fn main() {}\n");
//! let seen = Rc::new(Cell::new(DocEvent::empty()));
//! let sink = Rc::clone(&seen);
//! let _hook = doc.hooks().add(move |ev| sink.set(sink.get() | *ev));
//!
//! doc.handle_key(KeyEvent::key(KeyCode::End), None).unwrap();
//! doc.handle_key(KeyEvent::char(';'), None).unwrap();
//! assert_eq!(doc.text_buffer().line(0).to_string(), "fn main() {};");
//! assert!(seen.get().contains(DocEvent::EDITED | DocEvent::CURSOR_MOVED));
//! assert_eq!(doc.short_title(), "*Untitled");
//! ```

mod console;
mod file_doc;
mod key;

pub use console::ConsoleDoc;
pub use file_doc::FileDoc;
pub use key::{DocAction, KeyCode, KeyEvent, KeyModifiers};

use bitflags::bitflags;

use crate::error::Result;
use crate::hooks::HookSource;
use crate::text::{CursorLocation, FlowGrid, SearchSettings, SelectionInfo, TextBuffer};

bitflags! {
    /// What changed in a document.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DocEvent: u16 {
        /// The cursor has moved.
        const CURSOR_MOVED = 1;
        /// The viewport should center on the cursor.
        const CENTRALIZE = 1 << 1;
        /// The viewport should page up.
        const PAGE_UP = 1 << 2;
        /// The viewport should page down.
        const PAGE_DOWN = 1 << 3;
        /// Text has likely changed.
        const EDITED = 1 << 4;
        /// Savedness or another state of the document changed.
        const CHANGED_STATE = 1 << 5;
        /// The document was just opened.
        const OPENED = 1 << 6;
        /// Folding was switched or rows were unfolded.
        const FOLDED = 1 << 9;
        /// About to be saved. Observers may still edit.
        const BEFORE_SAVE = 1 << 11;
        const AFTER_SAVE = 1 << 12;
        /// Enter was pressed.
        const NEWLINE = 1 << 13;
    }
}

/// Per-document settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocOptions {
    /// Indent width in spaces; zero or negative indents with one tab.
    pub tabdef: i32,
    /// Single-line comment marker of the document's language.
    pub comment_marker: Option<String>,
    pub read_only: bool,
    /// Temporary documents show a fixed title and no unsaved marker.
    pub temporary: bool,
    /// Rows moved by page up/down.
    pub page_size: usize,
    /// Strip trailing blanks when saving.
    pub trim_on_save: bool,
}

impl Default for DocOptions {
    fn default() -> Self {
        Self {
            tabdef: 2,
            comment_marker: None,
            read_only: false,
            temporary: false,
            page_size: 20,
            trim_on_save: false,
        }
    }
}

impl DocOptions {
    #[must_use]
    pub fn tabdef(mut self, tabdef: i32) -> Self {
        self.tabdef = tabdef;
        self
    }

    #[must_use]
    pub fn comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    #[must_use]
    pub fn temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn trim_on_save(mut self, trim: bool) -> Self {
        self.trim_on_save = trim;
        self
    }
}

/// Outcome of a search update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DocSearchResults {
    pub num_results: usize,
    /// Index of the result the cursor now sits on.
    pub current: Option<usize>,
    /// Location of that result.
    pub location: Option<CursorLocation>,
}

/// Capability set shared by every document kind.
///
/// Mutating handlers return [`Error::ReadOnly`](crate::Error::ReadOnly) on a
/// read-only document. Handlers a document kind does not support are no-ops.
pub trait Doc {
    fn text_buffer(&self) -> &TextBuffer;

    fn cursor(&self) -> CursorLocation;

    fn selection(&self) -> Option<SelectionInfo>;

    fn short_title(&self) -> String;

    fn long_title(&self) -> String {
        self.short_title()
    }

    fn hooks(&self) -> &HookSource<DocEvent>;

    /// Perform a keyboard action. `flow` is the current layout, if any.
    fn handle_action(&mut self, action: DocAction, shift: bool, flow: Option<&FlowGrid>) -> Result<()>;

    /// Handle a key with no bound action: typing, tab, backspace, enter.
    fn handle_char(&mut self, key: KeyEvent) -> Result<()>;

    /// Route a key to [`handle_action`](Self::handle_action) or
    /// [`handle_char`](Self::handle_char).
    fn handle_key(&mut self, key: KeyEvent, flow: Option<&FlowGrid>) -> Result<()> {
        match DocAction::from_key(key) {
            Some(action) => self.handle_action(action, key.shift(), flow),
            None => self.handle_char(key),
        }
    }

    fn handle_mouse(&mut self, _row: usize, _col: usize, _shift: bool, _double_click: bool) {}

    fn handle_undo(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_copy(&self) -> String {
        String::new()
    }

    fn handle_cut(&mut self) -> Result<String> {
        Ok(String::new())
    }

    fn handle_paste(&mut self, text: &str) -> Result<()>;

    fn handle_select_all(&mut self) {}

    fn handle_kill(&mut self) -> Result<String> {
        Ok(String::new())
    }

    /// Update the search for `term` and move to the current result.
    ///
    /// With `advance`, a result under the cursor is skipped in the search
    /// direction; results wrap around at both ends.
    fn handle_search(
        &mut self,
        _term: &str,
        _settings: SearchSettings,
        _backwards: bool,
        _advance: bool,
    ) -> DocSearchResults {
        DocSearchResults::default()
    }

    /// Replace every match; returns the count.
    fn handle_replace_all(
        &mut self,
        _term: &str,
        _settings: SearchSettings,
        _replacement: &str,
    ) -> Result<usize> {
        Ok(0)
    }

    fn handle_comment(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_uncomment(&mut self) -> Result<()> {
        Ok(())
    }

    /// Switch folding mode on or off.
    fn handle_fold(&mut self, _enabled: bool) {}

    fn handle_escape(&mut self) {}
}
