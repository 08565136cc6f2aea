//! An editable text file presented as a document.

use std::path::Path;

use super::{Doc, DocAction, DocEvent, DocOptions, DocSearchResults, KeyCode, KeyEvent};
use crate::error::{Error, Result};
use crate::hooks::HookSource;
use crate::text::{
    CursorLocation, FlowGrid, SearchSettings, SelectionInfo, TextBuffer, TextFile, TextView,
    ViewState,
};

const ELIDE_PATH_AT: usize = 50;

/// Shorten `s` to `max` characters, marking the cut with `...`.
fn elide_right(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// A [`TextFile`] with a persistent view, options and observers.
#[derive(Debug)]
pub struct FileDoc {
    file: TextFile,
    state: ViewState,
    options: DocOptions,
    title: Option<String>,
    folded: bool,
    hooks: HookSource<DocEvent>,
}

impl Default for FileDoc {
    fn default() -> Self {
        Self::new(TextFile::new())
    }
}

impl FileDoc {
    #[must_use]
    pub fn new(file: TextFile) -> Self {
        let doc = Self {
            file,
            state: ViewState::default(),
            options: DocOptions::default(),
            title: None,
            folded: false,
            hooks: HookSource::new(),
        };
        doc.emit(DocEvent::OPENED);
        doc
    }

    /// An untitled document with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self::new(TextFile::with_text(text))
    }

    /// Open the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = TextFile::new();
        file.load(path)?;
        Ok(Self::new(file))
    }

    /// A read-only scratch document with a fixed title.
    #[must_use]
    pub fn temporary(title: impl Into<String>, contents: &str) -> Self {
        let mut doc = Self::with_text(contents);
        doc.title = Some(title.into());
        doc.options.read_only = true;
        doc.options.temporary = true;
        doc
    }

    #[must_use]
    pub fn with_options(mut self, options: DocOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &DocOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DocOptions {
        &mut self.options
    }

    #[must_use]
    pub fn file(&self) -> &TextFile {
        &self.file
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Run `f` on a view over the file, keeping the view state afterwards.
    pub fn view<R>(&mut self, f: impl FnOnce(&mut TextView<'_>) -> R) -> R {
        let (buffer, journal) = self.file.parts_mut();
        let mut view = TextView::with_state(buffer, self.state).journal(journal);
        let result = f(&mut view);
        self.state = view.state();
        result
    }

    fn emit(&self, events: DocEvent) {
        tracing::trace!(?events, "doc event");
        self.hooks.call(&events);
    }

    fn check_writable(&self) -> Result<()> {
        if self.options.read_only {
            tracing::warn!(title = %self.short_title(), "read-only document can't be edited");
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    fn momentum_down(&mut self, shift: bool) {
        if self.folded {
            self.view(|v| v.folded_momentum_down(shift));
        }
    }

    fn momentum_up(&mut self, shift: bool) {
        if self.folded {
            self.view(|v| v.folded_momentum_up(shift));
        }
    }

    fn title_prefix(&self) -> String {
        let mut title = String::new();
        if self.file.has_unsaved_edits() {
            title.push('*');
        }
        title
    }

    pub fn handle_select_word(&mut self) {
        self.view(|v| v.select_word());
        self.emit(DocEvent::CURSOR_MOVED);
    }

    /// Move to `(row, col)` and center the viewport on it.
    pub fn handle_jump_to(&mut self, row: usize, col: usize) {
        self.view(|v| v.mouse(row, col, false));
        self.momentum_up(false);
        self.emit(DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE);
    }

    /// Save to the file's path.
    pub fn handle_save(&mut self) -> Result<()> {
        self.file.check_savable()?;
        self.emit(DocEvent::BEFORE_SAVE);
        self.file.save(self.options.trim_on_save)?;
        self.view(|v| v.fix());
        self.emit(
            DocEvent::AFTER_SAVE
                | DocEvent::EDITED
                | DocEvent::CURSOR_MOVED
                | DocEvent::CHANGED_STATE,
        );
        if self.options.read_only && self.options.temporary {
            self.options.read_only = false;
            self.options.temporary = false;
        }
        Ok(())
    }

    /// Save under a new path. A temporary scratch document becomes a
    /// regular editable one.
    pub fn handle_save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.file.set_path(path.as_ref());
        if self.options.read_only && self.options.temporary {
            self.options.read_only = false;
            self.options.temporary = false;
        }
        self.handle_save()
    }

    /// Replace the match under the cursor, then move to the next one.
    pub fn handle_replace(
        &mut self,
        term: &str,
        settings: SearchSettings,
        replacement: &str,
    ) -> Result<DocSearchResults> {
        self.check_writable()?;
        let found = self.handle_search(term, settings, false, false);
        if found.num_results == 0 {
            return Ok(found);
        }
        self.view(|v| v.replace(term, replacement));
        self.momentum_up(false);
        self.emit(
            DocEvent::EDITED | DocEvent::CHANGED_STATE | DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE,
        );
        Ok(self.handle_search(term, settings, false, false))
    }

    /// Replace the identifier prefix left of the cursor with `completion`.
    /// Returns false when `completion` does not extend that prefix.
    pub fn handle_complete(&mut self, completion: &str) -> Result<bool> {
        self.check_writable()?;
        let applied = self.view(|v| {
            let prefix = v.identifier_left();
            if !completion.starts_with(&prefix) {
                return false;
            }
            v.select_word_left();
            v.paste(completion);
            true
        });
        if applied {
            self.emit(DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE);
        }
        Ok(applied)
    }

    fn comment_marker(&self) -> Option<String> {
        let marker = self.options.comment_marker.clone();
        if marker.as_deref().is_none_or(str::is_empty) {
            tracing::warn!("no single-line comment marker for this document");
            return None;
        }
        marker
    }
}

impl Doc for FileDoc {
    fn text_buffer(&self) -> &TextBuffer {
        self.file.buffer()
    }

    fn cursor(&self) -> CursorLocation {
        self.state.cursor
    }

    fn selection(&self) -> Option<SelectionInfo> {
        self.state.selection()
    }

    fn short_title(&self) -> String {
        if self.options.temporary {
            return self.title.clone().unwrap_or_default();
        }
        let mut title = self.title_prefix();
        title.push_str(&self.file.file_name().unwrap_or_else(|| "Untitled".to_string()));
        title
    }

    fn long_title(&self) -> String {
        if self.options.temporary {
            return self.title.clone().unwrap_or_default();
        }
        let mut title = self.title_prefix();
        match (self.file.file_name(), self.file.path()) {
            (Some(name), Some(path)) => {
                title.push_str(&name);
                title.push_str(" [");
                title.push_str(&elide_right(&path.display().to_string(), ELIDE_PATH_AT));
                title.push(']');
            }
            _ => title.push_str("Untitled"),
        }
        title
    }

    fn hooks(&self) -> &HookSource<DocEvent> {
        &self.hooks
    }

    fn handle_action(&mut self, action: DocAction, shift: bool, flow: Option<&FlowGrid>) -> Result<()> {
        if action.is_edit() {
            self.check_writable()?;
        }
        let page_size = self.options.page_size;
        let tabdef = self.options.tabdef;

        let events = match action {
            DocAction::MoveDown => {
                self.view(|v| v.cursor_down(shift, flow));
                self.momentum_down(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveUp => {
                self.view(|v| v.cursor_up(shift, flow));
                self.momentum_up(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveLeft => {
                self.view(|v| v.cursor_left(shift));
                self.momentum_up(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveRight => {
                self.view(|v| v.cursor_right(shift));
                self.momentum_down(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::SkipLeft => {
                self.view(|v| v.skip_left(shift));
                self.momentum_up(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::SkipRight => {
                self.view(|v| v.skip_right(shift));
                self.momentum_down(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::SkipUp if self.folded => {
                self.view(|v| v.break_fold_up());
                DocEvent::FOLDED | DocEvent::CENTRALIZE | DocEvent::CURSOR_MOVED
            }
            DocAction::SkipUp => {
                self.view(|v| v.skip_up(shift));
                DocEvent::CURSOR_MOVED
            }
            DocAction::SkipDown if self.folded => {
                self.view(|v| v.break_fold_down());
                DocEvent::FOLDED | DocEvent::CENTRALIZE | DocEvent::CURSOR_MOVED
            }
            DocAction::SkipDown => {
                self.view(|v| v.skip_down(shift));
                DocEvent::CURSOR_MOVED
            }
            DocAction::MovePageUp => {
                self.view(|v| v.page_up(page_size, shift, flow));
                self.momentum_up(shift);
                DocEvent::PAGE_UP | DocEvent::CURSOR_MOVED
            }
            DocAction::MovePageDown => {
                self.view(|v| v.page_down(page_size, shift, flow));
                self.momentum_down(shift);
                DocEvent::PAGE_DOWN | DocEvent::CURSOR_MOVED
            }
            DocAction::MoveHome => {
                self.view(|v| v.home(shift));
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveEnd => {
                self.view(|v| v.end(shift));
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveHomeFile => {
                self.view(|v| v.home_file(shift));
                self.momentum_down(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::MoveEndFile => {
                self.view(|v| v.end_file(shift));
                self.momentum_up(shift);
                DocEvent::CURSOR_MOVED
            }
            DocAction::DeleteForward => {
                self.view(|v| v.delete_forward());
                DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE
            }
            DocAction::Indent => {
                self.view(|v| v.tab(tabdef));
                DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE
            }
            DocAction::Unindent => {
                self.view(|v| v.untab(tabdef));
                DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE
            }
            DocAction::DeleteWord => {
                self.view(|v| v.delete_word());
                DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE
            }
        };
        self.emit(events);
        Ok(())
    }

    fn handle_char(&mut self, key: KeyEvent) -> Result<()> {
        self.check_writable()?;
        let tabdef = self.options.tabdef;
        let mut events = DocEvent::EDITED | DocEvent::CHANGED_STATE | DocEvent::CURSOR_MOVED;

        match key.code {
            KeyCode::Tab if key.ctrl() => self.view(|v| v.insert_char('\t')),
            KeyCode::Tab if key.shift() => self.view(|v| v.untab(tabdef)),
            KeyCode::Tab => self.view(|v| v.tab(tabdef)),
            KeyCode::BackTab => self.view(|v| v.untab(tabdef)),
            KeyCode::Backspace => {
                self.view(|v| v.delete_backward());
                self.momentum_up(false);
            }
            KeyCode::Enter => {
                self.view(|v| v.newline());
                events |= DocEvent::NEWLINE;
            }
            KeyCode::Char(c) if !c.is_control() => self.view(|v| v.insert_char(c)),
            _ => return Ok(()),
        }
        self.emit(events);
        Ok(())
    }

    fn handle_mouse(&mut self, row: usize, col: usize, shift: bool, double_click: bool) {
        self.view(|v| {
            v.mouse(row, col, shift);
            if double_click {
                v.select_word();
            }
        });
        self.momentum_up(shift);
        self.emit(DocEvent::CURSOR_MOVED);
    }

    fn handle_undo(&mut self) -> Result<()> {
        self.check_writable()?;
        self.view(|v| v.undo());
        self.momentum_up(false);
        self.emit(
            DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE | DocEvent::CHANGED_STATE | DocEvent::EDITED,
        );
        Ok(())
    }

    fn handle_copy(&self) -> String {
        self.state
            .selection()
            .map(|si| self.file.buffer().selection_as_string(&si))
            .unwrap_or_default()
    }

    fn handle_cut(&mut self) -> Result<String> {
        self.check_writable()?;
        let text = self.view(|v| v.cut());
        self.momentum_up(false);
        if !text.is_empty() {
            self.emit(
                DocEvent::CURSOR_MOVED
                    | DocEvent::CENTRALIZE
                    | DocEvent::CHANGED_STATE
                    | DocEvent::EDITED,
            );
        }
        Ok(text)
    }

    fn handle_paste(&mut self, text: &str) -> Result<()> {
        self.check_writable()?;
        self.view(|v| v.paste(text));
        self.momentum_up(false);
        self.emit(
            DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE | DocEvent::CHANGED_STATE | DocEvent::EDITED,
        );
        Ok(())
    }

    fn handle_select_all(&mut self) {
        self.view(|v| v.select_all());
        self.momentum_up(true);
        self.emit(DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE);
    }

    fn handle_kill(&mut self) -> Result<String> {
        self.check_writable()?;
        let text = self.view(|v| v.kill());
        self.momentum_down(false);
        self.emit(
            DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE | DocEvent::CHANGED_STATE | DocEvent::EDITED,
        );
        Ok(text)
    }

    fn handle_search(
        &mut self,
        term: &str,
        settings: SearchSettings,
        backwards: bool,
        advance: bool,
    ) -> DocSearchResults {
        if term.is_empty() {
            self.emit(DocEvent::CURSOR_MOVED);
            return DocSearchResults::default();
        }
        let results = self.file.buffer().search(term, settings);
        let n = results.len();
        if n == 0 {
            self.emit(DocEvent::CURSOR_MOVED);
            return DocSearchResults::default();
        }

        let cursor = self.state.cursor;
        let first_ahead = results.iter().position(|sr| sr.start() >= cursor);
        let current = match first_ahead {
            Some(i) if results[i].start() == cursor && !advance => i,
            Some(i) if backwards => (i + n - 1) % n,
            Some(i) if results[i].start() == cursor => (i + 1) % n,
            Some(i) => i,
            None if backwards => n - 1,
            None => 0,
        };

        let hit = results[current].start();
        self.view(|v| v.mouse(hit.row, hit.col, false));
        self.emit(DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE);
        DocSearchResults {
            num_results: n,
            current: Some(current),
            location: Some(hit),
        }
    }

    fn handle_replace_all(
        &mut self,
        term: &str,
        settings: SearchSettings,
        replacement: &str,
    ) -> Result<usize> {
        self.check_writable()?;
        let count = self.view(|v| v.replace_all(term, settings, replacement));
        self.momentum_up(false);
        self.emit(
            DocEvent::EDITED | DocEvent::CHANGED_STATE | DocEvent::CURSOR_MOVED | DocEvent::CENTRALIZE,
        );
        Ok(count)
    }

    fn handle_comment(&mut self) -> Result<()> {
        self.check_writable()?;
        let Some(marker) = self.comment_marker() else {
            return Ok(());
        };
        self.view(|v| v.comment(&marker));
        self.emit(DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE);
        Ok(())
    }

    fn handle_uncomment(&mut self) -> Result<()> {
        self.check_writable()?;
        let Some(marker) = self.comment_marker() else {
            return Ok(());
        };
        self.view(|v| v.uncomment(&marker));
        self.emit(DocEvent::EDITED | DocEvent::CURSOR_MOVED | DocEvent::CHANGED_STATE);
        Ok(())
    }

    fn handle_fold(&mut self, enabled: bool) {
        self.folded = enabled;
        self.view(|v| {
            v.unfold_all();
            if enabled {
                let last = v.buffer().len_lines() - 1;
                v.fold(0, last);
            }
        });
        self.emit(DocEvent::CURSOR_MOVED | DocEvent::EDITED | DocEvent::FOLDED | DocEvent::CENTRALIZE);
    }

    fn handle_escape(&mut self) {
        self.view(|v| v.select_none());
        self.emit(DocEvent::CURSOR_MOVED);
    }
}
