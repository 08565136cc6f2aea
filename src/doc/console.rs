//! An output log with an editable prompt line.

use std::collections::VecDeque;

use super::{Doc, DocAction, DocEvent, KeyCode, KeyEvent};
use crate::error::Result;
use crate::hooks::HookSource;
use crate::text::{CursorLocation, Editor, FlowGrid, SelectionInfo, TextBuffer, TextView, ViewState};

/// Output lines kept before the oldest are dropped.
pub const MAX_OUTPUT_LINES: usize = 1000;
/// Submitted lines remembered for history navigation.
pub const MAX_HISTORY: usize = 200;

const DEFAULT_PROMPT: &str = " > ";

/// A console: append-only output followed by the prompt and the input line.
///
/// The last row of [`text_buffer`](Doc::text_buffer) always shows the prompt
/// and the line being typed. Submitted lines are echoed into the output and
/// queued for [`take_input`](Self::take_input).
#[derive(Debug)]
pub struct ConsoleDoc {
    output: TextBuffer,
    /// Where the prompt row begins.
    text_end: CursorLocation,
    line: TextBuffer,
    line_state: ViewState,
    prompt: String,
    history: Vec<String>,
    /// 0 is the line being typed, `n` the n-th newest history entry.
    current_history: usize,
    current_line: String,
    submitted: VecDeque<String>,
    hooks: HookSource<DocEvent>,
}

impl Default for ConsoleDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDoc {
    #[must_use]
    pub fn new() -> Self {
        let mut console = Self {
            output: TextBuffer::new(),
            text_end: CursorLocation::default(),
            line: TextBuffer::new(),
            line_state: ViewState::default(),
            prompt: DEFAULT_PROMPT.to_string(),
            history: Vec::new(),
            current_history: 0,
            current_line: String::new(),
            submitted: VecDeque::new(),
            hooks: HookSource::new(),
        };
        console.render_line();
        console
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self.render_line();
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The line being typed.
    #[must_use]
    pub fn input_line(&self) -> String {
        self.line.to_string()
    }

    /// Submitted lines, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Pop the oldest submitted line not yet consumed.
    pub fn take_input(&mut self) -> Option<String> {
        self.submitted.pop_front()
    }

    /// Append `contents` to the output, above the prompt.
    pub fn console_output(&mut self, contents: &str, markup: u8) {
        self.clear_line();
        self.output.append(contents, markup);
        self.output.trim_lines_to_size(MAX_OUTPUT_LINES);
        self.text_end = self.output.cursor_end();
        self.append_line();
        self.emit(DocEvent::EDITED | DocEvent::CURSOR_MOVED);
    }

    fn emit(&self, events: DocEvent) {
        tracing::trace!(?events, "console event");
        self.hooks.call(&events);
    }

    fn clear_line(&mut self) {
        let end = self.output.cursor_end();
        let mut editor = Editor::new(&mut self.output, None, self.text_end);
        editor.remove_text(self.text_end, end);
    }

    fn append_line(&mut self) {
        let line = self.line.to_string();
        self.output.append(&self.prompt, 0);
        self.output.append(&line, 0);
    }

    /// Redraw the prompt row from the input line.
    fn render_line(&mut self) {
        self.clear_line();
        self.append_line();
    }

    fn update_output(&mut self) {
        self.render_line();
        self.emit(DocEvent::EDITED | DocEvent::CURSOR_MOVED);
    }

    fn line_view<R>(&mut self, f: impl FnOnce(&mut TextView<'_>) -> R) -> R {
        let mut view = TextView::with_state(&mut self.line, self.line_state);
        let result = f(&mut view);
        self.line_state = view.state();
        result
    }

    fn submit(&mut self) {
        let input = self.line.to_string();
        self.line.from_utf8("");
        self.line_state = ViewState::default();

        self.console_output(&format!("{}{input}\n", self.prompt), 0);
        tracing::debug!(input = %input, "console input");

        if self.history.last() != Some(&input) {
            self.history.push(input.clone());
        }
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.current_history = 0;
        self.submitted.push_back(input);
    }

    fn history_slot(&mut self) -> Option<&mut String> {
        match self.current_history {
            0 => Some(&mut self.current_line),
            n => {
                let len = self.history.len();
                len.checked_sub(n).map(|i| &mut self.history[i])
            }
        }
    }

    fn update_from_history(&mut self) {
        let text = self.history_slot().map(|s| s.clone()).unwrap_or_default();
        self.line.from_utf8(&text);
        self.line_state = ViewState::new(self.line.cursor_end());
        self.update_output();
    }

    fn history_up(&mut self) {
        let text = self.line.to_string();
        match self.history_slot() {
            Some(slot) => *slot = text,
            None => return,
        }
        if self.current_history < self.history.len() {
            self.current_history += 1;
        }
        self.update_from_history();
    }

    fn history_down(&mut self) {
        if self.current_history == 0 {
            return;
        }
        let text = self.line.to_string();
        match self.history_slot() {
            Some(slot) => *slot = text,
            None => return,
        }
        self.current_history -= 1;
        self.update_from_history();
    }
}

impl Doc for ConsoleDoc {
    fn text_buffer(&self) -> &TextBuffer {
        &self.output
    }

    fn cursor(&self) -> CursorLocation {
        let mut cl = self.text_end;
        cl.col += self.prompt.chars().count() + self.line_state.cursor.col;
        cl
    }

    fn selection(&self) -> Option<SelectionInfo> {
        None
    }

    fn short_title(&self) -> String {
        "Console".to_string()
    }

    fn hooks(&self) -> &HookSource<DocEvent> {
        &self.hooks
    }

    fn handle_action(&mut self, action: DocAction, shift: bool, _flow: Option<&FlowGrid>) -> Result<()> {
        match action {
            DocAction::MoveUp => self.history_up(),
            DocAction::MoveDown => self.history_down(),
            DocAction::MoveLeft => {
                self.line_view(|v| v.cursor_left(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::MoveRight => {
                self.line_view(|v| v.cursor_right(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::MoveHome => {
                self.line_view(|v| v.home(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::MoveEnd => {
                self.line_view(|v| v.end(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::SkipLeft => {
                self.line_view(|v| v.skip_left(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::SkipRight => {
                self.line_view(|v| v.skip_right(shift));
                self.emit(DocEvent::CURSOR_MOVED);
            }
            DocAction::DeleteForward => {
                self.line_view(|v| v.delete_forward());
                self.emit(DocEvent::CHANGED_STATE);
                self.update_output();
            }
            DocAction::DeleteWord => {
                self.line_view(|v| v.delete_word());
                self.emit(DocEvent::CHANGED_STATE);
                self.update_output();
            }
            // No pages or indentation on a single input line.
            _ => {}
        }
        Ok(())
    }

    fn handle_char(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Backspace => self.line_view(|v| v.delete_backward()),
            KeyCode::Enter => {
                self.submit();
                return Ok(());
            }
            KeyCode::Char(c) if !c.is_control() => self.line_view(|v| v.insert_char(c)),
            _ => return Ok(()),
        }
        self.update_output();
        Ok(())
    }

    /// Line breaks in `text` become spaces; the prompt holds one line.
    fn handle_paste(&mut self, text: &str) -> Result<()> {
        let flat: String = text
            .chars()
            .filter(|&c| c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.line_view(|v| v.paste(&flat));
        self.update_output();
        Ok(())
    }
}
