//! An editable text file: buffer, undo journal and line-ending convention.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::buffer::{LineEnding, TextBuffer};
use super::undo::UndoJournal;
use super::CursorLocation;
use crate::error::{Error, Result};

/// Owner of a [`TextBuffer`] and its [`UndoJournal`].
///
/// A fresh file starts with a save point, so it reports no unsaved edits and
/// undo never reverts past its initial content.
#[derive(Clone, Debug)]
pub struct TextFile {
    buffer: TextBuffer,
    journal: UndoJournal,
    line_ending: LineEnding,
    path: Option<PathBuf>,
}

impl Default for TextFile {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFile {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            journal: Self::fresh_journal(),
            line_ending: LineEnding::Unix,
            path: None,
        }
    }

    /// A file whose initial content is `text`, detecting its line endings.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut file = Self::new();
        file.set_contents(text);
        file
    }

    fn fresh_journal() -> UndoJournal {
        let mut journal = UndoJournal::new();
        journal.add_save_point();
        journal
    }

    fn set_contents(&mut self, text: &str) {
        self.line_ending = match LineEnding::detect(text) {
            LineEnding::Windows => LineEnding::Windows,
            _ => LineEnding::Unix,
        };
        self.buffer.from_utf8(text);
        for row in 0..self.buffer.len_lines() {
            self.buffer.line_mut(row).shrink_to_fit();
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Direct buffer access that bypasses the journal, for annotations and folds.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    #[must_use]
    pub fn journal(&self) -> &UndoJournal {
        &self.journal
    }

    /// Split borrow for building views and editors.
    pub fn parts_mut(&mut self) -> (&mut TextBuffer, &mut UndoJournal) {
        (&mut self.buffer, &mut self.journal)
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Final path component, if the file has a path.
    #[must_use]
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// A file without a path has never been saved.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.path.is_none()
    }

    /// Whether the buffer differs from the last save.
    #[must_use]
    pub fn has_unsaved_edits(&self) -> bool {
        !self.journal.is_save_point()
    }

    /// Revert the newest activity; returns the cursor it started from.
    pub fn undo(&mut self) -> Option<CursorLocation> {
        self.journal.undo(&mut self.buffer)
    }

    /// Replace the content from a reader and start a new undo history.
    ///
    /// On error the buffer and journal are left as they were.
    pub fn load_from<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = std::str::from_utf8(&bytes)?;
        self.set_contents(text);
        self.journal = Self::fresh_journal();
        tracing::debug!(lines = self.buffer.len_lines(), ending = ?self.line_ending, "loaded text");
        Ok(())
    }

    /// Write the content and record a save point.
    pub fn save_to<W: Write>(&mut self, mut writer: W, trim_trailing_whitespace: bool) -> Result<()> {
        self.check_line_ending()?;
        if trim_trailing_whitespace {
            for row in 0..self.buffer.len_lines() {
                self.buffer.line_mut(row).trim_whitespace();
            }
        }
        let text = self.buffer.to_utf8(self.line_ending);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        self.journal.add_save_point();
        Ok(())
    }

    /// Load from `path` and remember it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        self.load_from(file)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn check_line_ending(&self) -> Result<()> {
        if matches!(self.line_ending, LineEnding::Unknown | LineEnding::Mixed) {
            return Err(Error::Encoding(format!(
                "cannot save with {:?} line endings",
                self.line_ending
            )));
        }
        Ok(())
    }

    /// Fails with the error [`save`](Self::save) would report before
    /// touching the disk.
    pub fn check_savable(&self) -> Result<()> {
        self.save_path().map(|_| ())
    }

    fn save_path(&self) -> Result<&Path> {
        let Some(path) = self.path.as_deref() else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file has no path",
            )));
        };
        self.check_line_ending()?;
        Ok(path)
    }

    /// Save to the remembered path.
    pub fn save(&mut self, trim_trailing_whitespace: bool) -> Result<()> {
        let file = fs::File::create(self.save_path()?)?;
        self.save_to(std::io::BufWriter::new(file), trim_trailing_whitespace)
    }
}
