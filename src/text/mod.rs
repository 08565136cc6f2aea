//! The document text engine.
//!
//! Leaf to root:
//!
//! - [`Line`]: characters with markup tags plus an annotation slot (fold flag,
//!   syntax tokens)
//! - [`TextBuffer`]: a non-empty sequence of lines with cursor arithmetic,
//!   UTF-8 encode/decode, search and selection extraction
//! - [`UndoJournal`]: reversible line edits grouped by activity
//! - [`Editor`]: journaled mutation primitives
//! - [`TextView`]: cursor and selection state machine with the user-facing
//!   edit, navigation and folding operations
//! - [`FlowGrid`]: pixel layout with word wrap and folded rows
//!
//! [`TextFile`] bundles a buffer with its journal and line-ending convention.
//!
//! # Examples
//!
//! ```
//! use doctext::{CursorLocation, TextFile, TextView};
//!
//! let mut file = TextFile::with_text("abcd\nefgh");
//! let (buffer, journal) = file.parts_mut();
//! let mut view = TextView::new(buffer).journal(journal);
//! view.mouse(0, 2, false);
//! view.mouse(1, 3, true);
//! view.delete_backward();
//! assert_eq!(view.buffer().to_string(), "abh");
//!
//! assert!(view.undo());
//! assert_eq!(view.cursor(), CursorLocation::new(1, 3));
//! assert!(!file.has_unsaved_edits());
//! ```

mod buffer;
mod edit;
mod file;
mod flow;
mod line;
mod location;
mod search;
mod undo;
mod view;
mod word;

pub use buffer::{LineEnding, TextBuffer};
pub use edit::Editor;
pub use file::TextFile;
pub use flow::{Coordinate, EffRowInfo, FlowElement, FlowGrid, FlowStyle, RowInfo};
pub use line::{Character, Indentation, Line, LineAnnotation, MAX_MARKUP, Token};
pub use location::{CursorLocation, SelectionInfo};
pub use search::{SearchResult, SearchSettings};
pub use undo::{ActivityId, UndoEntry, UndoJournal, UndoKind};
pub use view::{TextView, ViewState};
pub use word::{WordDef, WordLoc, split_words};
