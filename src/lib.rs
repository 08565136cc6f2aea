//! `doctext` - document text engine for editors
//!
//! An editable, multi-line text document: a line-oriented buffer with markup
//! tags, an activity-grouped undo journal, a cursor/selection state machine
//! with the editing and navigation operations of a code editor, indentation
//! folding, and a pixel layout engine that maps buffer positions to screen
//! coordinates across word-wrapped and folded rows.
//!
//! # Examples
//!
//! ```
//! use doctext::{CursorLocation, TextBuffer, TextView, UndoJournal};
//!
//! let mut buffer = TextBuffer::with_text("fn main() {\n}");
//! let mut journal = UndoJournal::new();
//! journal.add_save_point();
//!
//! let mut view = TextView::new(&mut buffer).journal(&mut journal);
//! view.end(false);
//! view.newline();
//! view.paste("println!(\"hi\");");
//! assert_eq!(view.cursor(), CursorLocation::new(1, 15));
//!
//! view.undo();
//! view.undo();
//! assert_eq!(view.buffer().to_string(), "fn main() {\n}");
//! ```
//!
//! Layout is computed separately from the text:
//!
//! ```
//! use doctext::{FlowGrid, FlowStyle, TextBuffer};
//!
//! let buffer = TextBuffer::with_text("one two three four five six seven");
//! let mut grid = FlowGrid::new(FlowStyle::default().x_width(10).word_wrap(Some(100)));
//! grid.reflow(&buffer);
//! assert!(grid.row_info(0).num_effective_rows > 1);
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // No unsafe code is expected anywhere
#![allow(clippy::cast_possible_truncation)] // Intentional pixel coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional pixel coordinate conversions
#![allow(clippy::cast_possible_wrap)] // Column counts fit in i32
#![allow(clippy::module_name_repetitions)] // Allow text::TextBuffer etc
#![allow(clippy::struct_excessive_bools)] // Document options carry several flags
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod doc;
pub mod error;
pub mod hooks;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use hooks::{Hook, HookSource};
pub use unicode::WidthPolicy;

// Re-export the text engine
pub use text::{
    ActivityId, Character, Coordinate, CursorLocation, EffRowInfo, Editor, FlowElement, FlowGrid,
    FlowStyle, Indentation, Line, LineAnnotation, LineEnding, MAX_MARKUP, RowInfo, SearchResult,
    SearchSettings, SelectionInfo, TextBuffer, TextFile, TextView, Token, UndoEntry, UndoJournal,
    UndoKind, ViewState, WordDef, WordLoc, split_words,
};

// Re-export document types
pub use doc::{ConsoleDoc, Doc, DocAction, DocEvent, DocOptions, FileDoc};
