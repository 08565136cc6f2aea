//! Fuzz target for editing sequences.
//!
//! Applies arbitrary key presses and clipboard operations to a document,
//! then undoes everything. The original text must come back.

#![no_main]

use arbitrary::Arbitrary;
use doctext::doc::{Doc, DocAction, FileDoc, KeyEvent};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Type(char),
    Action(u8, bool),
    Paste(String),
    Cut,
    Kill,
    Click(u8, u8, bool),
    Fold(bool),
}

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    ops: Vec<Op>,
}

const ACTIONS: [DocAction; 18] = [
    DocAction::MoveDown,
    DocAction::MoveUp,
    DocAction::MoveLeft,
    DocAction::SkipLeft,
    DocAction::MoveRight,
    DocAction::SkipRight,
    DocAction::SkipDown,
    DocAction::SkipUp,
    DocAction::MovePageUp,
    DocAction::MovePageDown,
    DocAction::MoveHome,
    DocAction::MoveEnd,
    DocAction::MoveHomeFile,
    DocAction::MoveEndFile,
    DocAction::DeleteForward,
    DocAction::Indent,
    DocAction::Unindent,
    DocAction::DeleteWord,
];

fuzz_target!(|input: Input| {
    let original = input.text.replace('\r', "");
    let mut doc = FileDoc::with_text(&original);

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::Type(c) => {
                let _ = doc.handle_char(KeyEvent::char(c));
            }
            Op::Action(i, shift) => {
                let action = ACTIONS[usize::from(i) % ACTIONS.len()];
                let _ = doc.handle_action(action, shift, None);
            }
            Op::Paste(s) => {
                let _ = doc.handle_paste(&s.replace('\r', ""));
            }
            Op::Cut => {
                let _ = doc.handle_cut();
            }
            Op::Kill => {
                let _ = doc.handle_kill();
            }
            Op::Click(row, col, shift) => doc.handle_mouse(row.into(), col.into(), shift, false),
            Op::Fold(enabled) => doc.handle_fold(enabled),
        }
        assert!(doc.text_buffer().check(doc.cursor()));
    }

    while doc.file().has_unsaved_edits() {
        doc.handle_undo().unwrap();
    }
    assert_eq!(doc.text_buffer().to_string(), original);
});
