//! Folding and layout rendered as text snapshots.

use doctext::{CursorLocation, FlowGrid, FlowStyle, TextBuffer, TextView, ViewState};

const PROGRAM: &str = "\
use std::io;

fn main() {
    let a = 1;
    let b = 2;
    if a < b {
        println!(\"less\");
    }
}

fn other() {
    todo!()
}
";

/// One row per line: `F` marks folded rows, `.` visible ones.
fn render_folds(buffer: &TextBuffer) -> String {
    buffer
        .lines()
        .map(|line| {
            let mark = if line.is_folded() { 'F' } else { '.' };
            format!("{mark}|{line}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `row: y+height` for every source row.
fn render_rows(grid: &FlowGrid) -> String {
    (0..grid.num_rows())
        .map(|row| {
            let ri = grid.row_info(row);
            format!("{row}: {}+{} x{}", ri.y, ri.height, ri.num_effective_rows)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fold_all(buffer: &mut TextBuffer, cursor: CursorLocation) -> ViewState {
    let mut view = TextView::with_state(buffer, ViewState::new(cursor));
    let last = view.buffer().len_lines() - 1;
    view.fold(0, last);
    view.state()
}

#[test]
fn fold_collapses_function_bodies() {
    let mut buffer = TextBuffer::with_text(PROGRAM);
    fold_all(&mut buffer, CursorLocation::new(0, 0));
    insta::assert_snapshot!(render_folds(&buffer), @r#"
.|use std::io;
.|
.|fn main() {
F|    let a = 1;
F|    let b = 2;
F|    if a < b {
F|        println!("less");
F|    }
F|}
F|
.|fn other() {
F|    todo!()
F|}
F|
"#);
}

#[test]
fn fold_keeps_cursor_row_visible() {
    let mut buffer = TextBuffer::with_text(PROGRAM);
    let state = fold_all(&mut buffer, CursorLocation::new(4, 2));
    assert_eq!(state.cursor, CursorLocation::new(4, 2));
    assert!(!buffer.line(4).is_folded());

    let folded: Vec<usize> = (0..buffer.len_lines())
        .filter(|&row| buffer.line(row).is_folded())
        .collect();
    // Any folded run left over is at least three rows long.
    for run in folded.chunk_by(|a, b| b - a == 1) {
        assert!(run.len() >= 3, "short folded run {run:?}");
    }
}

#[test]
fn unfold_all_restores_every_row() {
    let mut buffer = TextBuffer::with_text(PROGRAM);
    fold_all(&mut buffer, CursorLocation::new(0, 0));
    let mut view = TextView::new(&mut buffer);
    view.unfold_all();
    assert!(view.buffer().lines().all(|line| !line.is_folded()));
}

#[test]
fn folded_rows_shrink_layout() {
    let mut buffer = TextBuffer::with_text("a\n  b\n  c\n  d\ne");
    fold_all(&mut buffer, CursorLocation::new(0, 0));

    let mut grid = FlowGrid::new(
        FlowStyle::default()
            .x_width(8)
            .line_height(16)
            .folded_line_height(3),
    );
    grid.reflow(&buffer);
    insta::assert_snapshot!(render_rows(&grid), @r"
0: 0+16 x1
1: 16+3 x1
2: 19+3 x1
3: 22+3 x1
4: 25+16 x1
");
    assert_eq!(grid.output_height(), 41);
    assert_eq!(grid.unmap_row(20), 2);
}

#[test]
fn wrapped_paragraph_layout() {
    let buffer = TextBuffer::with_text("one two three four five\nsix");
    let mut grid = FlowGrid::new(
        FlowStyle::default()
            .x_width(10)
            .line_height(10)
            .word_wrap(Some(100))
            .word_wrap_indent(0),
    );
    grid.reflow(&buffer);
    insta::assert_snapshot!(render_rows(&grid), @r"
0: 0+30 x3
1: 30+10 x1
");

    // Every character of the wrapped row unmaps back to itself.
    for col in 0..buffer.line(0).len() {
        let c = grid.map_to_coordinate(0, col);
        assert_eq!(grid.unmap(c.x + 1, c.y + 1), CursorLocation::new(0, col));
    }
}
