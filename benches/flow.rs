//! Layout performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use doctext::{FlowGrid, FlowStyle, TextBuffer, TextView};
use std::hint::black_box;

fn prose(lines: usize) -> TextBuffer {
    let text = (0..lines)
        .map(|i| {
            format!(
                "Paragraph {i}: the quick brown fox jumps over the lazy dog while \
                 the layout engine keeps track of every character position."
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    TextBuffer::with_text(&text)
}

fn style() -> FlowStyle {
    FlowStyle::default().x_width(8).line_height(16).folded_line_height(4)
}

fn reflow(c: &mut Criterion) {
    let buffer = prose(1_000);
    let mut group = c.benchmark_group("reflow");

    for wrap in [None, Some(400), Some(800)] {
        let label = wrap.map_or_else(|| "none".to_string(), |w| w.to_string());
        group.bench_with_input(BenchmarkId::new("wrap", label), &wrap, |b, &wrap| {
            let mut grid = FlowGrid::new(style().word_wrap(wrap));
            b.iter(|| grid.reflow(black_box(&buffer)));
        });
    }

    group.bench_function("fast_reflow_400", |b| {
        let mut grid = FlowGrid::new(style().word_wrap(Some(400)).fast_reflow(true));
        b.iter(|| grid.reflow(black_box(&buffer)));
    });

    group.finish();
}

fn queries(c: &mut Criterion) {
    let buffer = prose(1_000);
    let mut grid = FlowGrid::new(style().word_wrap(Some(400)));
    grid.reflow(&buffer);
    let height = grid.output_height();

    c.bench_function("flow_unmap", |b| {
        let mut y = 0;
        b.iter(|| {
            y = (y + 37) % height;
            black_box(grid.unmap(black_box(200), y))
        });
    });

    c.bench_function("flow_map_to_coordinate", |b| {
        b.iter(|| black_box(grid.map_to_coordinate(black_box(777), black_box(60))));
    });
}

fn folding(c: &mut Criterion) {
    let text = (0..500)
        .map(|i| format!("fn f{i}() {{\n    let a = {i};\n    let b = a + 1;\n    b\n}}\n"))
        .collect::<String>();

    c.bench_function("fold_whole_file", |b| {
        let mut buffer = TextBuffer::with_text(&text);
        let last = buffer.len_lines() - 1;
        b.iter(|| {
            let mut view = TextView::new(&mut buffer);
            view.unfold_all();
            view.fold(0, black_box(last));
        });
    });
}

criterion_group!(benches, reflow, queries, folding);
criterion_main!(benches);
