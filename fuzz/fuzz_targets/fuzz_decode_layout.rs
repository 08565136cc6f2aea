//! Fuzz target for decoding and layout.
//!
//! Arbitrary bytes are decoded, laid out with word wrap and unmapped back.
//! Nothing may panic and every unmapped location must be valid.

#![no_main]

use doctext::{FlowGrid, FlowStyle, TextBuffer, WidthPolicy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&wrap, bytes)) = data.split_first() else {
        return;
    };
    let mut buffer = TextBuffer::new();
    if buffer.from_utf8_bytes(bytes).is_err() {
        return;
    }

    let style = FlowStyle::default()
        .x_width(7)
        .word_wrap(Some(i32::from(wrap) * 4))
        .width_policy(WidthPolicy::Unicode);
    let mut grid = FlowGrid::new(style);
    grid.reflow(&buffer);

    for y in (0..grid.output_height().max(1)).step_by(5) {
        let cl = grid.unmap(13, y);
        assert!(buffer.check(cl), "unmap produced {cl}");
    }
});
