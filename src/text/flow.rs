//! Pixel layout of a [`TextBuffer`] with word wrap and folding.
//!
//! [`FlowGrid::reflow`] walks every character once and records its pixel
//! position. A source row that word-wraps occupies several *effective rows*;
//! a folded row uses the reduced `folded_line_height`. The grid is a cache:
//! it must be rebuilt after every buffer mutation before geometry is read.
//!
//! # Examples
//!
//! ```
//! use doctext::{FlowGrid, FlowStyle, TextBuffer};
//!
//! let buffer = TextBuffer::with_text("hello\nworld!");
//! let mut grid = FlowGrid::new(FlowStyle::default().x_width(10).line_height(15));
//! grid.reflow(&buffer);
//! assert_eq!(grid.map_to_x(1, 3), 30);
//! assert_eq!(grid.map_to_y(1, 3), 15);
//! assert_eq!(grid.output_width(), 60);
//! ```

use super::line::Line;
use super::{CursorLocation, TextBuffer};
use crate::unicode::{WidthPolicy, char_columns, is_word_char};

/// Wrap widths at or below this many pixels disable wrapping.
const MIN_WRAP_WIDTH: i32 = 40;

/// Continuation indent is dropped when it leaves fewer columns than this.
const MIN_WRAP_COLUMNS: i32 = 12;

/// Layout parameters, all in pixels unless noted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowStyle {
    pub x_width: i32,
    pub tab_width: i32,
    pub line_height: i32,
    pub folded_line_height: i32,
    /// Maximum row width; `None` disables wrapping.
    pub word_wrap_width: Option<i32>,
    /// Extra indent of continuation rows, in columns.
    pub word_wrap_indent: i32,
    /// Added to every x coordinate.
    pub x_offset: i32,
    /// Treat every word as one pixel wide to bound reflow cost.
    pub fast_reflow: bool,
    pub width_policy: WidthPolicy,
}

impl Default for FlowStyle {
    fn default() -> Self {
        Self {
            x_width: 1,
            tab_width: 4,
            line_height: 10,
            folded_line_height: 2,
            word_wrap_width: None,
            word_wrap_indent: 4,
            x_offset: 0,
            fast_reflow: false,
            width_policy: WidthPolicy::Fixed,
        }
    }
}

impl FlowStyle {
    #[must_use]
    pub fn x_width(mut self, x_width: i32) -> Self {
        self.x_width = x_width;
        self
    }

    #[must_use]
    pub fn tab_width(mut self, tab_width: i32) -> Self {
        self.tab_width = tab_width;
        self
    }

    #[must_use]
    pub fn line_height(mut self, line_height: i32) -> Self {
        self.line_height = line_height;
        self
    }

    #[must_use]
    pub fn folded_line_height(mut self, folded_line_height: i32) -> Self {
        self.folded_line_height = folded_line_height;
        self
    }

    /// Enable word wrap at `width` pixels, or disable it with `None`.
    #[must_use]
    pub fn word_wrap(mut self, width: Option<i32>) -> Self {
        self.word_wrap_width = width;
        self
    }

    #[must_use]
    pub fn word_wrap_indent(mut self, columns: i32) -> Self {
        self.word_wrap_indent = columns;
        self
    }

    #[must_use]
    pub fn x_offset(mut self, x_offset: i32) -> Self {
        self.x_offset = x_offset;
        self
    }

    #[must_use]
    pub fn fast_reflow(mut self, fast: bool) -> Self {
        self.fast_reflow = fast;
        self
    }

    #[must_use]
    pub fn width_policy(mut self, policy: WidthPolicy) -> Self {
        self.width_policy = policy;
        self
    }

    /// The wrap width if wrapping is in effect.
    #[must_use]
    pub fn effective_wrap_width(&self) -> Option<i32> {
        self.word_wrap_width.filter(|w| *w > MIN_WRAP_WIDTH)
    }

    fn char_width(&self, c: char) -> i32 {
        if c == '\t' {
            self.tab_width
        } else {
            self.x_width * i32::from(char_columns(c, self.width_policy))
        }
    }
}

/// A pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// Position and width of one laid-out character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowElement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
}

impl FlowElement {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FlowRow {
    index: usize,
    start_y: i32,
    height: i32,
    length: usize,
    num_effective_rows: usize,
}

/// Geometry of one source row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowInfo {
    /// Index of the row's first element in the flat element array.
    pub index: usize,
    /// Top, in pixels.
    pub y: i32,
    /// Total height of all effective rows.
    pub height: i32,
    pub num_effective_rows: usize,
    /// Length in characters.
    pub length: usize,
}

/// Geometry of one effective (wrapped) row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffRowInfo {
    pub y: i32,
    pub height: i32,
    /// Flat index of the source row's first element.
    pub row_index: usize,
    /// First column of this effective row.
    pub first_index: usize,
    /// Column just past the last one of this effective row.
    pub last_index: usize,
}

/// Layout cache built from a [`TextBuffer`] and a [`FlowStyle`].
#[derive(Clone, Debug, Default)]
pub struct FlowGrid {
    style: FlowStyle,
    rows: Vec<FlowRow>,
    elements: Vec<FlowElement>,
    output_width: i32,
    output_height: i32,
    revision: Option<u64>,
}

impl FlowGrid {
    #[must_use]
    pub fn new(style: FlowStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn style(&self) -> &FlowStyle {
        &self.style
    }

    /// Change layout parameters. Takes effect on the next reflow.
    pub fn set_style(&mut self, style: FlowStyle) {
        self.style = style;
        self.revision = None;
    }

    /// Widest row in pixels, or the wrap width when wrapping.
    #[must_use]
    pub fn output_width(&self) -> i32 {
        self.output_width
    }

    /// Sum of all row heights.
    #[must_use]
    pub fn output_height(&self) -> i32 {
        self.output_height
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn elements(&self) -> &[FlowElement] {
        &self.elements
    }

    /// Whether the grid was built from this exact buffer state.
    #[must_use]
    pub fn is_current(&self, buffer: &TextBuffer) -> bool {
        self.revision == Some(buffer.revision())
    }

    fn line_indent(&self, line: &Line) -> i32 {
        let mut indent = 0;
        for c in line.chars() {
            match c.ch {
                '\t' => indent += self.style.tab_width,
                ' ' => indent += self.style.x_width,
                _ => break,
            }
        }
        indent
    }

    fn word_width(&self, line: &Line, start: usize) -> i32 {
        let chars = line.chars();
        let first = chars[start].ch;
        if !is_word_char(first) {
            return self.style.char_width(first);
        }
        chars[start..]
            .iter()
            .take_while(|c| is_word_char(c.ch))
            .map(|c| self.style.char_width(c.ch))
            .sum()
    }

    /// Recompute every position from `buffer`.
    ///
    /// With word wrap, a word moves to a new effective row when it would
    /// cross the wrap width. A word wider than the room on a continuation
    /// row (wrap width less the x offset and the line's wrap indent) is
    /// broken per character instead, and a row that is still at its
    /// starting x never wraps. Indented long words therefore break earlier
    /// than a comparison against the full wrap width would give.
    pub fn reflow(&mut self, buffer: &TextBuffer) {
        self.rows.clear();
        self.elements.clear();
        self.elements.reserve(buffer.len_chars());
        self.output_width = 0;

        let style = self.style;
        let wrap = style.effective_wrap_width();
        let mut y = 0;

        for line in buffer.lines() {
            let mut x = style.x_offset;

            let mut line_indent = 0;
            if let Some(wrap_width) = wrap {
                if !style.fast_reflow {
                    line_indent = self.line_indent(line) + style.word_wrap_indent * style.x_width;
                    if line_indent > wrap_width - MIN_WRAP_COLUMNS * style.x_width {
                        line_indent = 0;
                    }
                }
            }

            let char_height = if line.is_folded() {
                style.folded_line_height
            } else {
                style.line_height
            };
            let index = self.elements.len();
            let start_y = y;
            let mut num_effective_rows = 1;

            for (j, c) in line.chars().iter().enumerate() {
                let char_width = style.char_width(c.ch);

                if let Some(wrap_width) = wrap {
                    let word_width = if style.fast_reflow {
                        1
                    } else {
                        self.word_width(line, j)
                    };
                    // A word that cannot fit on a continuation row breaks anywhere.
                    let room = wrap_width - style.x_offset - line_indent;
                    let needed = if word_width > room { char_width } else { word_width };
                    if x + needed > wrap_width && x > style.x_offset + line_indent {
                        x = style.x_offset + line_indent;
                        num_effective_rows += 1;
                        y += char_height;
                    }
                }

                self.elements.push(FlowElement {
                    x,
                    y,
                    width: char_width,
                });
                x += char_width;
            }

            self.output_width = self.output_width.max(x);
            y += char_height;

            self.rows.push(FlowRow {
                index,
                start_y,
                height: char_height * num_effective_rows as i32,
                length: line.len(),
                num_effective_rows,
            });
        }

        if let Some(wrap_width) = wrap {
            self.output_width = wrap_width;
        }
        self.output_height = y;
        self.revision = Some(buffer.revision());
    }

    /// Geometry of `row`; rows past the end are extrapolated.
    #[must_use]
    pub fn row_info(&self, row: usize) -> RowInfo {
        match self.rows.get(row) {
            Some(r) => RowInfo {
                index: r.index,
                y: r.start_y,
                height: r.height,
                num_effective_rows: r.num_effective_rows,
                length: r.length,
            },
            None => {
                tracing::warn!(row, rows = self.rows.len(), "row_info past the last row");
                RowInfo {
                    index: self.elements.len(),
                    y: self.extrapolated_y(row),
                    height: self.style.line_height,
                    num_effective_rows: 1,
                    length: 0,
                }
            }
        }
    }

    fn extrapolated_y(&self, row: usize) -> i32 {
        let (bottom, past) = self
            .rows
            .last()
            .map_or((0, row), |last| (last.start_y + last.height, row - self.rows.len()));
        bottom + past as i32 * self.style.line_height
    }

    /// Element for `(row, col)`; columns past the end extend the last element.
    #[must_use]
    pub fn map_to_element(&self, row: usize, col: usize) -> FlowElement {
        let style = &self.style;
        let Some(r) = self.rows.get(row) else {
            tracing::warn!(row, col, "map_to_element past the last row");
            return FlowElement {
                x: style.x_offset + col as i32 * style.x_width,
                y: self.extrapolated_y(row),
                width: style.x_width,
            };
        };

        if r.length == 0 {
            return FlowElement {
                x: style.x_offset + col as i32 * style.x_width,
                y: r.start_y,
                width: style.x_width,
            };
        }
        if col >= r.length {
            let last = self.elements[r.index + r.length - 1];
            return FlowElement {
                x: last.x + last.width + (col - r.length) as i32 * style.x_width,
                y: last.y,
                width: style.x_width,
            };
        }
        self.elements[r.index + col]
    }

    #[must_use]
    pub fn map_to_coordinate(&self, row: usize, col: usize) -> Coordinate {
        self.map_to_element(row, col).coordinate()
    }

    #[must_use]
    pub fn map_to_x(&self, row: usize, col: usize) -> i32 {
        self.map_to_element(row, col).x
    }

    #[must_use]
    pub fn map_to_y(&self, row: usize, col: usize) -> i32 {
        self.map_to_element(row, col).y
    }

    /// Which effective row of `row` column `col` falls on.
    #[must_use]
    pub fn effective_row(&self, row: usize, col: usize) -> usize {
        if col == 0 {
            return 0;
        }
        let ri = self.row_info(row);
        if col >= ri.length {
            return ri.num_effective_rows - 1;
        }
        let irh = (ri.height / ri.num_effective_rows as i32).max(1);
        let ty = self.elements[ri.index + col].y;
        ((ty - ri.y) / irh) as usize
    }

    /// Column range and geometry of effective row `eff_row` of `row`.
    #[must_use]
    pub fn effective_row_info(&self, row: usize, eff_row: usize) -> EffRowInfo {
        let ri = self.row_info(row);
        if eff_row >= ri.num_effective_rows || row >= self.rows.len() {
            tracing::warn!(row, eff_row, "effective row out of range");
            return EffRowInfo::default();
        }

        let irh = ri.height / ri.num_effective_rows as i32;
        let y = ri.y + irh * eff_row as i32;
        let slice = &self.elements[ri.index..ri.index + ri.length];
        EffRowInfo {
            y,
            height: irh,
            row_index: ri.index,
            first_index: slice.partition_point(|e| e.y < y),
            last_index: slice.partition_point(|e| e.y <= y),
        }
    }

    /// Column in effective row `eff_row` of `row` closest to pixel `x`.
    ///
    /// Past the right edge this is the row's last column, or the line end
    /// for the final effective row.
    #[must_use]
    pub fn effective_row_index(&self, x: i32, row: usize, eff_row: usize) -> usize {
        let eri = self.effective_row_info(row, eff_row);
        let hit = (eri.first_index..eri.last_index)
            .find(|&index| self.elements[eri.row_index + index].x >= x);
        if let Some(index) = hit {
            return index;
        }
        let ri = self.row_info(row);
        if eff_row + 1 < ri.num_effective_rows && eri.last_index > eri.first_index {
            eri.last_index - 1
        } else {
            eri.last_index
        }
    }

    /// First x coordinate of an effective row.
    #[must_use]
    pub fn effective_row_left_margin(&self, eri: &EffRowInfo) -> i32 {
        self.elements
            .get(eri.row_index + eri.first_index)
            .map_or(self.style.x_offset, |e| e.x)
    }

    /// Right edge of the last element of an effective row.
    #[must_use]
    pub fn effective_row_right_margin(&self, eri: &EffRowInfo) -> i32 {
        if eri.last_index == eri.first_index {
            return self.effective_row_left_margin(eri);
        }
        let e = self.elements[eri.row_index + eri.last_index - 1];
        e.x + e.width
    }

    /// Source row whose vertical extent reaches `y`.
    #[must_use]
    pub fn unmap_row(&self, y: i32) -> usize {
        let row = self.rows.partition_point(|r| r.start_y + r.height < y);
        row.min(self.rows.len().saturating_sub(1))
    }

    /// Cursor location nearest to pixel `(x, y)`.
    #[must_use]
    pub fn unmap(&self, x: i32, y: i32) -> CursorLocation {
        if self.rows.is_empty() {
            return CursorLocation::default();
        }

        let row = self.unmap_row(y);
        let r = self.rows[row];
        let row_height = r.height / r.num_effective_rows as i32;
        let half = self.style.x_width / 2;
        let slice = &self.elements[r.index..r.index + r.length];

        // Effective rows at or below y, scanned top to bottom.
        let mut start = slice.partition_point(|e| e.y + row_height < y);
        while start < slice.len() {
            let seg_y = slice[start].y;
            let seg_end = start + slice[start..].partition_point(|e| e.y == seg_y);
            let k = slice[start..seg_end].partition_point(|e| e.x + half <= x);
            if start + k < seg_end {
                return CursorLocation::new(row, start + k);
            }
            start = seg_end;
        }
        CursorLocation::new(row, r.length)
    }
}
