use std::ops::Range;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// Consecutive rows such as `||head||head||` and `|cell|cell|`.
///
/// `||` opens a header cell and `|` a normal one. A `|` inside `[...]`
/// belongs to a link and does not end the cell.
#[derive(Debug, Default)]
pub struct TableBlock {
    started: bool,
    closed: bool,
}

impl TableBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Offset of the `|` that ends the cell starting at `start`.
fn cell_end(line: &str, start: usize) -> usize {
    let mut depth = 0usize;
    for (i, c) in line[start..].char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => return start + i,
            _ => {}
        }
    }
    line.len()
}

/// Cells of a row as `(header, content range)`, content trimmed.
pub fn row_cells(line: &str) -> Vec<(bool, Range<usize>)> {
    let mut cells = Vec::new();
    let mut pos = line.len() - line.trim_start().len();
    while pos < line.len() {
        let header = line[pos..].starts_with("||");
        let start = pos + if header { 2 } else { 1 };
        let end = cell_end(line, start);
        let text = &line[start..end];
        if end == line.len() && text.trim().is_empty() {
            break;
        }
        let leading = text.len() - text.trim_start().len();
        let trimmed = text.trim().len();
        cells.push((header, start + leading..start + leading + trimmed));
        pos = end;
    }
    cells
}

impl Block for TableBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Table
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && is_row(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if offset > 0 || !is_row(line) {
            self.close(cx);
            return if line.trim().is_empty() {
                Consumed::Line
            } else {
                Consumed::UpTo(offset)
            };
        }
        cx.set_segment(0, line.len());
        if !self.started {
            cx.begin_block(BlockType::Table, &Attributes::new());
            self.started = true;
        }
        cx.begin_block(BlockType::TableRow, &Attributes::new());
        for (header, content) in row_cells(line) {
            let kind = if header {
                BlockType::TableCellHeader
            } else {
                BlockType::TableCellNormal
            };
            cx.set_segment(content.start, content.end);
            cx.begin_block(kind, &Attributes::new());
            cx.emit_markup_line(content.clone());
            cx.set_segment(content.end, content.end);
            cx.end_block();
        }
        cx.set_segment(line.len(), line.len());
        cx.end_block();
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        if self.started {
            cx.end_block();
        }
        self.closed = true;
    }
}
