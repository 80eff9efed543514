use std::ops::Range;

use super::blocks::{apply_common, html_attributes};
use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// `{| ... |}` tables.
///
/// `|-` starts a row, `|` and `!` lines hold normal and header cells
/// (several per line with `||` or `!!`), `|+` is a caption. A cell may
/// start with `attributes |`. Other lines continue the open cell.
#[derive(Debug, Default)]
pub struct TableBlock {
    started: bool,
    row_open: bool,
    cell_open: bool,
    pending_row: Option<Attributes>,
    closed: bool,
}

impl TableBlock {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_cell(&mut self, cx: &mut ParseContext<'_>) {
        if self.cell_open {
            cx.end_block();
            self.cell_open = false;
        }
    }

    fn close_row(&mut self, cx: &mut ParseContext<'_>) {
        self.close_cell(cx);
        if self.row_open {
            cx.end_block();
            self.row_open = false;
        }
    }

    fn ensure_row(&mut self, cx: &mut ParseContext<'_>) {
        if !self.row_open {
            let attributes = self.pending_row.take().unwrap_or_default();
            cx.begin_block(BlockType::TableRow, &attributes);
            self.row_open = true;
        }
    }

    fn emit_cells(&mut self, cx: &mut ParseContext<'_>, line: &str, start: usize, header: bool) {
        let kind = if header {
            BlockType::TableCellHeader
        } else {
            BlockType::TableCellNormal
        };
        self.ensure_row(cx);
        for cell in split_cells(line, start, header) {
            self.close_cell(cx);
            let (attributes, content) = cell_parts(line, cell.clone());
            cx.set_segment(cell.start, cell.end);
            cx.begin_block(kind, &attributes);
            self.cell_open = true;
            cx.emit_markup_line(content);
        }
    }
}

/// Table attributes on the `{|` line.
fn table_attributes(text: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in html_attributes(text) {
        if apply_common(&mut attributes, &name, &value) {
            continue;
        }
        let table = attributes.table_mut();
        match name.as_str() {
            "border" => table.border = Some(value),
            "cellpadding" => table.cellpadding = Some(value),
            "cellspacing" => table.cellspacing = Some(value),
            "width" => table.width = Some(value),
            _ => {}
        }
    }
    attributes
}

fn row_attributes(text: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in html_attributes(text) {
        if !apply_common(&mut attributes, &name, &value) && name == "align" {
            attributes.append_style(&format!("text-align: {value};"));
        }
    }
    attributes
}

fn cell_attributes(text: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in html_attributes(text) {
        if apply_common(&mut attributes, &name, &value) {
            continue;
        }
        match name.as_str() {
            "colspan" => attributes.table_cell_mut().colspan = value.parse().ok(),
            "rowspan" => attributes.table_cell_mut().rowspan = value.parse().ok(),
            "align" => attributes.table_cell_mut().align = Some(value),
            "valign" => attributes.table_cell_mut().valign = Some(value),
            "width" => attributes.append_style(&format!("width: {value};")),
            _ => {}
        }
    }
    attributes
}

/// Ranges of the cells on a cell line starting after the first marker at
/// `start`. Separators inside links do not count.
fn split_cells(line: &str, start: usize, header: bool) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut depth = 0usize;
    let mut cell_start = start;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'|' | b'!' if depth == 0 && bytes.get(i + 1) == Some(&bytes[i]) => {
                if bytes[i] == b'|' || header {
                    cells.push(cell_start..i);
                    i += 2;
                    cell_start = i;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    cells.push(cell_start..line.len());
    cells
}

/// Splits `attributes | content`; without a separator the whole cell is
/// content. Content is trimmed.
fn cell_parts(line: &str, cell: Range<usize>) -> (Attributes, Range<usize>) {
    let text = &line[cell.clone()];
    let mut depth = 0usize;
    let separator = text.char_indices().find(|&(_, c)| {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => return true,
            _ => {}
        }
        false
    });
    let (attributes, content) = match separator {
        Some((at, _)) if text[..at].contains('=') => (
            cell_attributes(&text[..at]),
            cell.start + at + 1..cell.end,
        ),
        _ => (Attributes::new(), cell),
    };
    (attributes, trimmed(line, content))
}

fn trimmed(line: &str, range: Range<usize>) -> Range<usize> {
    let text = &line[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    start..start + text.trim().len()
}

impl Block for TableBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Table
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && line.trim_start().starts_with("{|")
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        cx.set_segment(0, line.len());
        if !self.started {
            cx.begin_block(BlockType::Table, &table_attributes(&rest[2..]));
            self.started = true;
            return Consumed::Line;
        }
        if rest.starts_with("|}") {
            self.close(cx);
            return Consumed::UpTo(indent + 2);
        }
        if let Some(attributes) = rest.strip_prefix("|-") {
            self.close_row(cx);
            self.pending_row = Some(row_attributes(attributes));
            return Consumed::Line;
        }
        if rest.starts_with("|+") {
            self.close_row(cx);
            let caption = trimmed(line, indent + 2..line.len());
            cx.begin_block(BlockType::Div, &Attributes::new().with_class("caption"));
            cx.emit_markup_line(caption);
            cx.set_segment(line.len(), line.len());
            cx.end_block();
            return Consumed::Line;
        }
        if rest.starts_with('|') {
            self.emit_cells(cx, line, indent + 1, false);
            return Consumed::Line;
        }
        if rest.starts_with('!') {
            self.emit_cells(cx, line, indent + 1, true);
            return Consumed::Line;
        }
        if self.cell_open && !rest.trim().is_empty() {
            cx.previous_line_terminator();
            cx.emit_markup_line(trimmed(line, 0..line.len()));
        }
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        self.close_row(cx);
        if self.started {
            cx.end_block();
        }
        self.closed = true;
    }
}
