use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::attributes::{BLOCK_ATTRIBUTES, alignment_style, apply_class_and_id, parse_block_attributes};
use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

static TABLE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^table({BLOCK_ATTRIBUTES})\.\s*$"))
        .expect("Invalid Textile table regex")
});

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\{([^}]*)\}\.\s*)?\|").expect("Invalid Textile row regex")
});

// header, colspan, rowspan, alignment, class, id, style
static CELL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(_)\.\s*)?(?:\\(\d+))?(?:/(\d+))?(<>|<|>|\^|~)?(?:\(([^#)]*)(?:#([^)]*))?\))?(?:\{([^}]*)\})?",
    )
    .expect("Invalid Textile cell regex")
});

/// Rows of `|`-separated cells, optionally introduced by a `table.` line.
///
/// A row may start with `{style}.`; a cell may start with `_.` (header),
/// `\N` (colspan), `/N` (rowspan), an alignment marker, `(class#id)` and
/// `{style}`.
#[derive(Debug, Default)]
pub struct TableBlock {
    started: bool,
    closed: bool,
}

impl TableBlock {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit_row(&self, cx: &mut ParseContext<'_>, line: &str) {
        let Some(row) = ROW.captures(line) else {
            return;
        };
        let mut attributes = Attributes::new();
        if let Some(style) = row.get(1) {
            attributes.append_style(style.as_str());
        }
        cx.set_segment(0, line.len());
        cx.begin_block(BlockType::TableRow, &attributes);

        let mut start = row.get(0).map_or(line.len(), |m| m.end());
        while start < line.len() {
            let end = line[start..].find('|').map_or(line.len(), |at| start + at);
            if end == line.len() && line[start..].trim().is_empty() {
                break;
            }
            emit_cell(cx, line, start..end);
            start = end + 1;
        }

        cx.set_segment(line.len(), line.len());
        cx.end_block();
    }
}

fn emit_cell(cx: &mut ParseContext<'_>, line: &str, cell: Range<usize>) {
    let text = &line[cell.clone()];
    let mut kind = BlockType::TableCellNormal;
    let mut attributes = Attributes::new();
    let mut content = cell.start;
    if let Some(prefix) = CELL_PREFIX.captures(text) {
        if prefix.get(1).is_some() {
            kind = BlockType::TableCellHeader;
        }
        if let Some(colspan) = prefix.get(2).and_then(|m| m.as_str().parse().ok()) {
            attributes.table_cell_mut().colspan = Some(colspan);
        }
        if let Some(rowspan) = prefix.get(3).and_then(|m| m.as_str().parse().ok()) {
            attributes.table_cell_mut().rowspan = Some(rowspan);
        }
        if let Some(alignment) = prefix.get(4) {
            attributes.append_style(alignment_style(alignment.as_str()));
        }
        if let Some(class) = prefix.get(5) {
            apply_class_and_id(&mut attributes, class.as_str());
        }
        if let Some(id) = prefix.get(6).filter(|id| !id.is_empty()) {
            attributes.id = Some(id.as_str().to_string());
        }
        if let Some(style) = prefix.get(7) {
            attributes.append_style(style.as_str());
        }
        let mut prefix_end = prefix.get(0).map_or(0, |m| m.end());
        if prefix_end > 0 && text[prefix_end..].starts_with(". ") {
            prefix_end += 2;
        }
        content += prefix_end;
    }

    cx.set_segment(cell.start, cell.end);
    cx.begin_block(kind, &attributes);
    cx.emit_markup_line(content..cell.end);
    cx.set_segment(cell.end, cell.end);
    cx.end_block();
}

impl Block for TableBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Table
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && (TABLE_SIGNATURE.is_match(line) || ROW.is_match(line))
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if !self.started {
            self.started = true;
            cx.set_segment(0, line.len());
            if let Some(signature) = TABLE_SIGNATURE.captures(line) {
                let attributes = parse_block_attributes(signature.get(1).map_or("", |m| m.as_str()));
                cx.begin_block(BlockType::Table, &attributes);
                return Consumed::Line;
            }
            cx.begin_block(BlockType::Table, &Attributes::new());
        }
        if offset == 0 && ROW.is_match(line) {
            self.emit_row(cx, line);
            return Consumed::Line;
        }
        self.close(cx);
        if line.trim().is_empty() {
            Consumed::Line
        } else {
            Consumed::UpTo(offset)
        }
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
