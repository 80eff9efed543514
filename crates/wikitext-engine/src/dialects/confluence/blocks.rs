use std::sync::LazyLock;

use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed, ListLine};

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*#-]+)\s+").expect("Invalid Confluence list regex"));

static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bq\.\s+").expect("Invalid Confluence quote regex"));

/// `*`, `#` and `-` markers, one per level. Four markers starting with a
/// dash are a horizontal rule, not a list.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let markers = captures.get(1)?.as_str();
    if markers.starts_with('-') && markers.len() == 4 {
        return None;
    }
    let path = markers
        .chars()
        .map(|marker| {
            if marker == '#' {
                BlockType::NumericList
            } else {
                BlockType::BulletedList
            }
        })
        .collect();
    let mut item = ListLine::new(path, BlockType::ListItem, captures.get(0)?.end());
    if markers == "-" {
        item.attributes.append_style("list-style: square");
    }
    Some(item)
}

/// `bq. text`: a quoted paragraph that runs to the next blank line.
#[derive(Debug, Default)]
pub struct QuoteBlock {
    lines: usize,
    closed: bool,
}

impl QuoteBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for QuoteBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Quote
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && QUOTE.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if self.lines == 0 {
            let content = QUOTE.find(line).map_or(line.len(), |m| m.end());
            cx.set_segment(0, line.len());
            cx.begin_block(BlockType::Quote, &Attributes::new());
            cx.begin_block(BlockType::Paragraph, &Attributes::new());
            cx.emit_markup_line(content..line.len());
            self.lines += 1;
            return Consumed::Line;
        }
        if line.trim().is_empty() {
            self.close(cx);
            return Consumed::Line;
        }
        if cx.breaks_paragraph(line, offset) {
            self.close(cx);
            return Consumed::UpTo(offset);
        }
        cx.set_segment(offset, offset);
        cx.line_break();
        cx.emit_markup_line(offset..line.len());
        self.lines += 1;
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        if self.lines > 0 {
            cx.end_block();
            cx.end_block();
        }
        self.closed = true;
    }
}

/// `key=value` pairs separated by `|`, as in `{panel:title=Notes|bgColor=#eee}`.
/// A part without `=` is returned under the empty key.
pub fn macro_parameters(params: &str) -> Vec<(&str, &str)> {
    params
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => ("", part),
        })
        .collect()
}

/// `{code:java}` or `{code:title=Foo.java|language=java}`.
pub fn code_attributes(params: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    for (key, value) in macro_parameters(params.unwrap_or("")) {
        match key {
            "" => attributes.language = Some(value.to_lowercase()),
            "language" | "lang" => attributes.language = Some(value.to_string()),
            "title" => attributes.title = Some(value.to_string()),
            _ => {}
        }
    }
    if let Some(language) = attributes.language.clone() {
        attributes.append_class(&language);
        attributes.append_class(&format!("code-{language}"));
    }
    attributes
}

pub fn noformat_attributes(params: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    for (key, value) in macro_parameters(params.unwrap_or("")) {
        if key == "title" {
            attributes.title = Some(value.to_string());
        }
    }
    attributes
}

/// Panel parameters: a title plus border and background colours.
pub fn panel_attributes(params: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    for (key, value) in macro_parameters(params.unwrap_or("")) {
        match key {
            "title" => attributes.title = Some(value.to_string()),
            "borderStyle" => attributes.append_style(&format!("border-style: {value};")),
            "borderColor" => attributes.append_style(&format!("border-color: {value};")),
            "borderWidth" => attributes.append_style(&format!("border-width: {value};")),
            "bgColor" => attributes.append_style(&format!("background-color: {value};")),
            _ => {}
        }
    }
    attributes
}
