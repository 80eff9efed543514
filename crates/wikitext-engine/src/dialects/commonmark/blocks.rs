use std::sync::LazyLock;

use regex::Regex;

use crate::builder::BlockType;
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed, ListLine};

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^( *)(?:[*+-]|(\d{1,9})[.)])(?:[ \t]+|$)").expect("Invalid CommonMark list regex")
});

/// Start of an HTML block that may interrupt a paragraph: a comment or a
/// block-level tag.
pub(super) static HTML_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^ {0,3}(?:<!--|</?(?:address|article|aside|blockquote|details|div|dl|fieldset|figcaption|figure|footer|form|h[1-6]|header|hr|li|main|nav|ol|p|pre|section|table|tbody|td|th|thead|tr|ul|script|style)(?:[\s/>]|$))",
    )
    .expect("Invalid CommonMark HTML block regex")
});

/// Any complete open or closing tag alone on its line.
pub(super) static HTML_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^ {0,3}(?:<[a-z][a-z0-9-]*(?:\s+[a-z_:][a-z0-9_.:-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*\s*/?>|</[a-z][a-z0-9-]*\s*>)\s*$"#,
    )
    .expect("Invalid CommonMark HTML tag regex")
});

/// `-`, `+` and `*` bullets and `1.` or `1)` numbers. Nesting follows the
/// indentation of the marker; an ordered list keeps its first number.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let number = captures.get(2);
    let kind = if number.is_some() {
        BlockType::NumericList
    } else {
        BlockType::BulletedList
    };
    let mut item = ListLine::new(vec![kind], BlockType::ListItem, captures.get(0)?.end());
    item.indent = captures.get(1)?.len();
    if let Some(start) = number.and_then(|n| n.as_str().parse::<u64>().ok())
        && start != 1
    {
        item.attributes.list_mut().start = Some(start);
    }
    Some(item)
}

/// Raw HTML lines up to the next blank line, passed through unescaped.
#[derive(Debug)]
pub struct HtmlBlock {
    start: &'static Regex,
    lines: usize,
    closed: bool,
}

impl HtmlBlock {
    pub fn new(start: &'static Regex) -> Self {
        Self {
            start,
            lines: 0,
            closed: false,
        }
    }
}

impl Block for HtmlBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::RawHtml
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.start.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if line.trim().is_empty() {
            self.close(cx);
            return Consumed::Line;
        }
        if self.lines > 0 {
            cx.previous_line_terminator();
        }
        if cx.options().escape_html {
            cx.characters(offset..line.len());
        } else {
            cx.set_segment(offset, line.len());
            cx.characters_unescaped(&line[offset..]);
        }
        self.lines += 1;
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}
