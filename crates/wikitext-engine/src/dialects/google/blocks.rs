use std::sync::LazyLock;

use regex::Regex;

use crate::builder::{Attributes, BlockType, SpanType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed, ListLine, emit_heading};

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(={1,6})\s*(.+?)\s*(={1,6})\s*$").expect("Invalid Google heading regex")
});
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s+)([*#])\s*").expect("Invalid Google list regex"));

/// `== Title ==`. The closing run must be as long as the opening one; any
/// surplus `=` on either side belongs to the text.
#[derive(Debug, Default)]
pub struct BalancedHeadingBlock {
    closed: bool,
}

impl BalancedHeadingBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for BalancedHeadingBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Heading
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && HEADING.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        self.closed = true;
        let Some(captures) = HEADING.captures(line) else {
            return Consumed::Line;
        };
        let (Some(open), Some(close)) = (captures.get(1), captures.get(3)) else {
            return Consumed::Line;
        };
        let level = open.len().min(close.len());
        let start = open.start() + level;
        let end = close.end() - level;
        let text = &line[start..end];
        let content_start = start + (text.len() - text.trim_start().len());
        let content_end = start + text.trim_end().len();
        emit_heading(
            cx,
            level as u8,
            content_start..content_end.max(content_start),
            Attributes::new(),
        );
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}

/// `  * item` and `  # item`: the marker must be indented, and deeper
/// indentation nests.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let kind = match captures.get(2)?.as_str() {
        "#" => BlockType::NumericList,
        _ => BlockType::BulletedList,
    };
    let mut item = ListLine::new(vec![kind], BlockType::ListItem, captures.get(0)?.end());
    item.indent = captures.get(1)?.as_str().chars().count();
    Some(item)
}

/// `{{{ ... }}}`. Closed on the line it opens, it is a monospace span;
/// otherwise a `prettyprint` preformatted block. It may start where a
/// previous block ended in the middle of a line.
#[derive(Debug, Default)]
pub struct CodeBlock {
    started: bool,
    single_line: bool,
    has_content: bool,
    closed: bool,
}

impl CodeBlock {
    const OPEN: &'static str = "{{{";
    const CLOSE: &'static str = "}}}";

    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self, cx: &mut ParseContext<'_>) {
        if self.single_line {
            cx.begin_span(SpanType::Monospace, &Attributes::new());
        } else {
            cx.begin_block(
                BlockType::Preformatted,
                &Attributes::new().with_class("prettyprint"),
            );
        }
    }
}

impl Block for CodeBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Code
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        line.get(offset..)
            .is_some_and(|rest| rest.starts_with(Self::OPEN))
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        let first = !self.started;
        let content = if first { offset + Self::OPEN.len() } else { offset };
        let close = line
            .get(content..)
            .and_then(|rest| rest.find(Self::CLOSE))
            .map(|at| content + at);

        if first {
            self.started = true;
            self.single_line = close.is_some();
            cx.set_segment(offset, content);
            self.begin(cx);
        }

        let end = close.unwrap_or(line.len());
        let beside_marker = first || close.is_some();
        if !(content == end && beside_marker) {
            if self.has_content {
                cx.previous_line_terminator();
            }
            cx.characters(content..end);
            self.has_content = true;
        }

        match close {
            Some(at) => {
                let after = at + Self::CLOSE.len();
                cx.set_segment(at, after);
                self.close(cx);
                if after == line.len() {
                    Consumed::Line
                } else {
                    Consumed::UpTo(after)
                }
            }
            None => Consumed::Line,
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
            if self.single_line {
                cx.end_span();
            } else {
                cx.end_block();
            }
        }
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_markers_need_indentation() {
        assert!(list_line("* not a list").is_none());
        let item = list_line("    # deep").unwrap();
        assert_eq!(item.path, vec![BlockType::NumericList]);
        assert_eq!(item.indent, 4);
        assert_eq!(item.content, 6);
    }

    #[test]
    fn heading_runs_are_captured() {
        let captures = HEADING.captures("=== Title ===").unwrap();
        assert_eq!(&captures[1], "===");
        assert_eq!(&captures[2], "Title");
        assert_eq!(&captures[3], "===");
    }
}
