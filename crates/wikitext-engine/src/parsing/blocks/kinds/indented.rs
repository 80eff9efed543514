use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// Whether an [`IndentedBlock`] parses inline markup in its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentedContent {
    Markup,
    Literal,
}

/// Consecutive non-blank lines that all start with `prefix`, such as
/// MediaWiki's leading space or four spaces of indented code.
///
/// The prefix is removed and the lines are joined with newlines.
#[derive(Debug)]
pub struct IndentedBlock {
    prefix: &'static Regex,
    block: BlockType,
    content: IndentedContent,
    lines: usize,
    closed: bool,
}

impl IndentedBlock {
    pub fn new(prefix: &'static Regex, block: BlockType, content: IndentedContent) -> Self {
        Self {
            prefix,
            block,
            content,
            lines: 0,
            closed: false,
        }
    }

    fn content_start(&self, line: &str) -> Option<usize> {
        if line.trim().is_empty() {
            return None;
        }
        self.prefix
            .find(line)
            .filter(|m| m.start() == 0)
            .map(|m| m.end())
    }
}

impl Block for IndentedBlock {
    fn kind(&self) -> BlockKind {
        match self.block {
            BlockType::Code => BlockKind::Code,
            _ => BlockKind::Preformatted,
        }
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.content_start(line).is_some()
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        let start = match self.content_start(line) {
            Some(start) if offset == 0 => start,
            _ => {
                self.close(cx);
                return if line.trim().is_empty() {
                    Consumed::Line
                } else {
                    Consumed::UpTo(offset)
                };
            }
        };
        if self.lines == 0 {
            cx.set_segment(0, start);
            cx.begin_block(self.block, &Attributes::new());
        } else {
            cx.previous_line_terminator();
        }
        match self.content {
            IndentedContent::Markup => cx.emit_markup_line(start..line.len()),
            IndentedContent::Literal => cx.characters(start..line.len()),
        }
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
        }
        self.closed = true;
    }
}
