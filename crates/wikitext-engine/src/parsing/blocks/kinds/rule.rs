use regex::Regex;

use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// A line that is nothing but a horizontal rule, such as `----` or `***`.
#[derive(Debug)]
pub struct HorizontalRuleBlock {
    pattern: &'static Regex,
    closed: bool,
}

impl HorizontalRuleBlock {
    pub fn new(pattern: &'static Regex) -> Self {
        Self {
            pattern,
            closed: false,
        }
    }
}

impl Block for HorizontalRuleBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::ThematicBreak
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.pattern.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        cx.set_segment(0, line.len());
        cx.horizontal_rule();
        self.closed = true;
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}
