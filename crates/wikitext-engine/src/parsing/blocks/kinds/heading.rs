use std::ops::Range;

use regex::Regex;

use crate::builder::Attributes;
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// Opens a heading, emits `content` as inline markup and closes it.
///
/// Without an explicit id the dialect's id strategy names the heading after
/// its source text.
pub fn emit_heading(
    cx: &mut ParseContext<'_>,
    level: u8,
    content: Range<usize>,
    mut attributes: Attributes,
) {
    let line = cx.line();
    if attributes.id.is_none() {
        let text = line.text.get(content.clone()).unwrap_or("").trim();
        attributes.id = cx.heading_id(level, text);
    }
    cx.set_segment(0, line.text.len());
    cx.begin_heading(level, &attributes);
    cx.emit_markup_line(content);
    cx.set_segment(line.text.len(), line.text.len());
    cx.end_heading();
}

/// Level from the length of a marker such as `===` or `###`.
pub fn marker_length(marker: &str) -> u8 {
    marker.chars().count().clamp(1, 6) as u8
}

/// Level from a digit, as in `h3.`.
pub fn digit_level(marker: &str) -> u8 {
    marker.parse::<u8>().unwrap_or(1).clamp(1, 6)
}

/// A single-line heading described by a pattern.
///
/// Group 1 of `pattern` is the marker that `level` turns into a heading
/// level, group 2 the heading text.
#[derive(Debug)]
pub struct HeadingBlock {
    pattern: &'static Regex,
    level: fn(&str) -> u8,
    closed: bool,
}

impl HeadingBlock {
    pub fn new(pattern: &'static Regex, level: fn(&str) -> u8) -> Self {
        Self {
            pattern,
            level,
            closed: false,
        }
    }
}

impl Block for HeadingBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Heading
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
        self.closed = true;
        let Some(captures) = self.pattern.captures(line) else {
            return Consumed::Line;
        };
        let level = captures.get(1).map_or(1, |m| (self.level)(m.as_str()));
        let content = captures.get(2).map_or(line.len()..line.len(), |m| {
            let text = m.as_str();
            let start = m.start() + (text.len() - text.trim_start().len());
            let end = m.start() + text.trim_end().len();
            start..end.max(start)
        });
        emit_heading(cx, level, content, Attributes::new());
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}
