use std::ops::Range;

use regex::Regex;

use crate::builder::BlockType;
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed, ContainerAttributes};

/// What a [`LiteralBlock`] does with the text between its markers.
#[derive(Debug, Clone, Copy)]
pub enum LiteralContent {
    /// Characters inside a block of the given type.
    Block(BlockType, ContainerAttributes),
    /// Characters outside any block.
    Text,
    /// Nothing.
    Hidden,
}

/// Text between an opening and a closing marker, taken as written.
///
/// `open` must match at the block-scan position and its group 1, if any,
/// holds parameters for the attribute builder. The closing marker may be
/// anywhere after the opening one, on the same line or a later one; what
/// follows it goes back to block scanning. Lines are joined with newlines
/// located on the line terminators, and an empty remainder next to a marker
/// is not a line of content.
#[derive(Debug)]
pub struct LiteralBlock {
    open: &'static Regex,
    close: &'static Regex,
    content: LiteralContent,
    line_start: bool,
    multi_line: bool,
    line_endings: bool,
    started: bool,
    has_content: bool,
    closed: bool,
}

impl LiteralBlock {
    pub fn new(open: &'static Regex, close: &'static Regex, content: LiteralContent) -> Self {
        Self {
            open,
            close,
            content,
            line_start: false,
            multi_line: false,
            line_endings: false,
            started: false,
            has_content: false,
            closed: false,
        }
    }

    /// Only opens at the start of a line.
    #[must_use]
    pub fn at_line_start(mut self) -> Self {
        self.line_start = true;
        self
    }

    /// Only opens when the closing marker is not on the same line, leaving
    /// single-line forms to the inline syntax.
    #[must_use]
    pub fn multi_line(mut self) -> Self {
        self.multi_line = true;
        self
    }

    /// Ends every line of content with a newline, including one closed on
    /// the same line, instead of only joining lines.
    #[must_use]
    pub fn with_line_endings(mut self) -> Self {
        self.line_endings = true;
        self
    }

    fn open_at(&self, line: &str, offset: usize) -> Option<(usize, Option<String>)> {
        if self.line_start && offset > 0 {
            return None;
        }
        let captures = self.open.captures(line.get(offset..)?)?;
        let marker = captures.get(0)?;
        if marker.start() != 0 {
            return None;
        }
        let start = offset + marker.end();
        if self.multi_line && self.close.is_match(&line[start..]) {
            return None;
        }
        Some((start, captures.get(1).map(|m| m.as_str().to_string())))
    }

    fn emit(&mut self, cx: &mut ParseContext<'_>, content: Range<usize>, beside_marker: bool) {
        if content.is_empty() && beside_marker {
            return;
        }
        match self.content {
            LiteralContent::Hidden => {}
            LiteralContent::Block(..) | LiteralContent::Text => {
                if self.has_content && !self.line_endings {
                    cx.previous_line_terminator();
                }
                cx.characters(content);
                if self.line_endings {
                    cx.line_terminator();
                }
            }
        }
        self.has_content = true;
    }
}

impl Block for LiteralBlock {
    fn kind(&self) -> BlockKind {
        match self.content {
            LiteralContent::Block(BlockType::Code, _) => BlockKind::Code,
            LiteralContent::Block(..) => BlockKind::Preformatted,
            LiteralContent::Text => BlockKind::Escape,
            LiteralContent::Hidden => BlockKind::Comment,
        }
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        self.open_at(line, offset).is_some()
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        let mut content = offset;
        let first = !self.started;
        if first {
            let (start, params) = self.open_at(line, offset).unwrap_or((offset, None));
            cx.set_segment(offset, start);
            if let LiteralContent::Block(block, attributes) = self.content {
                cx.begin_block(block, &attributes(params.as_deref()));
            }
            self.started = true;
            content = start;
        }

        let close = line
            .get(content..)
            .and_then(|rest| self.close.find(rest))
            .map(|m| (content + m.start(), content + m.end()));
        match close {
            Some((end, after)) => {
                self.emit(cx, content..end, true);
                cx.set_segment(end, after);
                self.close(cx);
                Consumed::UpTo(after)
            }
            None => {
                self.emit(cx, content..line.len(), first);
                Consumed::Line
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        if self.started && matches!(self.content, LiteralContent::Block(..)) {
            cx.end_block();
        }
        self.closed = true;
    }
}
