use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// How consecutive lines of a paragraph are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    /// A `line_break` event.
    LineBreak,
    /// A `"\n"` characters event located on the previous line's terminator.
    Newline,
}

/// Parses an optional first-line prefix such as Textile's `p(class).`,
/// returning the paragraph attributes and the offset where content starts.
pub type PrefixParser = fn(&str) -> Option<(Attributes, usize)>;

/// Fallback block: free text up to the next blank line.
///
/// Inline markup is parsed line by line. The paragraph also ends in the
/// middle of a line when `breaks_at` finds a macro there; the rest of the
/// line is handed back to block scanning.
#[derive(Debug)]
pub struct ParagraphBlock {
    join: LineJoin,
    prefix: Option<PrefixParser>,
    breaks_at: Option<&'static Regex>,
    lines: usize,
    closed: bool,
}

impl ParagraphBlock {
    pub fn new(join: LineJoin) -> Self {
        Self {
            join,
            prefix: None,
            breaks_at: None,
            lines: 0,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: PrefixParser) -> Self {
        self.prefix = Some(prefix);
        self
    }

    #[must_use]
    pub fn breaking_at(mut self, pattern: &'static Regex) -> Self {
        self.breaks_at = Some(pattern);
        self
    }

    fn break_offset(&self, line: &str, offset: usize) -> Option<usize> {
        let pattern = self.breaks_at?;
        let rest = line.get(offset..)?;
        pattern
            .find_iter(rest)
            .map(|m| offset + m.start())
            .find(|&at| at > offset)
    }
}

impl Block for ParagraphBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Paragraph
    }

    fn can_start(&mut self, _line: &str, _offset: usize) -> bool {
        true
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        let rest = line.get(offset..).unwrap_or("");
        if rest.trim().is_empty() {
            self.close(cx);
            return Consumed::Line;
        }

        let mut content_start = offset;
        if self.lines == 0 {
            let mut attributes = Attributes::new();
            if let Some((parsed, start)) = self.prefix.and_then(|parse| parse(rest)) {
                attributes = parsed;
                content_start = offset + start;
            }
            cx.set_segment(offset, line.len());
            cx.begin_block(BlockType::Paragraph, &attributes);
        } else {
            match self.join {
                LineJoin::LineBreak => {
                    cx.set_segment(offset, offset);
                    cx.line_break();
                }
                LineJoin::Newline => cx.previous_line_terminator(),
            }
        }
        self.lines += 1;

        match self.break_offset(line, content_start) {
            Some(end) => {
                cx.emit_markup_line(content_start..end);
                self.close(cx);
                Consumed::UpTo(end)
            }
            None => {
                cx.emit_markup_line(content_start..line.len());
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
        if self.lines > 0 {
            cx.end_block();
        }
        self.closed = true;
    }
}
