use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, BlockMachine, Consumed};

/// Builds the container's attributes from the opening marker's parameters.
pub type ContainerAttributes = fn(Option<&str>) -> Attributes;

/// A block whose content is more blocks, between an opening and a closing
/// marker.
///
/// `open` must match at the block-scan position; its group 1, if any, is
/// handed to the attribute builder. `close` may appear anywhere after the
/// content start, so `{quote}text{quote}` works on one line. Everything in
/// between runs through a nested [`BlockMachine`] that sees the content as
/// a line of its own.
#[derive(Debug)]
pub struct DelimitedContainer {
    open: &'static Regex,
    close: &'static Regex,
    block: BlockType,
    kind: BlockKind,
    attributes: Option<ContainerAttributes>,
    inner: BlockMachine,
    started: bool,
    closed: bool,
}

impl DelimitedContainer {
    pub fn new(
        open: &'static Regex,
        close: &'static Regex,
        block: BlockType,
        kind: BlockKind,
    ) -> Self {
        Self {
            open,
            close,
            block,
            kind,
            attributes: None,
            inner: BlockMachine::new(),
            started: false,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: ContainerAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    fn open_at(&self, line: &str, offset: usize) -> Option<(usize, Option<String>)> {
        let rest = line.get(offset..)?;
        let captures = self.open.captures(rest)?;
        let marker = captures.get(0)?;
        if marker.start() != 0 {
            return None;
        }
        let params = captures.get(1).map(|m| m.as_str().to_string());
        Some((offset + marker.end(), params))
    }
}

impl Block for DelimitedContainer {
    fn kind(&self) -> BlockKind {
        self.kind
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
        if !self.started {
            let (start, params) = self.open_at(line, offset).unwrap_or((offset, None));
            let attributes = self
                .attributes
                .map(|build| build(params.as_deref()))
                .unwrap_or_default();
            cx.set_segment(offset, start);
            cx.begin_block(self.block, &attributes);
            self.started = true;
            content = start;
        }

        let close = line
            .get(content..)
            .and_then(|rest| self.close.find(rest))
            .map(|m| (content + m.start(), content + m.end()));
        match close {
            Some((end, after)) => {
                if end > content {
                    let inner = &mut self.inner;
                    cx.with_column(content, |cx| inner.push_line(cx, &line[content..end], 0));
                }
                cx.set_segment(end, after);
                self.close(cx);
                Consumed::UpTo(after)
            }
            None => {
                let inner = &mut self.inner;
                cx.with_column(content, |cx| inner.push_line(cx, &line[content..], 0));
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
        self.inner.finish(cx);
        if self.started {
            cx.end_block();
        }
        self.closed = true;
    }
}

/// A block whose lines carry a prefix, such as `> ` for block quotes.
///
/// The text after the prefix runs through a nested [`BlockMachine`]. A line
/// without the prefix continues an open paragraph inside the quote (a lazy
/// continuation) unless it would interrupt that paragraph; any other line
/// ends the quote.
#[derive(Debug)]
pub struct PrefixedContainer {
    prefix: &'static Regex,
    block: BlockType,
    inner: BlockMachine,
    started: bool,
    closed: bool,
}

impl PrefixedContainer {
    pub fn new(prefix: &'static Regex, block: BlockType) -> Self {
        Self {
            prefix,
            block,
            inner: BlockMachine::new(),
            started: false,
            closed: false,
        }
    }

    fn content_start(&self, line: &str, offset: usize) -> Option<usize> {
        let rest = line.get(offset..)?;
        let marker = self.prefix.find(rest)?;
        (marker.start() == 0).then_some(offset + marker.end())
    }
}

impl Block for PrefixedContainer {
    fn kind(&self) -> BlockKind {
        BlockKind::Quote
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.content_start(line, offset).is_some()
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if !self.started {
            cx.set_segment(offset, line.len());
            cx.begin_block(self.block, &Attributes::new());
            self.started = true;
        }
        if let Some(content) = self.content_start(line, offset) {
            let inner = &mut self.inner;
            cx.with_column(content, |cx| inner.push_line(cx, &line[content..], 0));
            return Consumed::Line;
        }
        let lazy = !line.trim().is_empty()
            && self.inner.current_kind() == Some(BlockKind::Paragraph)
            && !cx.breaks_paragraph(line, offset);
        if lazy {
            let inner = &mut self.inner;
            cx.with_column(offset, |cx| inner.push_line(cx, &line[offset..], 0));
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
        self.inner.finish(cx);
        if self.started {
            cx.end_block();
        }
        self.closed = true;
    }
}
