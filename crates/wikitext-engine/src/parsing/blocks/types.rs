use std::fmt;

use crate::parsing::ParseContext;

/// Identity of a block implementation, used for paragraph handling and
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    List,
    Table,
    Code,
    Preformatted,
    Quote,
    Comment,
    Escape,
    RawHtml,
    TableOfContents,
    Footnote,
    Panel,
    ThematicBreak,
    Metadata,
}

/// How much of a line a block consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    /// Everything through the end of the line.
    Line,
    /// Ownership ends at this line-relative byte offset; the rest of the line
    /// goes back to block scanning.
    UpTo(usize),
}

/// A structural block spanning one or more lines.
///
/// One value lives for exactly one occurrence of the block. `can_start` may
/// cache its match for the `process_line_content` call that follows it on
/// the same line.
pub trait Block: fmt::Debug {
    fn kind(&self) -> BlockKind;

    /// Whether the block starts on `line` at byte `offset`.
    fn can_start(&mut self, line: &str, offset: usize) -> bool;

    /// Consumes the line from `offset`. The first call happens on the line
    /// `can_start` accepted.
    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed;

    fn is_closed(&self) -> bool;

    /// Closes the block, ending everything it has opened. Idempotent.
    fn close(&mut self, cx: &mut ParseContext<'_>);
}
