use super::span::Span;

/// A single line of markup, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line text, excluding `\n` and a preceding `\r`.
    pub text: &'a str,
    /// 1-based line number.
    pub number: usize,
    /// Document offset of the first byte of the line.
    pub offset: usize,
    /// Length of the terminator: 0 at end of input, 1 for `\n`, 2 for `\r\n`.
    pub terminator: usize,
}

impl<'a> Line<'a> {
    /// Document span of the line text.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.text.len())
    }

    /// Text from a line-relative byte offset to the end of the line.
    #[must_use]
    pub fn tail(&self, offset: usize) -> &'a str {
        self.text.get(offset..).unwrap_or("")
    }
}

/// Read-only cursor over the lines of a document.
///
/// Splits on `\n`; a `\r` right before it belongs to the terminator. A
/// trailing newline does not produce an empty last line.
#[derive(Debug, Clone)]
pub struct LineSequence<'a> {
    markup: &'a str,
    base: usize,
    current: Option<Line<'a>>,
    // position of `current` within `markup`, which excludes `base`
    current_start: usize,
}

impl<'a> LineSequence<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self::with_base(markup, 0)
    }

    /// Lines of `markup` whose document offsets start at `base`.
    ///
    /// Used when re-parsing a sub-range of a larger document.
    pub fn with_base(markup: &'a str, base: usize) -> Self {
        let mut lines = Self {
            markup,
            base,
            current: None,
            current_start: 0,
        };
        lines.current = lines.read_at(0, 1);
        lines
    }

    pub fn current(&self) -> Option<Line<'a>> {
        self.current
    }

    /// The line after the current one, without moving.
    pub fn peek(&self) -> Option<Line<'a>> {
        let line = self.current?;
        self.read_at(
            self.current_start + line.text.len() + line.terminator,
            line.number + 1,
        )
    }

    pub fn advance(&mut self) {
        if let Some(line) = self.current {
            self.current_start += line.text.len() + line.terminator;
            self.current = self.read_at(self.current_start, line.number + 1);
        }
    }

    fn read_at(&self, start: usize, number: usize) -> Option<Line<'a>> {
        if start >= self.markup.len() {
            return None;
        }
        let rest = &self.markup[start..];
        let (mut text, mut terminator) = match rest.find('\n') {
            Some(end) => (&rest[..end], 1),
            None => (rest, 0),
        };
        if terminator == 1
            && let Some(stripped) = text.strip_suffix('\r')
        {
            text = stripped;
            terminator = 2;
        }
        Some(Line {
            text,
            number,
            offset: self.base + start,
            terminator,
        })
    }
}

impl<'a> Iterator for LineSequence<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.current?;
        self.advance();
        Some(line)
    }
}
