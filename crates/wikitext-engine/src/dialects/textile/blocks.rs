use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::attributes::{BLOCK_ATTRIBUTES, parse_block_attributes};
use crate::builder::{Attributes, AttributeDetail, BlockType, QuoteAttributes, SpanType};
use crate::parsing::blocks::{Block, BlockKind, Consumed, ListLine};
use crate::parsing::{ContentState, ParseContext};

/// A block signature line: name, attributes, `.` or `..`, optional
/// `:citation`, then whitespace.
pub(super) static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(h[1-6]|p|bc|bq|pre|fn\d+|###|notextile|table)({BLOCK_ATTRIBUTES})(\.\.?)(?::(\S+))?(?:\s+|$)"
    ))
    .expect("Invalid Textile signature regex")
});

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([*#]+)((?:\([^()]*\)|\{[^}]*\}|\[[^\]]*\])*)\s+")
        .expect("Invalid Textile list regex")
});

static FOOTNOTE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^fn(\d+)").expect("Invalid Textile footnote regex"));

/// The block kinds introduced by a signature such as `bc.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Heading,
    Preformatted,
    Quote,
    Code,
    Footnote,
    Comment,
    Escape,
}

impl Signature {
    fn matches(self, name: &str) -> bool {
        match self {
            Self::Heading => name.len() == 2 && name.starts_with('h'),
            Self::Preformatted => name == "pre",
            Self::Quote => name == "bq",
            Self::Code => name == "bc",
            Self::Footnote => name.starts_with("fn"),
            Self::Comment => name == "###",
            Self::Escape => name == "notextile",
        }
    }

    fn kind(self) -> BlockKind {
        match self {
            Self::Heading => BlockKind::Heading,
            Self::Preformatted => BlockKind::Preformatted,
            Self::Quote => BlockKind::Quote,
            Self::Code => BlockKind::Code,
            Self::Footnote => BlockKind::Footnote,
            Self::Comment => BlockKind::Comment,
            Self::Escape => BlockKind::Escape,
        }
    }
}

/// A block opened by a signature line such as `h1.`, `bq.` or `bc..`.
///
/// The single-dot form ends at the next blank line. The extended `..` form
/// keeps going across blank lines until a line starts with another block
/// signature.
#[derive(Debug)]
pub struct SignatureBlock {
    signature: Signature,
    extended: bool,
    started: bool,
    has_content: bool,
    paragraph_open: bool,
    closed: bool,
}

impl SignatureBlock {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            extended: false,
            started: false,
            has_content: false,
            paragraph_open: false,
            closed: false,
        }
    }

    fn start(&mut self, cx: &mut ParseContext<'_>, line: &str) -> Consumed {
        self.started = true;
        let Some(captures) = SIGNATURE.captures(line) else {
            self.closed = true;
            return Consumed::Line;
        };
        let name = captures.get(1).map_or("", |m| m.as_str());
        let mut attributes = parse_block_attributes(captures.get(2).map_or("", |m| m.as_str()));
        self.extended = captures.get(3).is_some_and(|m| m.as_str() == "..");
        let dots_end = captures.get(3).map_or(0, |m| m.end());
        let content_start = captures.get(0).map_or(line.len(), |m| m.end());
        let content = content_start..line.len();

        cx.set_segment(0, line.len());
        match self.signature {
            Signature::Heading => {
                let level = name[1..].parse::<u8>().unwrap_or(1);
                if attributes.id.is_none() {
                    attributes.id = cx.heading_id(level, line[content.clone()].trim());
                }
                cx.begin_heading(level, &attributes);
                cx.emit_markup_line(content);
                self.has_content = true;
            }
            Signature::Quote => {
                if let Some(citation) = captures.get(4) {
                    attributes.detail = AttributeDetail::Quote(QuoteAttributes {
                        citation: Some(citation.as_str().to_string()),
                    });
                }
                cx.begin_block(BlockType::Quote, &attributes);
                self.paragraph_line(cx, line, content);
            }
            Signature::Footnote => {
                let number = &name[2..];
                let id = cx.state_mut().register_footnote(number);
                attributes.id = Some(id);
                attributes.append_class("footnote");
                cx.begin_block(BlockType::Paragraph, &attributes);
                cx.set_segment(0, name.len());
                cx.begin_span(SpanType::Superscript, &Attributes::new());
                cx.characters(2..name.len());
                cx.end_span();
                cx.emit_markup_line(dots_end..line.len());
                self.paragraph_open = true;
                self.has_content = true;
            }
            Signature::Code | Signature::Preformatted => {
                let kind = if self.signature == Signature::Code {
                    BlockType::Code
                } else {
                    BlockType::Preformatted
                };
                cx.begin_block(kind, &attributes);
                self.literal_line(cx, content);
            }
            Signature::Escape => self.escaped_line(cx, line, content),
            Signature::Comment => {}
        }
        Consumed::Line
    }

    fn paragraph_line(&mut self, cx: &mut ParseContext<'_>, line: &str, content: Range<usize>) {
        if line[content.clone()].trim().is_empty() {
            if self.paragraph_open {
                cx.set_segment(0, 0);
                cx.end_block();
                self.paragraph_open = false;
            }
            return;
        }
        if self.paragraph_open {
            cx.set_segment(content.start, content.start);
            cx.line_break();
        } else {
            cx.set_segment(content.start, line.len());
            cx.begin_block(BlockType::Paragraph, &Attributes::new());
            self.paragraph_open = true;
        }
        cx.emit_markup_line(content);
    }

    // leading blank lines are dropped, later ones kept as newlines
    fn literal_line(&mut self, cx: &mut ParseContext<'_>, content: Range<usize>) {
        if content.is_empty() && !self.has_content {
            return;
        }
        if self.has_content {
            cx.previous_line_terminator();
        }
        if !content.is_empty() {
            cx.characters(content);
        }
        self.has_content = true;
    }

    fn escaped_line(&mut self, cx: &mut ParseContext<'_>, line: &str, content: Range<usize>) {
        if self.has_content {
            cx.previous_line_terminator();
        }
        if !content.is_empty() {
            cx.set_segment(content.start, content.end);
            cx.characters_unescaped(&line[content]);
            self.has_content = true;
        }
    }

    fn continuation(&mut self, cx: &mut ParseContext<'_>, line: &str) {
        let content = 0..line.len();
        match self.signature {
            Signature::Heading => {
                if !line.trim().is_empty() {
                    cx.previous_line_terminator();
                    cx.emit_markup_line(content);
                }
            }
            Signature::Quote => self.paragraph_line(cx, line, content),
            Signature::Footnote => {
                if !line.trim().is_empty() {
                    cx.set_segment(0, 0);
                    cx.line_break();
                    cx.emit_markup_line(content);
                }
            }
            Signature::Code | Signature::Preformatted => self.literal_line(cx, content),
            Signature::Escape => self.escaped_line(cx, line, content),
            Signature::Comment => {}
        }
    }
}

impl Block for SignatureBlock {
    fn kind(&self) -> BlockKind {
        self.signature.kind()
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0
            && SIGNATURE
                .captures(line)
                .and_then(|c| c.get(1))
                .is_some_and(|name| self.signature.matches(name.as_str()))
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if !self.started {
            return self.start(cx, line);
        }
        let blank = line.trim().is_empty();
        if self.extended {
            if offset == 0 && !blank && SIGNATURE.is_match(line) {
                self.close(cx);
                return Consumed::UpTo(0);
            }
        } else if blank {
            self.close(cx);
            return Consumed::Line;
        }
        self.continuation(cx, line);
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.started {
            return;
        }
        match self.signature {
            Signature::Heading => cx.end_heading(),
            Signature::Quote => {
                if self.paragraph_open {
                    cx.end_block();
                }
                cx.end_block();
            }
            Signature::Footnote | Signature::Code | Signature::Preformatted => cx.end_block(),
            Signature::Comment | Signature::Escape => {}
        }
    }
}

/// `*`, `#` and mixed markers; attributes after the markers apply to the
/// list the line opens.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let markers = captures.get(1)?.as_str();
    let path = markers
        .chars()
        .map(|marker| {
            if marker == '#' {
                BlockType::NumericList
            } else {
                BlockType::BulletedList
            }
        })
        .collect();
    let mut item = ListLine::new(path, BlockType::ListItem, captures.get(0)?.end());
    item.attributes = parse_block_attributes(captures.get(2).map_or("", |m| m.as_str()));
    Some(item)
}

/// `p(class#id){style}[lang]<.` at the start of a paragraph.
pub fn paragraph_prefix(line: &str) -> Option<(Attributes, usize)> {
    let captures = SIGNATURE.captures(line)?;
    if captures.get(1)?.as_str() != "p" || captures.get(3)?.as_str() != "." {
        return None;
    }
    let attributes = parse_block_attributes(captures.get(2).map_or("", |m| m.as_str()));
    Some((attributes, captures.get(0)?.end()))
}

/// Footnote references only link to footnotes the document defines, which
/// may come after the reference.
pub fn register_footnotes(markup: &str, state: &mut ContentState) {
    for captures in FOOTNOTE_DEFINITION.captures_iter(markup) {
        if let Some(number) = captures.get(1) {
            state.register_footnote(number.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn list_markers_name_every_level() {
        let item = list_line("#*{color: blue} nested").unwrap();
        assert_eq!(item.path, vec![BlockType::NumericList, BlockType::BulletedList]);
        assert_eq!(item.content, 16);
        assert_eq!(item.attributes.css_style.as_deref(), Some("color: blue"));
    }

    #[test]
    fn markers_need_a_space() {
        assert_eq!(list_line("**bold**"), None);
        assert_eq!(list_line("- dash"), None);
    }

    #[test]
    fn paragraph_prefix_parses_attributes() {
        let (attributes, start) = paragraph_prefix("p(foo#ab). first").unwrap();
        assert_eq!(attributes.id.as_deref(), Some("ab"));
        assert_eq!(attributes.css_class.as_deref(), Some("foo"));
        assert_eq!(start, 11);
        assert_eq!(paragraph_prefix("pre. x"), None);
        assert_eq!(paragraph_prefix("p.. x"), None);
    }

    #[test]
    fn footnotes_are_registered_up_front() {
        let mut state = ContentState::new();
        register_footnotes("See [1].\n\nfn1. One.\nfn22. Two.", &mut state);
        assert_eq!(state.footnote_id("1"), Some("___fn1"));
        assert_eq!(state.footnote_id("22"), Some("___fn22"));
    }
}
