use std::fmt;
use std::ops::Range;

use regex::Captures;

use crate::parsing::ParseContext;

/// Whether an element wraps content in a span or replaces its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    PhraseModifier,
    Token,
}

/// An independently written regex fragment plus the code that turns its
/// match into document events.
///
/// `pattern` must contain exactly `group_count` capturing groups; this is
/// checked when the dialect is assembled. Look-around and back-references
/// are not available in the regex engine, so elements that need them check
/// the surrounding characters in `accepts`.
pub trait PatternElement: fmt::Debug + Send + Sync {
    fn kind(&self) -> ElementKind;

    fn pattern(&self) -> String;

    fn group_count(&self) -> usize;

    /// Context checks the pattern cannot express. When a match is rejected the
    /// elements after it get a chance at the same position.
    fn accepts(&self, _found: &ElementMatch<'_>) -> bool {
        true
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>);

    fn name(&self) -> String {
        format!("{self:?}")
    }
}

/// A successful match of one element inside a compiled alternation, with
/// group numbers remapped to the element's own.
///
/// Group 0 is the element's whole match; 1..=`group_count` are its groups.
/// All offsets are relative to the current line.
#[derive(Debug)]
pub struct ElementMatch<'h> {
    hay: &'h str,
    base: usize,
    captures: Captures<'h>,
    wrapper: usize,
    index: usize,
}

impl<'h> ElementMatch<'h> {
    pub(crate) fn new(
        hay: &'h str,
        base: usize,
        captures: Captures<'h>,
        wrapper: usize,
        index: usize,
    ) -> Self {
        Self {
            hay,
            base,
            captures,
            wrapper,
            index,
        }
    }

    /// Position of the element within its syntax.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    pub fn range(&self) -> Range<usize> {
        self.group_range(0).unwrap_or(self.base..self.base)
    }

    pub fn is_empty(&self) -> bool {
        self.range().is_empty()
    }

    pub fn group(&self, n: usize) -> Option<&'h str> {
        self.captures.get(self.wrapper + n).map(|m| m.as_str())
    }

    pub fn group_range(&self, n: usize) -> Option<Range<usize>> {
        self.captures
            .get(self.wrapper + n)
            .map(|m| self.base + m.start()..self.base + m.end())
    }

    /// Character right before the match, within the scanned range.
    pub fn char_before(&self) -> Option<char> {
        let local = self.start() - self.base;
        self.hay[..local].chars().next_back()
    }

    /// Character right after the match, within the scanned range.
    pub fn char_after(&self) -> Option<char> {
        let local = self.end() - self.base;
        self.hay[local..].chars().next()
    }

    /// Scanned text before the match.
    pub fn text_before(&self) -> &'h str {
        &self.hay[..self.start() - self.base]
    }

    /// Scanned text after the match.
    pub fn text_after(&self) -> &'h str {
        &self.hay[self.end() - self.base..]
    }
}

/// `\w` as the regex engine understands it.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
