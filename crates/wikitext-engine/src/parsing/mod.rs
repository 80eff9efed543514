pub mod blocks;
pub mod context;
pub mod inline;
pub mod locator;
pub mod state;
pub mod text;

#[cfg(test)]
pub(crate) mod tests;

use std::ops::Range;

pub use context::ParseContext;
pub use locator::Locator;
pub use state::ContentState;

use crate::builder::{DocumentBuilder, DocumentEvent, EventRecorder};
use crate::dialect::Dialect;
use blocks::BlockMachine;
use text::LineSequence;

/// Drives a dialect's blocks over markup and reports events to a builder.
///
/// The parser itself is stateless; each call builds a fresh [`ParseContext`]
/// from the dialect, so one parser can be used any number of times.
#[derive(Debug, Clone, Copy)]
pub struct MarkupParser<'d> {
    dialect: &'d Dialect,
}

impl<'d> MarkupParser<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'d Dialect {
        self.dialect
    }

    /// Parses a complete document, including the document events.
    pub fn parse(&self, markup: &str, builder: &mut dyn DocumentBuilder) {
        self.parse_content(markup, builder, true);
    }

    /// Parses markup, with or without `begin_document`/`end_document`.
    pub fn parse_content(&self, markup: &str, builder: &mut dyn DocumentBuilder, as_document: bool) {
        self.run(markup, 0, builder, as_document, true);
    }

    /// Parses `markup[range]` on its own, as a fragment.
    ///
    /// Locators keep their offsets in `markup`, so problems found in the
    /// region map straight back to the whole document. A range that is out of
    /// bounds or splits a character is clamped to the nearest valid region.
    pub fn parse_region(&self, markup: &str, range: Range<usize>, builder: &mut dyn DocumentBuilder) {
        let range = clamp_region(markup, range);
        let region = &markup[range.clone()];
        self.run(region, range.start, builder, false, true);
    }

    /// Convenience: all events of a complete document.
    pub fn parse_to_events(&self, markup: &str) -> Vec<DocumentEvent> {
        let mut recorder = EventRecorder::new();
        self.parse(markup, &mut recorder);
        recorder.into_events()
    }

    /// Structure-only pass used to compute the outline. Generated content is
    /// suppressed, so a table of contents cannot recurse into itself.
    pub(crate) fn parse_structure(&self, markup: &str, builder: &mut dyn DocumentBuilder) {
        self.run(markup, 0, builder, true, false);
    }

    fn run(
        &self,
        markup: &str,
        base: usize,
        builder: &mut dyn DocumentBuilder,
        as_document: bool,
        generative: bool,
    ) {
        let markup = self.dialect.preprocess(markup);
        let markup = markup.as_ref();
        let mut cx = ParseContext::new(self.dialect, markup, builder, generative);
        if let Some(prepare) = self.dialect.preparer() {
            prepare(markup, cx.state_mut());
        }
        if as_document {
            cx.begin_document();
        }

        let mut machine = BlockMachine::new();
        let mut lines = LineSequence::with_base(markup, base);
        while let Some(line) = lines.current() {
            cx.begin_line(line, lines.peek());
            machine.push_line(&mut cx, line.text, 0);
            lines.advance();
        }
        machine.finish(&mut cx);

        if as_document {
            cx.end_document();
        }
    }
}

fn clamp_region(markup: &str, range: Range<usize>) -> Range<usize> {
    let mut end = range.end.min(markup.len());
    while !markup.is_char_boundary(end) {
        end -= 1;
    }
    let mut start = range.start.min(end);
    while !markup.is_char_boundary(start) {
        start -= 1;
    }
    start..end
}
