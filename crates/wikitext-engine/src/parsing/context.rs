use std::ops::Range;

use super::blocks::Block;
use super::inline::ElementMatch;
use super::locator::Locator;
use super::state::ContentState;
use super::text::Line;
use crate::builder::{Attributes, BlockType, DocumentBuilder, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::outline::{OutlineItem, OutlineParser};

/// Nested inline parsing deeper than this is emitted as plain text.
const MAX_INLINE_NESTING: usize = 32;

/// One parse session: fresh block instances, the content state, the builder
/// and the current line.
///
/// Blocks and inline elements receive this as an explicit parameter. Every
/// builder call made through it is preceded by the current [`Locator`].
pub struct ParseContext<'a> {
    dialect: &'a Dialect,
    markup: &'a str,
    builder: &'a mut dyn DocumentBuilder,
    state: ContentState,
    matchers: Vec<Box<dyn Block>>,
    line: Line<'a>,
    next_line: Option<Line<'a>>,
    generative: bool,
    // (element index, content start, content end) of nested inline passes in progress
    nesting: Vec<(usize, usize, usize)>,
    // start of the current container's content within the line
    column: usize,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        dialect: &'a Dialect,
        markup: &'a str,
        builder: &'a mut dyn DocumentBuilder,
        generative: bool,
    ) -> Self {
        let matchers = dialect.blocks().iter().map(|entry| entry.instantiate()).collect();
        Self {
            dialect,
            markup,
            builder,
            state: ContentState::new(),
            matchers,
            line: Line {
                text: "",
                number: 0,
                offset: 0,
                terminator: 0,
            },
            next_line: None,
            generative: generative && !dialect.options().filter_generative_contents,
            nesting: Vec::new(),
            column: 0,
        }
    }

    pub fn dialect(&self) -> &'a Dialect {
        self.dialect
    }

    pub fn options(&self) -> &'a MarkupOptions {
        self.dialect.options()
    }

    /// The whole document being parsed.
    pub fn markup(&self) -> &'a str {
        self.markup
    }

    /// The current line as blocks see it: inside a container, the part of
    /// the line after the container's own markup.
    pub fn line(&self) -> Line<'a> {
        let mut line = self.line;
        line.text = line.text.get(self.column..).unwrap_or("");
        line.offset += self.column;
        line
    }

    /// The line after the current one, if any.
    pub fn peek_line(&self) -> Option<Line<'a>> {
        self.next_line
    }

    pub fn state(&self) -> &ContentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ContentState {
        &mut self.state
    }

    pub fn locator(&self) -> Locator {
        self.state.locator
    }

    /// False during the outline pass and when generated content is filtered.
    pub fn is_generative(&self) -> bool {
        self.generative
    }

    pub(crate) fn begin_line(&mut self, line: Line<'a>, next_line: Option<Line<'a>>) {
        if self.line.number > 0 {
            self.state.previous_line = Some(self.state.locator);
        }
        self.line = line;
        self.next_line = next_line;
        self.column = 0;
        self.state.locator = Locator {
            line_number: line.number,
            line_document_offset: line.offset,
            line_length: line.text.len(),
            line_character_offset: 0,
            line_segment_end_offset: 0,
        };
    }

    /// Sets the segment the next events refer to, in the coordinates of
    /// [`line`](Self::line).
    pub fn set_segment(&mut self, start: usize, end: usize) {
        self.set_line_segment(self.column + start, self.column + end);
    }

    fn set_line_segment(&mut self, start: usize, end: usize) {
        self.state.locator.line_character_offset = start;
        self.state.locator.line_segment_end_offset = end.max(start);
    }

    /// Runs `f` with positions shifted by `start`, so that blocks nested in a
    /// container see the rest of the line as a line of their own.
    pub fn with_column<R>(&mut self, start: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.column;
        self.column += start;
        let result = f(self);
        self.column = saved;
        result
    }

    fn shifted(&self, range: Range<usize>) -> Range<usize> {
        self.column + range.start..self.column + range.end
    }

    fn located(&mut self) -> &mut dyn DocumentBuilder {
        self.builder.set_locator(&self.state.locator);
        &mut *self.builder
    }

    // -- block scanning --------------------------------------------------

    /// The first block, in dialect order, that can start at `offset`.
    ///
    /// The matched instance is handed out and replaced with a fresh one, so a
    /// block's state never outlives the occurrence that created it.
    pub fn start_block(&mut self, line: &str, offset: usize) -> Option<Box<dyn Block>> {
        let index = self
            .matchers
            .iter_mut()
            .position(|matcher| matcher.can_start(line, offset))?;
        let dialect = self.dialect;
        let entry = &dialect.blocks()[index];
        log::trace!(
            "line {}: {} block starts at {offset}",
            self.line.number,
            entry.name()
        );
        Some(std::mem::replace(
            &mut self.matchers[index],
            entry.instantiate(),
        ))
    }

    /// True if a paragraph-breaking block can start at `offset`.
    pub fn breaks_paragraph(&mut self, line: &str, offset: usize) -> bool {
        self.matchers
            .iter_mut()
            .zip(self.dialect.blocks())
            .any(|(matcher, entry)| entry.breaks_paragraph() && matcher.can_start(line, offset))
    }

    pub fn new_paragraph(&self) -> Box<dyn Block> {
        self.dialect.new_paragraph()
    }

    /// Registers a heading id using the dialect's strategy.
    ///
    /// Returns `None` for dialects that do not generate heading ids.
    pub fn heading_id(&mut self, level: u8, text: &str) -> Option<String> {
        let strategy = self.dialect.id_strategy()?;
        Some(self.state.ids.new_id(strategy, &format!("h{level}"), text))
    }

    /// Outline of the whole document, computed on first use.
    pub fn outline(&mut self) -> OutlineItem {
        if self.state.outline.is_none() {
            self.state.outline = Some(OutlineParser::new(self.dialect).parse(self.markup));
        }
        self.state.outline.clone().unwrap_or_default()
    }

    // -- events ----------------------------------------------------------

    pub(crate) fn begin_document(&mut self) {
        self.located().begin_document();
    }

    pub(crate) fn end_document(&mut self) {
        let end = self.state.locator.line_length;
        self.set_line_segment(end, end);
        self.located().end_document();
    }

    pub fn begin_block(&mut self, kind: BlockType, attributes: &Attributes) {
        self.located().begin_block(kind, attributes);
    }

    pub fn end_block(&mut self) {
        self.located().end_block();
    }

    pub fn begin_span(&mut self, kind: SpanType, attributes: &Attributes) {
        self.located().begin_span(kind, attributes);
    }

    pub fn end_span(&mut self) {
        self.located().end_span();
    }

    pub fn begin_heading(&mut self, level: u8, attributes: &Attributes) {
        self.located().begin_heading(level, attributes);
    }

    pub fn end_heading(&mut self) {
        self.located().end_heading();
    }

    /// Emits the given slice of the current line as text.
    pub fn characters(&mut self, range: Range<usize>) {
        let range = self.shifted(range);
        let line = self.line.text;
        if let Some(text) = line.get(range.clone())
            && !text.is_empty()
        {
            self.set_line_segment(range.start, range.end);
            self.located().characters(text);
        }
    }

    /// Emits raw text for the current segment.
    pub fn characters_unescaped(&mut self, text: &str) {
        self.located().characters_unescaped(text);
    }

    pub fn entity_reference(&mut self, entity: &str) {
        self.located().entity_reference(entity);
    }

    pub fn image(&mut self, attributes: &Attributes, url: &str) {
        self.located().image(attributes, url);
    }

    pub fn image_link(
        &mut self,
        link_attributes: &Attributes,
        image_attributes: &Attributes,
        href: &str,
        image_url: &str,
    ) {
        self.located()
            .image_link(link_attributes, image_attributes, href, image_url);
    }

    pub fn link(&mut self, attributes: &Attributes, href: Option<&str>, text: &str) {
        self.located().link(attributes, href, text);
    }

    pub fn acronym(&mut self, text: &str, definition: &str) {
        self.located().acronym(text, definition);
    }

    pub fn line_break(&mut self) {
        self.located().line_break();
    }

    pub fn horizontal_rule(&mut self) {
        self.located().horizontal_rule();
    }

    /// Emits `"\n"` located on the current line's terminator.
    pub fn line_terminator(&mut self) {
        let end = self.line.text.len();
        self.set_line_segment(end, end + 1);
        self.located().characters("\n");
    }

    /// Emits `"\n"` located on the previous line's terminator.
    ///
    /// Used by blocks that join their lines with newlines when they start
    /// emitting the next line.
    pub fn previous_line_terminator(&mut self) {
        if let Some(previous) = self.state.previous_line {
            let located = Locator {
                line_character_offset: previous.line_length,
                line_segment_end_offset: previous.line_length + 1,
                ..previous
            };
            self.builder.set_locator(&located);
            self.builder.characters("\n");
        }
    }

    // -- inline ----------------------------------------------------------

    /// Inline markup over a range of the current line: phrase modifiers,
    /// with tokens applied to the text between them.
    pub fn emit_markup_line(&mut self, range: Range<usize>) {
        let range = self.shifted(range);
        self.with_column_reset(|cx| cx.phrase_pass(range));
    }

    /// Tokens only; everything else in the range is plain text.
    pub fn emit_markup_text(&mut self, range: Range<usize>) {
        let range = self.shifted(range);
        self.with_column_reset(|cx| cx.token_pass(range));
    }

    // element matches carry whole-line positions
    fn with_column_reset(&mut self, f: impl FnOnce(&mut Self)) {
        let saved = std::mem::take(&mut self.column);
        f(self);
        self.column = saved;
    }

    fn phrase_pass(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if self.options().blocks_only {
            self.characters(range);
            return;
        }
        let dialect = self.dialect;
        let syntax = dialect.phrase_modifiers();
        let line = self.line.text;
        let mut pos = range.start;
        while pos < range.end {
            let Some(found) = syntax.find(line, range.clone(), pos) else {
                break;
            };
            if found.start() > pos {
                self.token_pass(pos..found.start());
            }
            let element = syntax.element(found.index());
            log::trace!("{} at {:?}", element.name(), found.range());
            self.set_line_segment(found.start(), found.end());
            element.emit(self, &found);
            pos = found.end();
        }
        if pos < range.end {
            self.token_pass(pos..range.end);
        }
    }

    fn token_pass(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if self.options().blocks_only {
            self.characters(range);
            return;
        }
        let dialect = self.dialect;
        let syntax = dialect.tokens();
        let line = self.line.text;
        let mut pos = range.start;
        while pos < range.end {
            let Some(found) = syntax.find(line, range.clone(), pos) else {
                break;
            };
            if found.start() > pos {
                self.characters(pos..found.start());
            }
            let element = syntax.element(found.index());
            log::trace!("{} at {:?}", element.name(), found.range());
            self.set_line_segment(found.start(), found.end());
            element.emit(self, &found);
            pos = found.end();
        }
        if pos < range.end {
            self.characters(pos..range.end);
        }
    }

    /// Re-parses the content captured by `group` of a phrase modifier.
    ///
    /// Only valid while an element is being emitted. The content is parsed
    /// at its own offsets. A span that would be
    /// re-entered unchanged by the same element, or that nests too deeply,
    /// is emitted through the token layer only.
    pub fn emit_nested(&mut self, found: &ElementMatch<'_>, group: usize) {
        let Some(content) = found.group_range(group) else {
            return;
        };
        if content.is_empty() {
            return;
        }
        let key = (found.index(), content.start, content.end);
        if content == found.range()
            || self.nesting.contains(&key)
            || self.nesting.len() >= MAX_INLINE_NESTING
        {
            self.token_pass(content);
            return;
        }
        self.nesting.push(key);
        self.phrase_pass(content);
        self.nesting.pop();
    }
}
