//! Heading ids and the document outline.

pub mod ids;

pub use ids::{
    AsciiDocIdStrategy, DefaultIdStrategy, IdGenerationStrategy, IdGenerator,
    MediaWikiIdStrategy, SlugIdStrategy,
};

use serde::Serialize;

use crate::builder::{Attributes, BlockType, DocumentBuilder, SpanType};
use crate::dialect::Dialect;
use crate::parsing::{Locator, MarkupParser};

/// A heading in the outline tree. The root has level 0 and covers the whole
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutlineItem {
    /// Plain text of the heading.
    pub label: String,
    pub id: Option<String>,
    pub level: u8,
    /// Document offset of the heading's first line.
    pub offset: usize,
    /// Length of the heading's source lines, terminators excluded.
    pub length: usize,
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    fn root(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// The last item, in document order, that starts at or before `offset`.
    pub fn find_nearest(&self, offset: usize) -> &OutlineItem {
        let mut nearest = self;
        for child in &self.children {
            if child.offset > offset {
                break;
            }
            nearest = child.find_nearest(offset);
        }
        nearest
    }

    pub fn find_by_id(&self, id: &str) -> Option<&OutlineItem> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    /// Number of items below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Nests a flat, document-ordered list of headings by level.
///
/// An item becomes a child of the closest preceding item with a lower level;
/// skipped levels (an `h3` right after an `h1`) nest directly.
pub fn build_hierarchy(items: Vec<OutlineItem>) -> Vec<OutlineItem> {
    let mut result = Vec::new();
    let mut stack: Vec<OutlineItem> = Vec::new();

    for item in items {
        while stack.last().is_some_and(|top| top.level >= item.level) {
            attach(&mut stack, &mut result);
        }
        stack.push(item);
    }
    while !stack.is_empty() {
        attach(&mut stack, &mut result);
    }

    result
}

fn attach(stack: &mut Vec<OutlineItem>, result: &mut Vec<OutlineItem>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => result.push(done),
        }
    }
}

/// Builder that only keeps headings.
#[derive(Debug, Default)]
pub struct OutlineBuilder {
    locator: Locator,
    items: Vec<OutlineItem>,
    current: Option<OutlineItem>,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headings seen so far, flat and in document order.
    pub fn items(&self) -> &[OutlineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<OutlineItem> {
        self.items
    }

    fn append(&mut self, text: &str) {
        if let Some(current) = &mut self.current {
            current.label.push_str(text);
        }
    }
}

impl DocumentBuilder for OutlineBuilder {
    fn set_locator(&mut self, locator: &Locator) {
        self.locator = *locator;
        if let Some(current) = &mut self.current {
            let end = locator.line_document_offset + locator.line_length;
            current.length = current.length.max(end.saturating_sub(current.offset));
        }
    }

    fn begin_document(&mut self) {}

    fn end_document(&mut self) {}

    fn begin_block(&mut self, _kind: BlockType, _attributes: &Attributes) {}

    fn end_block(&mut self) {}

    fn begin_span(&mut self, _kind: SpanType, _attributes: &Attributes) {}

    fn end_span(&mut self) {}

    fn begin_heading(&mut self, level: u8, attributes: &Attributes) {
        self.current = Some(OutlineItem {
            label: String::new(),
            id: attributes.id.clone(),
            level,
            offset: self.locator.line_document_offset,
            length: self.locator.line_length,
            children: Vec::new(),
        });
    }

    fn end_heading(&mut self) {
        if let Some(mut item) = self.current.take() {
            item.label = item.label.trim().to_string();
            self.items.push(item);
        }
    }

    fn characters(&mut self, text: &str) {
        self.append(text);
    }

    fn characters_unescaped(&mut self, _text: &str) {}

    fn entity_reference(&mut self, entity: &str) {
        match decode_entity(entity) {
            Some(c) => self.append(c.encode_utf8(&mut [0; 4])),
            None => self.append(&format!("&{entity};")),
        }
    }

    fn image(&mut self, _attributes: &Attributes, _url: &str) {}

    fn image_link(&mut self, _: &Attributes, _: &Attributes, _: &str, _: &str) {}

    fn link(&mut self, _attributes: &Attributes, _href: Option<&str>, text: &str) {
        self.append(text);
    }

    fn acronym(&mut self, text: &str, _definition: &str) {
        self.append(text);
    }

    fn line_break(&mut self) {
        self.append(" ");
    }

    fn horizontal_rule(&mut self) {}
}

/// The character an entity reference stands for, for the handful of named
/// entities that show up in headings and any numeric one.
pub fn decode_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(decimal) = entity.strip_prefix('#') {
        return decimal.parse().ok().and_then(char::from_u32);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "trade" => Some('™'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        _ => None,
    }
}

/// Runs a dialect's block engine with an [`OutlineBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct OutlineParser<'d> {
    dialect: &'d Dialect,
}

impl<'d> OutlineParser<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// Root item (level 0) whose children are the document's headings.
    pub fn parse(&self, markup: &str) -> OutlineItem {
        let mut builder = OutlineBuilder::new();
        MarkupParser::new(self.dialect).parse_structure(markup, &mut builder);
        let mut root = OutlineItem::root(markup.len());
        root.children = build_hierarchy(builder.into_items());
        log::debug!(
            "outline of {} bytes: {} headings",
            markup.len(),
            root.descendant_count()
        );
        root
    }
}
