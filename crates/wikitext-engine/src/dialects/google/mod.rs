//! Google Code wiki syntax.
//!
//! Headings carry no ids and only lists break paragraphs. A `{{{` code
//! block is recognised at the start of a line that is not inside a
//! paragraph, or right after another block that ended mid-line.

mod blocks;

pub use blocks::{BalancedHeadingBlock, CodeBlock, list_line};

use crate::builder::SpanType;
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::parsing::blocks::{LineJoin, ListBlock, ListNesting, ParagraphBlock};
use crate::parsing::inline::{ContentMode, EntityReferenceToken, SimplePhraseModifier};

// no leading or trailing `-`, so strike-through and dashes stay apart
const CONTENT: &str = r"[^\s-](?:.*?[^\s-])?";

fn phrase(delimiter: &str, span: SpanType) -> SimplePhraseModifier {
    SimplePhraseModifier::new(delimiter, span, ContentMode::Nested).with_content(CONTENT)
}

pub fn google(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    Dialect::builder("google")
        .options(options)
        .block("heading", BalancedHeadingBlock::new)
        .paragraph_breaking_block("list", || {
            ListBlock::new(list_line, ListNesting::Indentation)
        })
        .block("code", CodeBlock::new)
        .paragraph(|| ParagraphBlock::new(LineJoin::LineBreak))
        .phrase_modifiers(|syntax| {
            syntax
                .add(phrase("*", SpanType::Strong))
                .add(phrase("_", SpanType::Italic))
                .add(phrase("`", SpanType::Monospace))
                .add(phrase(",,", SpanType::Subscript))
                .add(phrase("^", SpanType::Superscript))
                .add(phrase("~~", SpanType::Span).with_style("text-decoration: line-through"));
        })
        .tokens(|tokens| {
            tokens.add(EntityReferenceToken);
        })
        .build()
}
