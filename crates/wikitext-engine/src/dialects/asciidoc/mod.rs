//! AsciiDoc, the subset used in project documentation.
//!
//! `.Title` and `[style,language]` lines are held in the content state until
//! the next listing or literal block takes them. Listing blocks close only
//! on a delimiter line identical to the one that opened them.

mod blocks;
mod tokens;

use std::sync::LazyLock;

use regex::Regex;

pub use blocks::{LineCommentBlock, MetadataBlock, list_line};
pub use tokens::{
    AnchorMacroToken, AnchorToken, CrossReferenceToken, ImageMacroToken, LinkMacroToken,
};

use crate::builder::{BlockType, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::outline::AsciiDocIdStrategy;
use crate::parsing::blocks::{
    BlockKind, DelimitedContainer, FenceClose, FenceContent, FencedBlock, HeadingBlock, LineJoin,
    ListBlock, ListNesting, ParagraphBlock, TableOfContentsBlock, marker_length,
};
use crate::parsing::inline::{
    ContentMode, EntityReferenceToken, EntityReplacementToken, Guard, ImpliedHyperlinkToken,
    LineBreakToken, SimplePhraseModifier, spaced_between_words,
};

const PHRASE_BOUNDARY: &str = r#"[\s.,"'?!;:)(}{\]\[]"#;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(={1,6})\s+(.+?)(?:\s+=+)?\s*$").expect("Invalid AsciiDoc heading regex")
});
static LISTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-{4,})\s*$").expect("Invalid AsciiDoc listing regex"));
static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.{4,})\s*$").expect("Invalid AsciiDoc literal regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/{4,})\s*$").expect("Invalid AsciiDoc comment regex"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_{4,}\s*$").expect("Invalid AsciiDoc quote regex"));
static TOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^toc::\[([^\]]*)\]\s*$").expect("Invalid AsciiDoc toc regex"));

pub fn asciidoc(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    Dialect::builder("asciidoc")
        .options(options)
        .id_strategy(AsciiDocIdStrategy)
        .block("metadata", MetadataBlock::new)
        .paragraph_breaking_block("heading", || HeadingBlock::new(&HEADING, marker_length))
        .paragraph_breaking_block("listing", || {
            FencedBlock::new(&LISTING, FenceClose::Exact, FenceContent::Preformatted)
                .with_metadata()
                .with_language_class("source-")
        })
        .paragraph_breaking_block("literal", || {
            FencedBlock::new(&LITERAL, FenceClose::Exact, FenceContent::Preformatted)
                .with_metadata()
        })
        .paragraph_breaking_block("comment block", || {
            FencedBlock::new(&COMMENT, FenceClose::Exact, FenceContent::Comment)
        })
        .paragraph_breaking_block("comment", LineCommentBlock::new)
        .paragraph_breaking_block("quote", || {
            DelimitedContainer::new(&QUOTE, &QUOTE, BlockType::Quote, BlockKind::Quote)
        })
        .paragraph_breaking_block("list", || {
            ListBlock::new(list_line, ListNesting::Indentation)
        })
        .paragraph_breaking_block("table of contents", || TableOfContentsBlock::new(&TOC))
        .paragraph(|| ParagraphBlock::new(LineJoin::Newline))
        .phrase_modifiers(|syntax| {
            syntax
                .add(SimplePhraseModifier::new("**", SpanType::Strong, ContentMode::Nested))
                .add(SimplePhraseModifier::new("__", SpanType::Emphasis, ContentMode::Nested))
                .begin_group(Guard::boundary(PHRASE_BOUNDARY))
                .add(SimplePhraseModifier::new("*", SpanType::Strong, ContentMode::Nested))
                .add(SimplePhraseModifier::new("_", SpanType::Emphasis, ContentMode::Nested))
                .add(SimplePhraseModifier::new("`", SpanType::Monospace, ContentMode::Literal))
                .add(SimplePhraseModifier::new("#", SpanType::Mark, ContentMode::Nested))
                .end_group()
                .add(
                    SimplePhraseModifier::new("^", SpanType::Superscript, ContentMode::Nested)
                        .with_content(r"[^\s^]+"),
                )
                .add(
                    SimplePhraseModifier::new("~", SpanType::Subscript, ContentMode::Nested)
                        .with_content(r"[^\s~]+"),
                );
        })
        .tokens(|tokens| {
            tokens
                .add(LineBreakToken::new(r" \+$"))
                .add(EntityReplacementToken::pattern(r"\((?:C|c)\)", "#169"))
                .add(EntityReplacementToken::pattern(r"\((?:R|r)\)", "#174"))
                .add(EntityReplacementToken::pattern(r"\((?:TM|tm)\)", "#8482"))
                .add(EntityReplacementToken::new("--", "#8212").when(spaced_between_words))
                .add(EntityReplacementToken::new("...", "#8230"))
                .add(AnchorToken)
                .add(AnchorMacroToken)
                .add(CrossReferenceToken)
                .add(ImageMacroToken)
                .add(LinkMacroToken)
                .add(ImpliedHyperlinkToken::default())
                .add(EntityReferenceToken);
        })
        .build()
}
