//! MediaWiki markup.
//!
//! Every block breaks paragraphs. Paragraph lines are joined with newlines
//! unless `newlines_cause_line_break` is set, and a line starting with a
//! space is preformatted text unless `optimize_for_repository` is set.
//! Templates are expanded before the blocks see the text.

mod blocks;
mod links;
mod table;
mod templates;
mod validation;

use std::sync::LazyLock;

use regex::Regex;

pub use blocks::{html_attributes, list_line};
pub use links::{ExternalLinkToken, ImageToken, InternalLinkToken};
pub use table::TableBlock;
pub use templates::{BuiltInTemplates, TemplateExpander, TemplateResolver, expand_templates};
pub use validation::UnclosedCommentRule;

use crate::builder::{BlockType, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::outline::MediaWikiIdStrategy;
use crate::parsing::blocks::{
    HeadingBlock, IndentedBlock, IndentedContent, LineJoin, ListBlock, ListNesting, LiteralBlock,
    LiteralContent, ParagraphBlock, TableOfContentsBlock, marker_length,
};
use crate::parsing::inline::{
    ContentMode, EntityReferenceToken, EntityReplacementToken, EscapePhraseModifier, Guard,
    HorizontalRuleToken, HtmlCommentElement, HtmlTagElement, ImpliedHyperlinkToken,
    LineBreakToken, SimplePhraseModifier,
};

const PHRASE_BOUNDARY: &str = r#"[\s.,"'?!;:)(}{\]\[=>]"#;

const ALLOWED_TAGS: &[&str] = &[
    "b", "big", "blockquote", "caption", "center", "cite", "code", "dd", "del", "div", "dl", "dt",
    "em", "font", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "ins", "li", "ol", "p", "pre",
    "rb", "rp", "rt", "ruby", "s", "small", "span", "strike", "strong", "sub", "sup", "table",
    "td", "th", "tr", "tt", "u", "ul", "var",
];

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(={1,6})\s*(.+?)\s*=+\s*$").expect("Invalid MediaWiki heading regex")
});
static PREFORMATTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ ").expect("Invalid MediaWiki preformatted regex"));
static SOURCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<(?:source|syntaxhighlight)(\s[^>]*)?>")
        .expect("Invalid MediaWiki source regex")
});
static SOURCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</(?:source|syntaxhighlight)\s*>").expect("Invalid MediaWiki source regex")
});
static PRE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<pre(\s[^>]*)?>").expect("Invalid MediaWiki pre regex"));
static PRE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</pre\s*>").expect("Invalid MediaWiki pre regex"));
static NOWIKI_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<nowiki>").expect("Invalid MediaWiki nowiki regex"));
static NOWIKI_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</nowiki>").expect("Invalid MediaWiki nowiki regex"));
static COMMENT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!--").expect("Invalid MediaWiki comment regex"));
static COMMENT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->").expect("Invalid MediaWiki comment regex"));
static TOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*__TOC__\s*$").expect("Invalid MediaWiki toc regex"));

pub fn mediawiki(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    let preformatted = !options.optimize_for_repository;
    let escape_html = options.escape_html;
    let join = if options.newlines_cause_line_break {
        LineJoin::LineBreak
    } else {
        LineJoin::Newline
    };
    let mut builder = Dialect::builder("mediawiki")
        .options(options)
        .id_strategy(MediaWikiIdStrategy)
        .preprocessor(expand_templates)
        .paragraph_breaking_block("heading", || HeadingBlock::new(&HEADING, marker_length))
        .paragraph_breaking_block("list", || ListBlock::new(list_line, ListNesting::Markers));
    if preformatted {
        builder = builder.paragraph_breaking_block("preformatted", || {
            IndentedBlock::new(
                &PREFORMATTED,
                BlockType::Preformatted,
                IndentedContent::Markup,
            )
        });
    }
    builder
        .paragraph_breaking_block("source", || {
            LiteralBlock::new(
                &SOURCE_OPEN,
                &SOURCE_CLOSE,
                LiteralContent::Block(BlockType::Preformatted, blocks::source_attributes),
            )
            .at_line_start()
        })
        .paragraph_breaking_block("pre", || {
            LiteralBlock::new(
                &PRE_OPEN,
                &PRE_CLOSE,
                LiteralContent::Block(BlockType::Preformatted, blocks::pre_attributes),
            )
            .at_line_start()
        })
        .paragraph_breaking_block("table", TableBlock::new)
        .paragraph_breaking_block("table of contents", || TableOfContentsBlock::new(&TOC))
        .paragraph_breaking_block("escape", || {
            LiteralBlock::new(&NOWIKI_OPEN, &NOWIKI_CLOSE, LiteralContent::Text)
                .at_line_start()
                .multi_line()
        })
        .paragraph_breaking_block("comment", || {
            LiteralBlock::new(&COMMENT_OPEN, &COMMENT_CLOSE, LiteralContent::Hidden)
                .at_line_start()
                .multi_line()
        })
        .paragraph(move || ParagraphBlock::new(join))
        .phrase_modifiers(|syntax| {
            syntax
                .add(EscapePhraseModifier::new("<nowiki>", "</nowiki>"))
                .begin_group(Guard::boundary(PHRASE_BOUNDARY))
                .add(
                    SimplePhraseModifier::new("'''''", SpanType::Bold, ContentMode::Nested)
                        .with_spans(&[SpanType::Bold, SpanType::Italic]),
                )
                .add(SimplePhraseModifier::new("'''", SpanType::Bold, ContentMode::Nested))
                .add(SimplePhraseModifier::new("''", SpanType::Italic, ContentMode::Nested))
                .end_group();
            if !escape_html {
                syntax
                    .add(HtmlTagElement::allowed(ALLOWED_TAGS))
                    .add(HtmlCommentElement);
            }
        })
        .tokens(|tokens| {
            tokens
                .add(LineBreakToken::new(r"(?i:<br\s*/?>)"))
                .add(EntityReplacementToken::pattern(r"\((?:tm|TM)\)", "#8482"))
                .add(EntityReplacementToken::pattern(r"\((?:c|C)\)", "#169"))
                .add(EntityReplacementToken::pattern(r"\((?:r|R)\)", "#174"))
                .add(ImageToken)
                .add(InternalLinkToken)
                .add(ExternalLinkToken)
                .add(ImpliedHyperlinkToken::default())
                .add(HorizontalRuleToken::new("----").when(links::standalone_rule))
                .add(EntityReferenceToken);
        })
        .validation_rule(UnclosedCommentRule)
        .build()
}
