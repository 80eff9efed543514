//! Engine tests over a small purpose-built dialect, plus the helpers the
//! dialect tests share.
//!
//! Every parse made through [`rendered`] is checked against the event
//! invariants before its output is compared.


use std::sync::LazyLock;

use regex::Regex;

use crate::builder::{Attributes, BlockType, DocumentEvent, EventRecorder, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::outline::SlugIdStrategy;
use crate::parsing::MarkupParser;
use crate::parsing::blocks::{
    BlockKind, DelimitedContainer, FenceClose, FenceContent, FencedBlock, HeadingBlock,
    HorizontalRuleBlock, IndentedBlock, IndentedContent, LineJoin, ListBlock, ListLine,
    ListNesting, LiteralBlock, LiteralContent, ParagraphBlock, PrefixedContainer,
    TableOfContentsBlock, marker_length,
};
use crate::parsing::inline::{
    ContentMode, EntityReplacementToken, Guard, ImpliedHyperlinkToken, SimplePhraseModifier,
};

/// Parses `markup` as a document, checks the invariants and renders the
/// events one per line.
pub(crate) fn rendered(dialect: &Dialect, markup: &str) -> String {
    let mut recorder = EventRecorder::new();
    MarkupParser::new(dialect).parse(markup, &mut recorder);
    invariants::check(&dialect.preprocess(markup), recorder.recorded());
    recorder.render()
}

/// Like [`rendered`], for callers that want the recorder itself.
pub(crate) fn recorded(dialect: &Dialect, markup: &str) -> EventRecorder {
    let mut recorder = EventRecorder::new();
    MarkupParser::new(dialect).parse(markup, &mut recorder);
    invariants::check(&dialect.preprocess(markup), recorder.recorded());
    recorder
}

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("Invalid heading regex"));
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(```+)\s*(\S.*)?$").expect("Invalid fence regex"));
static QUOTE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^> ?").expect("Invalid quote regex"));
static QUOTE_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{quote\}").expect("Invalid quote macro regex"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}\s*$").expect("Invalid rule regex"));
static TOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{toc(?::([^}]*))?\}\s*$").expect("Invalid toc regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*#]+)\s+").expect("Invalid list regex"));

fn list_line(line: &str) -> Option<ListLine> {
    let marker = LIST_ITEM.captures(line)?;
    let path = marker
        .get(1)?
        .as_str()
        .chars()
        .map(|c| {
            if c == '#' {
                BlockType::NumericList
            } else {
                BlockType::BulletedList
            }
        })
        .collect();
    Some(ListLine::new(path, BlockType::ListItem, marker.get(0)?.end()))
}

fn dialect_with(options: MarkupOptions) -> Dialect {
    Dialect::builder("engine")
        .options(options)
        .id_strategy(SlugIdStrategy)
        .paragraph_breaking_block("heading", || HeadingBlock::new(&HEADING, marker_length))
        .paragraph_breaking_block("list", || ListBlock::new(list_line, ListNesting::Markers))
        .paragraph_breaking_block("fence", || {
            FencedBlock::new(&FENCE, FenceClose::AtLeast, FenceContent::Code)
                .with_language_class("language-")
        })
        .paragraph_breaking_block("quote", || {
            PrefixedContainer::new(&QUOTE_PREFIX, BlockType::Quote)
        })
        .block("quote macro", || {
            DelimitedContainer::new(&QUOTE_MACRO, &QUOTE_MACRO, BlockType::Quote, BlockKind::Quote)
        })
        .paragraph_breaking_block("rule", || HorizontalRuleBlock::new(&RULE))
        .block("toc", || TableOfContentsBlock::new(&TOC))
        .paragraph(|| ParagraphBlock::new(LineJoin::LineBreak).breaking_at(&QUOTE_MACRO))
        .phrase_modifiers(|syntax| {
            syntax
                .begin_group(Guard::boundary(r"[\s(]"))
                .add(SimplePhraseModifier::new("*", SpanType::Strong, ContentMode::Nested))
                .add(SimplePhraseModifier::new("_", SpanType::Emphasis, ContentMode::Nested))
                .end_group();
        })
        .tokens(|tokens| {
            tokens
                .add(EntityReplacementToken::new("--", "#8212"))
                .add(ImpliedHyperlinkToken::default());
        })
        .build()
        .unwrap()
}

fn dialect() -> Dialect {
    dialect_with(MarkupOptions::default())
}

fn render(markup: &str) -> String {
    rendered(&dialect(), markup)
}

#[test]
fn empty_input_is_an_empty_document() {
    insta::assert_snapshot!(render(""), @r"
    beginDocument
    endDocument
    ");
}

#[test]
fn blank_lines_separate_paragraphs() {
    insta::assert_snapshot!(render("one\ntwo\n\n\nthree -- *four*\n"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("one")
    lineBreak
    characters("two")
    endBlock
    beginBlock(paragraph)
    characters("three ")
    entityReference(#8212)
    characters(" ")
    beginSpan(strong)
    characters("four")
    endSpan
    endBlock
    endDocument
    "#);
}

#[test]
fn paragraph_breaking_blocks_interrupt_a_paragraph() {
    insta::assert_snapshot!(render("text\n# Title\n* item\nmore"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("text")
    endBlock
    beginHeading(1) [id=title]
    characters("Title")
    endHeading
    beginBlock(bulleted-list)
    beginBlock(list-item)
    characters("item")
    endBlock
    endBlock
    beginBlock(paragraph)
    characters("more")
    endBlock
    endDocument
    "#);
}

#[test]
fn heading_ids_are_unique() {
    let output = render("# Intro\n# Intro\n# Intro");
    assert!(output.contains("[id=intro]"), "{output}");
    assert!(output.contains("[id=intro-2]"), "{output}");
    assert!(output.contains("[id=intro-3]"), "{output}");
}

#[test]
fn fenced_lines_are_literal() {
    insta::assert_snapshot!(render("```rust\nlet *x* = 1;\n\n  indented\n```\nafter"), @r#"
    beginDocument
    beginBlock(code) [class=language-rust, lang=rust]
    characters("let *x* = 1;")
    characters("\n")
    characters("\n")
    characters("  indented")
    endBlock
    beginBlock(paragraph)
    characters("after")
    endBlock
    endDocument
    "#);
}

#[test]
fn unterminated_fence_is_closed_at_end_of_input() {
    insta::assert_snapshot!(render("```\ncode"), @r#"
    beginDocument
    beginBlock(code)
    characters("code")
    endBlock
    endDocument
    "#);
}

#[test]
fn newlines_are_located_on_line_terminators() {
    let markup = "```\na\r\nb\n```";
    let recorder = recorded(&dialect(), markup);
    let newline = recorder
        .recorded()
        .iter()
        .find(|r| r.event == DocumentEvent::Characters("\n".to_string()))
        .unwrap();
    assert_eq!(newline.locator.line_number, 2);
    assert_eq!(newline.locator.document_offset(), 5);
}

#[test]
fn quote_content_is_parsed_as_blocks() {
    insta::assert_snapshot!(render("> # Title\n> text *b*\n> * item\n\nout"), @r#"
    beginDocument
    beginBlock(quote)
    beginHeading(1) [id=title]
    characters("Title")
    endHeading
    beginBlock(paragraph)
    characters("text ")
    beginSpan(strong)
    characters("b")
    endSpan
    endBlock
    beginBlock(bulleted-list)
    beginBlock(list-item)
    characters("item")
    endBlock
    endBlock
    endBlock
    beginBlock(paragraph)
    characters("out")
    endBlock
    endDocument
    "#);
}

#[test]
fn quoted_text_keeps_document_offsets() {
    let recorder = recorded(&dialect(), "intro\n\n> > deep");
    let deep = recorder
        .recorded()
        .iter()
        .find(|r| r.event == DocumentEvent::Characters("deep".to_string()))
        .unwrap();
    assert_eq!(deep.locator.line_character_offset, 4);
    assert_eq!(deep.locator.document_offset(), 11);
}

#[test]
fn lazy_continuation_stays_in_the_quote() {
    insta::assert_snapshot!(render("> one\ntwo\n* item"), @r#"
    beginDocument
    beginBlock(quote)
    beginBlock(paragraph)
    characters("one")
    lineBreak
    characters("two")
    endBlock
    endBlock
    beginBlock(bulleted-list)
    beginBlock(list-item)
    characters("item")
    endBlock
    endBlock
    endDocument
    "#);
}

#[test]
fn delimited_container_can_open_and_close_mid_line() {
    insta::assert_snapshot!(render("before {quote}inside{quote} after"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("before ")
    endBlock
    beginBlock(quote)
    beginBlock(paragraph)
    characters("inside")
    endBlock
    endBlock
    beginBlock(paragraph)
    characters(" after")
    endBlock
    endDocument
    "#);
}

#[test]
fn delimited_container_spans_lines() {
    insta::assert_snapshot!(render("{quote}\nfirst\n\nsecond\n{quote}"), @r#"
    beginDocument
    beginBlock(quote)
    beginBlock(paragraph)
    characters("first")
    endBlock
    beginBlock(paragraph)
    characters("second")
    endBlock
    endBlock
    endDocument
    "#);
}

#[test]
fn unclosed_container_is_closed_at_end_of_input() {
    insta::assert_snapshot!(render("{quote}\n* a\n** b"), @r#"
    beginDocument
    beginBlock(quote)
    beginBlock(bulleted-list)
    beginBlock(list-item)
    characters("a")
    beginBlock(bulleted-list)
    beginBlock(list-item)
    characters("b")
    endBlock
    endBlock
    endBlock
    endBlock
    endBlock
    endDocument
    "#);
}

#[test]
fn horizontal_rule_stands_alone() {
    insta::assert_snapshot!(render("a\n----\nb"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("a")
    endBlock
    horizontalRule
    beginBlock(paragraph)
    characters("b")
    endBlock
    endDocument
    "#);
}

#[test]
fn table_of_contents_respects_max_level() {
    insta::assert_snapshot!(render("{toc:maxLevel=2}\n# One\n## Two\n### Three"), @r#"
    beginDocument
    beginBlock(numeric-list) [class=toc]
    beginBlock(list-item)
    link(#one, "One")
    beginBlock(numeric-list)
    beginBlock(list-item)
    link(#two, "Two")
    endBlock
    endBlock
    endBlock
    endBlock
    beginHeading(1) [id=one]
    characters("One")
    endHeading
    beginHeading(2) [id=two]
    characters("Two")
    endHeading
    beginHeading(3) [id=three]
    characters("Three")
    endHeading
    endDocument
    "#);
}

#[test]
fn generated_content_can_be_filtered() {
    let dialect = dialect_with(MarkupOptions {
        filter_generative_contents: true,
        ..MarkupOptions::default()
    });
    let output = rendered(&dialect, "{toc}\n# One");
    assert!(!output.contains("numeric-list"), "{output}");
    assert!(output.contains("beginHeading(1)"), "{output}");
}

#[test]
fn blocks_only_skips_inline_markup() {
    let dialect = dialect_with(MarkupOptions {
        blocks_only: true,
        ..MarkupOptions::default()
    });
    insta::assert_snapshot!(rendered(&dialect, "*a* -- b"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("*a* -- b")
    endBlock
    endDocument
    "#);
}

#[test]
fn content_parse_has_no_document_events() {
    let dialect = dialect();
    let mut recorder = EventRecorder::new();
    MarkupParser::new(&dialect).parse_content("text", &mut recorder, false);
    insta::assert_snapshot!(recorder.render(), @r#"
    beginBlock(paragraph)
    characters("text")
    endBlock
    "#);
}

#[test]
fn region_parse_reports_document_offsets() {
    let markup = "skipped\n\n*b* and more";
    let dialect = dialect();
    let mut recorder = EventRecorder::new();
    MarkupParser::new(&dialect).parse_region(markup, 9..16, &mut recorder);
    insta::assert_snapshot!(recorder.render(), @r#"
    beginBlock(paragraph)
    beginSpan(strong)
    characters("b")
    endSpan
    characters(" and")
    endBlock
    "#);
    let bold = recorder
        .recorded()
        .iter()
        .find(|r| r.event == DocumentEvent::Characters("b".to_string()))
        .unwrap();
    assert_eq!(bold.locator.document_offset(), 10);
    invariants::check(markup, recorder.recorded());
}

#[test]
fn region_is_clamped_to_char_boundaries() {
    let markup = "héllo";
    let dialect = dialect();
    let mut recorder = EventRecorder::new();
    MarkupParser::new(&dialect).parse_region(markup, 2..40, &mut recorder);
    insta::assert_snapshot!(recorder.render(), @r#"
    beginBlock(paragraph)
    characters("éllo")
    endBlock
    "#);
}

#[test]
fn phrase_content_is_parsed_at_its_own_offsets() {
    let recorder = recorded(&dialect(), "a *b _c_ d* e");
    let spans: Vec<(usize, usize)> = recorder
        .recorded()
        .iter()
        .filter(|r| matches!(r.event, DocumentEvent::BeginSpan { .. }))
        .map(|r| (r.locator.line_character_offset, r.locator.line_segment_end_offset))
        .collect();
    assert_eq!(spans, vec![(2, 11), (5, 8)]);
}

#[test]
fn pathological_nesting_stays_bounded() {
    let markup = format!("{}x{}", "(*".repeat(40), "*)".repeat(40));
    let recorder = recorded(&dialect(), &markup);
    let depth = recorder
        .recorded()
        .iter()
        .scan(0i32, |depth, r| {
            *depth += r.event.depth_change();
            Some(*depth)
        })
        .max()
        .unwrap_or(0);
    assert!(depth <= 2 + 33, "depth {depth}");
}

#[test]
fn raw_urls_become_links() {
    insta::assert_snapshot!(render("see https://example.com/a."), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("see ")
    link(https://example.com/a, "https://example.com/a") [href=https://example.com/a]
    characters(".")
    endBlock
    endDocument
    "#);
}

#[test]
fn parse_to_events_matches_the_recorder() {
    let dialect = dialect();
    let events = MarkupParser::new(&dialect).parse_to_events("# T");
    assert_eq!(events.first(), Some(&DocumentEvent::BeginDocument));
    assert_eq!(events.last(), Some(&DocumentEvent::EndDocument));
    assert_eq!(events.len(), 5);
}

static NOFORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{noformat\}").expect("Invalid noformat regex"));
static COMMENT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--").expect("Invalid comment regex"));
static COMMENT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->").expect("Invalid comment regex"));
static INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^  ").expect("Invalid indent regex"));
static TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\t").expect("Invalid tab regex"));

fn no_attributes(_: Option<&str>) -> Attributes {
    Attributes::new()
}

fn literal_dialect() -> Dialect {
    Dialect::builder("literal")
        .paragraph_breaking_block("noformat", || {
            LiteralBlock::new(
                &NOFORMAT,
                &NOFORMAT,
                LiteralContent::Block(BlockType::Preformatted, no_attributes),
            )
        })
        .paragraph_breaking_block("comment", || {
            LiteralBlock::new(&COMMENT_OPEN, &COMMENT_CLOSE, LiteralContent::Hidden)
                .at_line_start()
                .multi_line()
        })
        .paragraph_breaking_block("indented", || {
            IndentedBlock::new(&INDENT, BlockType::Preformatted, IndentedContent::Markup)
        })
        .block("tabbed", || {
            IndentedBlock::new(&TAB, BlockType::Code, IndentedContent::Literal)
        })
        .paragraph(|| ParagraphBlock::new(LineJoin::LineBreak))
        .phrase_modifiers(|syntax| {
            syntax.add(SimplePhraseModifier::new("*", SpanType::Strong, ContentMode::Nested));
        })
        .build()
        .unwrap()
}

#[test]
fn literal_block_keeps_markup_as_text() {
    insta::assert_snapshot!(rendered(&literal_dialect(), "{noformat}\n*a*\n  b\n{noformat}\nafter"), @r#"
    beginDocument
    beginBlock(preformatted)
    characters("*a*")
    characters("\n")
    characters("  b")
    endBlock
    beginBlock(paragraph)
    characters("after")
    endBlock
    endDocument
    "#);
}

#[test]
fn hidden_literal_hands_back_the_rest_of_the_line() {
    insta::assert_snapshot!(rendered(&literal_dialect(), "<!--\nhidden\n-->shown"), @r#"
    beginDocument
    beginBlock(paragraph)
    characters("shown")
    endBlock
    endDocument
    "#);
}

#[test]
fn multi_line_literal_leaves_single_line_forms_alone() {
    let output = rendered(&literal_dialect(), "<!-- inline -->");
    assert!(output.contains(r#"characters("<!-- inline -->")"#), "{output}");
}

#[test]
fn indented_lines_form_one_block() {
    insta::assert_snapshot!(rendered(&literal_dialect(), "  a *b*\n  c\nd"), @r#"
    beginDocument
    beginBlock(preformatted)
    characters("a ")
    beginSpan(strong)
    characters("b")
    endSpan
    characters("\n")
    characters("c")
    endBlock
    beginBlock(paragraph)
    characters("d")
    endBlock
    endDocument
    "#);
}

#[test]
fn blank_line_ends_an_indented_block() {
    let output = rendered(&literal_dialect(), "  a\n\n  b");
    assert_eq!(output.matches("beginBlock(preformatted)").count(), 2, "{output}");
}

#[test]
fn literal_indented_content_is_not_parsed() {
    let output = rendered(&literal_dialect(), "\t*x*");
    assert!(output.contains("beginBlock(code)"), "{output}");
    assert!(output.contains(r#"characters("*x*")"#), "{output}");
    assert!(!output.contains("beginSpan"), "{output}");
}

#[test]
fn non_breaking_indented_block_continues_a_paragraph() {
    let output = rendered(&literal_dialect(), "text\n\tmore");
    assert!(!output.contains("beginBlock(code)"), "{output}");
}
