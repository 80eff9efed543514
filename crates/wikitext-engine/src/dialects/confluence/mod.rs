//! Confluence wiki markup.
//!
//! Block structure comes from signatures such as `h1.` and `bq.` and from
//! `{macro}` pairs, which may open and close in the middle of a line.

mod blocks;
mod phrases;
mod table;

use std::sync::LazyLock;

use regex::Regex;

pub use blocks::{QuoteBlock, macro_parameters};
pub use phrases::{AnchorToken, ColorPhraseModifier, ImageElement, LinkElement};
pub use table::TableBlock;

use crate::builder::{BlockType, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::outline::DefaultIdStrategy;
use crate::parsing::blocks::{
    BlockKind, DelimitedContainer, HeadingBlock, HorizontalRuleBlock, LineJoin, ListBlock,
    ListNesting, LiteralBlock, LiteralContent, ParagraphBlock, TableOfContentsBlock, digit_level,
};
use crate::parsing::inline::{
    ContentMode, EntityReferenceToken, EntityReplacementToken, Guard, ImpliedHyperlinkToken,
    LineBreakToken, SimplePhraseModifier, spaced_between_words,
};

const PHRASE_BOUNDARY: &str = r#"[\s.,"'?!;:)(}{\]\[]"#;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h([1-6])\.\s+(.*)$").expect("Invalid Confluence heading regex"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}\s*$").expect("Invalid Confluence rule regex"));
static TOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{toc(?::([^}]*))?\}\s*$").expect("Invalid Confluence toc regex")
});
static MACRO_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?:code|noformat|quote|panel|note|info|tip|warning)(?::[^}]*)?\}")
        .expect("Invalid Confluence macro regex")
});

static CODE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{code(?::([^}]*))?\}").expect("Invalid code macro regex"));
static CODE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{code\}").expect("Invalid code macro regex"));
static NOFORMAT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{noformat(?::([^}]*))?\}").expect("Invalid noformat macro regex")
});
static NOFORMAT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{noformat\}").expect("Invalid noformat macro regex"));
static QUOTE_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{quote\}").expect("Invalid quote macro regex"));
static PANEL_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{panel(?::([^}]*))?\}").expect("Invalid panel macro regex"));
static PANEL_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{panel\}").expect("Invalid panel macro regex"));
static NOTE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{note(?::([^}]*))?\}").expect("Invalid note macro regex"));
static NOTE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{note\}").expect("Invalid note macro regex"));
static INFO_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{info(?::([^}]*))?\}").expect("Invalid info macro regex"));
static INFO_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{info\}").expect("Invalid info macro regex"));
static TIP_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{tip(?::([^}]*))?\}").expect("Invalid tip macro regex"));
static TIP_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{tip\}").expect("Invalid tip macro regex"));
static WARNING_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{warning(?::([^}]*))?\}").expect("Invalid warning macro regex")
});
static WARNING_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{warning\}").expect("Invalid warning macro regex"));

/// Content that neither starts nor ends with whitespace or the delimiter's
/// own character, so `**` is not an empty strong phrase.
fn content_without(delimiter: &str) -> String {
    let first = delimiter.chars().next().map(String::from).unwrap_or_default();
    let excluded = regex::escape(&first);
    format!(r"[^\s{excluded}](?:.*?[^\s{excluded}])?")
}

fn phrase(delimiter: &str, span: SpanType) -> SimplePhraseModifier {
    SimplePhraseModifier::new(delimiter, span, ContentMode::Nested)
        .with_content(&content_without(delimiter))
}

pub fn confluence(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    let raw_hyperlinks = options.detect_raw_hyperlinks;
    Dialect::builder("confluence")
        .options(options)
        .id_strategy(DefaultIdStrategy)
        .paragraph_breaking_block("heading", || HeadingBlock::new(&HEADING, digit_level))
        .paragraph_breaking_block("horizontal rule", || HorizontalRuleBlock::new(&RULE))
        .paragraph_breaking_block("list", || {
            ListBlock::new(blocks::list_line, ListNesting::Levels)
        })
        .paragraph_breaking_block("quote", QuoteBlock::new)
        .paragraph_breaking_block("table", TableBlock::new)
        .paragraph_breaking_block("quote macro", || {
            DelimitedContainer::new(&QUOTE_MACRO, &QUOTE_MACRO, BlockType::Quote, BlockKind::Quote)
        })
        .paragraph_breaking_block("noformat", || {
            LiteralBlock::new(
                &NOFORMAT_OPEN,
                &NOFORMAT_CLOSE,
                LiteralContent::Block(BlockType::Preformatted, blocks::noformat_attributes),
            )
            .with_line_endings()
        })
        .paragraph_breaking_block("code", || {
            LiteralBlock::new(
                &CODE_OPEN,
                &CODE_CLOSE,
                LiteralContent::Block(BlockType::Code, blocks::code_attributes),
            )
            .with_line_endings()
        })
        .paragraph_breaking_block("panel", || {
            DelimitedContainer::new(&PANEL_OPEN, &PANEL_CLOSE, BlockType::Panel, BlockKind::Panel)
                .with_attributes(blocks::panel_attributes)
        })
        .paragraph_breaking_block("note", || {
            DelimitedContainer::new(&NOTE_OPEN, &NOTE_CLOSE, BlockType::Note, BlockKind::Panel)
                .with_attributes(blocks::panel_attributes)
        })
        .paragraph_breaking_block("info", || {
            DelimitedContainer::new(&INFO_OPEN, &INFO_CLOSE, BlockType::Info, BlockKind::Panel)
                .with_attributes(blocks::panel_attributes)
        })
        .paragraph_breaking_block("tip", || {
            DelimitedContainer::new(&TIP_OPEN, &TIP_CLOSE, BlockType::Tip, BlockKind::Panel)
                .with_attributes(blocks::panel_attributes)
        })
        .paragraph_breaking_block("warning", || {
            DelimitedContainer::new(
                &WARNING_OPEN,
                &WARNING_CLOSE,
                BlockType::Warning,
                BlockKind::Panel,
            )
            .with_attributes(blocks::panel_attributes)
        })
        .paragraph_breaking_block("table of contents", || TableOfContentsBlock::new(&TOC))
        .paragraph(|| ParagraphBlock::new(LineJoin::LineBreak).breaking_at(&MACRO_START))
        .phrase_modifiers(|syntax| {
            syntax.begin_group(Guard::boundary(PHRASE_BOUNDARY));
            for (delimiter, span) in [
                ("*", SpanType::Strong),
                ("_", SpanType::Emphasis),
                ("??", SpanType::Citation),
                ("-", SpanType::Deleted),
                ("+", SpanType::Underlined),
                ("^", SpanType::Superscript),
                ("~", SpanType::Subscript),
            ] {
                syntax.add(phrase(delimiter, span));
            }
            syntax
                .add(ImageElement)
                .end_group()
                .add(LinkElement)
                .add(SimplePhraseModifier::wrapped(
                    "{{",
                    "}}",
                    SpanType::Monospace,
                    ContentMode::Tokens,
                ))
                .add(ColorPhraseModifier);
        })
        .tokens(|tokens| {
            tokens
                .add(LineBreakToken::new(r"\\\\"))
                .add(EntityReplacementToken::pattern(r"\((?i:tm)\)", "#8482"))
                .add(EntityReplacementToken::pattern(r"\((?i:c)\)", "#169"))
                .add(EntityReplacementToken::pattern(r"\((?i:r)\)", "#174"))
                .add(EntityReplacementToken::new("---", "#8212").when(spaced_between_words))
                .add(EntityReplacementToken::new("--", "#8211").when(spaced_between_words))
                .add(AnchorToken)
                .add(EntityReferenceToken);
            if raw_hyperlinks {
                tokens.add(ImpliedHyperlinkToken::default());
            }
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tests::rendered;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(markup: &str) -> String {
        rendered(&confluence(MarkupOptions::default()).unwrap(), markup)
    }

    #[test]
    fn headings_and_paragraphs() {
        insta::assert_snapshot!(render("h1. A Title\n\nfirst line\nsecond line"), @r#"
        beginDocument
        beginHeading(1) [id=atitle]
        characters("A Title")
        endHeading
        beginBlock(paragraph)
        characters("first line")
        lineBreak
        characters("second line")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn code_macro_ends_a_paragraph_mid_line() {
        insta::assert_snapshot!(render("text{code}some code{code}"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("text")
        endBlock
        beginBlock(code)
        characters("some code")
        characters("\n")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn text_after_a_closed_macro_is_a_paragraph() {
        insta::assert_snapshot!(render("{code}some code{code}more text"), @r#"
        beginDocument
        beginBlock(code)
        characters("some code")
        characters("\n")
        endBlock
        beginBlock(paragraph)
        characters("more text")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn multi_line_code_keeps_its_newlines() {
        insta::assert_snapshot!(render("{code:java}\nint a;\nint b;\n{code}"), @r#"
        beginDocument
        beginBlock(code) [class=java code-java, lang=java]
        characters("int a;")
        characters("\n")
        characters("int b;")
        characters("\n")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn every_code_line_ends_with_a_newline() {
        insta::assert_snapshot!(render("{code}\none\n\ntwo\n{code}"), @r#"
        beginDocument
        beginBlock(code)
        characters("one")
        characters("\n")
        characters("\n")
        characters("two")
        characters("\n")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn sibling_after_a_deeper_list_of_another_type() {
        insta::assert_snapshot!(render("* a\n## b\n* c"), @r#"
        beginDocument
        beginBlock(bulleted-list)
        beginBlock(list-item)
        characters("a")
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("b")
        endBlock
        endBlock
        endBlock
        beginBlock(list-item)
        characters("c")
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn noformat_is_preformatted() {
        let output = render("{noformat}\n*not bold*\n{noformat}");
        assert!(output.contains("beginBlock(preformatted)"), "{output}");
        assert!(output.contains(r#"characters("*not bold*")"#), "{output}");
        assert!(!output.contains("beginSpan"), "{output}");
    }

    #[test]
    fn quote_runs_to_the_blank_line() {
        insta::assert_snapshot!(render("bq. quoted\nmore\n\nafter"), @r#"
        beginDocument
        beginBlock(quote)
        beginBlock(paragraph)
        characters("quoted")
        lineBreak
        characters("more")
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("after")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn quote_macro_contains_paragraphs() {
        insta::assert_snapshot!(render("{quote}\nquoted text\n{quote}"), @r#"
        beginDocument
        beginBlock(quote)
        beginBlock(paragraph)
        characters("quoted text")
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn panel_takes_its_title_and_colours() {
        let output = render("{panel:title=Notes|bgColor=#eee}\ncontent\n{panel}");
        assert!(
            output.contains("beginBlock(panel) [style=background-color: #eee;, title=Notes]"),
            "{output}"
        );
        assert!(output.contains(r#"characters("content")"#), "{output}");
    }

    #[rstest]
    #[case("{note}careful{note}", "beginBlock(note)")]
    #[case("{info}fyi{info}", "beginBlock(info)")]
    #[case("{tip}try this{tip}", "beginBlock(tip)")]
    #[case("{warning}stop{warning}", "beginBlock(warning)")]
    fn admonitions(#[case] markup: &str, #[case] expected: &str) {
        let output = render(markup);
        assert!(output.contains(expected), "{output}");
    }

    #[test]
    fn tables_have_header_and_normal_cells() {
        insta::assert_snapshot!(render("||a||b||\n|c|*d*|"), @r#"
        beginDocument
        beginBlock(table)
        beginBlock(table-row)
        beginBlock(table-cell-header)
        characters("a")
        endBlock
        beginBlock(table-cell-header)
        characters("b")
        endBlock
        endBlock
        beginBlock(table-row)
        beginBlock(table-cell-normal)
        characters("c")
        endBlock
        beginBlock(table-cell-normal)
        beginSpan(strong)
        characters("d")
        endSpan
        endBlock
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn lists_nest_by_marker() {
        insta::assert_snapshot!(render("* one\n*# two\n\n- three"), @r#"
        beginDocument
        beginBlock(bulleted-list)
        beginBlock(list-item)
        characters("one")
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("two")
        endBlock
        endBlock
        endBlock
        endBlock
        beginBlock(bulleted-list) [style=list-style: square]
        beginBlock(list-item)
        characters("three")
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn four_dashes_are_a_rule() {
        assert!(render("----").contains("horizontalRule"));
    }

    #[rstest]
    #[case("*strong*", "strong")]
    #[case("_emphasis_", "emphasis")]
    #[case("??citation??", "citation")]
    #[case("-deleted-", "deleted")]
    #[case("+underlined+", "underlined")]
    #[case("^superscript^", "superscript")]
    #[case("~subscript~", "subscript")]
    #[case("{{monospace}}", "monospace")]
    fn phrase_modifiers(#[case] markup: &str, #[case] span: &str) {
        let output = render(&format!("a {markup} b"));
        assert!(output.contains(&format!("beginSpan({span})")), "{output}");
    }

    #[test]
    fn empty_delimiters_are_text() {
        let output = render("a ** b -- c");
        assert!(!output.contains("beginSpan"), "{output}");
    }

    #[rstest]
    #[case("[http://example.com]", r#"link(http://example.com, "http://example.com")"#)]
    #[case("[Example|http://example.com]", r#"link(http://example.com, "Example")"#)]
    #[case(
        "[Example|http://example.com|A tip]",
        r#"link(http://example.com, "Example") [title=A tip, href=http://example.com]"#
    )]
    fn links(#[case] markup: &str, #[case] expected: &str) {
        let output = render(&format!("see {markup} now"));
        assert!(output.contains(expected), "{output}");
        assert!(output.contains(r#"characters(" now")"#), "{output}");
    }

    #[test]
    fn images_take_options() {
        let output = render("!pic.png|align=right, alt=A picture!");
        assert!(output.contains("image(pic.png)"), "{output}");
        assert!(!output.contains("characters"), "{output}");
    }

    #[test]
    fn color_wraps_nested_markup() {
        insta::assert_snapshot!(render("{color:red}*hot*{color}"), @r#"
        beginDocument
        beginBlock(paragraph)
        beginSpan(span) [style=color: red;]
        beginSpan(strong)
        characters("hot")
        endSpan
        endSpan
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn anchors_are_targets() {
        let output = render("{anchor:here}text");
        assert!(output.contains(r#"link(-, "") [id=here]"#), "{output}");
    }

    #[test]
    fn tokens() {
        let output = render(r"a \\ b (c) c --- d -- e");
        assert!(output.contains("lineBreak"), "{output}");
        assert!(output.contains("entityReference(#169)"), "{output}");
        assert!(output.contains("entityReference(#8212)"), "{output}");
        assert!(output.contains("entityReference(#8211)"), "{output}");
    }

    #[test]
    fn macro_parameters_split_on_pipes() {
        assert_eq!(
            macro_parameters("java|title=A"),
            vec![("", "java"), ("title", "A")]
        );
    }
}
