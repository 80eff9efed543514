//! CommonMark, without reference links or setext headings.
//!
//! Nesting inside list items follows marker indentation only; indented
//! paragraphs under an item are continuation text. Code spans use one or
//! two backticks.

mod blocks;
mod phrases;
mod validation;

use std::sync::LazyLock;

use regex::Regex;

pub use blocks::{HtmlBlock, list_line};
pub use phrases::{AutolinkElement, ImageElement, LinkElement};
pub use validation::UnterminatedFenceRule;

use crate::builder::{BlockType, SpanType};
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::outline::SlugIdStrategy;
use crate::parsing::blocks::{
    FenceClose, FenceContent, FencedBlock, HeadingBlock, HorizontalRuleBlock, IndentedBlock,
    IndentedContent, LineJoin, ListBlock, ListNesting, ParagraphBlock, PrefixedContainer,
    marker_length,
};
use crate::parsing::inline::{
    ContentMode, EntityReferenceToken, EscapePhraseModifier, Guard, HtmlCommentElement,
    HtmlTagElement, ImpliedHyperlinkToken, LineBreakToken, SimplePhraseModifier,
};

const PUNCTUATION: &str = r"[!-/:-@\[-`{-~]";
const UNDERSCORE_BOUNDARY: &str = r#"[\s.,"'?!;:)(}{\]\[*~]"#;
// no trailing backslash, which is an escape rather than part of the URL
const RAW_URL: &str = r#"(?:https?|ftp)://[^\s<>"\\]*[^\s<>"\\.,;:!?)\]'*]"#;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$")
        .expect("Invalid CommonMark heading regex")
});
static THEMATIC_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("Invalid CommonMark thematic break regex")
});
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(`{3,}|~{3,})[ \t]*([^`]*?)[ \t]*$").expect("Invalid CommonMark fence regex")
});
static INDENTED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?: {4}|\t)").expect("Invalid CommonMark indent regex"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}> ?").expect("Invalid CommonMark quote regex"));

pub fn commonmark(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    Dialect::builder("commonmark")
        .options(options)
        .id_strategy(SlugIdStrategy)
        .paragraph_breaking_block("heading", || HeadingBlock::new(&HEADING, marker_length))
        .paragraph_breaking_block("thematic break", || {
            HorizontalRuleBlock::new(&THEMATIC_BREAK)
        })
        .paragraph_breaking_block("fenced code", || {
            FencedBlock::new(&FENCE, FenceClose::AtLeast, FenceContent::Code)
                .with_language_class("language-")
        })
        .block("indented code", || {
            IndentedBlock::new(&INDENTED_CODE, BlockType::Code, IndentedContent::Literal)
        })
        .paragraph_breaking_block("block quote", || {
            PrefixedContainer::new(&QUOTE, BlockType::Quote)
        })
        .paragraph_breaking_block("list", || {
            ListBlock::new(list_line, ListNesting::Indentation).with_continuation()
        })
        .paragraph_breaking_block("html block", || HtmlBlock::new(&blocks::HTML_BLOCK_START))
        .block("html tag", || HtmlBlock::new(&blocks::HTML_TAG_LINE))
        .paragraph(|| ParagraphBlock::new(LineJoin::Newline))
        .phrase_modifiers(|syntax| {
            syntax
                .add(EscapePhraseModifier::new("\\", "").with_content(PUNCTUATION))
                .add(SimplePhraseModifier::new("``", SpanType::Code, ContentMode::Literal))
                .add(SimplePhraseModifier::new("`", SpanType::Code, ContentMode::Literal))
                .add(AutolinkElement)
                .add(HtmlCommentElement)
                .add(HtmlTagElement::any())
                .add(ImageElement)
                .add(LinkElement)
                .add(SimplePhraseModifier::new("**", SpanType::Strong, ContentMode::Nested))
                .add(SimplePhraseModifier::new("*", SpanType::Emphasis, ContentMode::Nested))
                .begin_group(Guard::boundary(UNDERSCORE_BOUNDARY))
                .add(SimplePhraseModifier::new("__", SpanType::Strong, ContentMode::Nested))
                .add(SimplePhraseModifier::new("_", SpanType::Emphasis, ContentMode::Nested))
                .end_group()
                .add(SimplePhraseModifier::new("~~", SpanType::Deleted, ContentMode::Nested));
        })
        .tokens(|tokens| {
            tokens
                .add(LineBreakToken::new(r"(?: {2,}|\\)$"))
                .add(EntityReferenceToken)
                .add(ImpliedHyperlinkToken::new(RAW_URL));
        })
        .validation_rule(UnterminatedFenceRule)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tests::rendered;
    use crate::validation::MarkupValidator;
    use rstest::rstest;

    fn render(markup: &str) -> String {
        rendered(&commonmark(MarkupOptions::default()).unwrap(), markup)
    }

    #[test]
    fn heading_and_paragraph() {
        insta::assert_snapshot!(render("# Getting Started ##\n\nSome *text*."), @r#"
        beginDocument
        beginHeading(1) [id=getting-started]
        characters("Getting Started")
        endHeading
        beginBlock(paragraph)
        characters("Some ")
        beginSpan(emphasis)
        characters("text")
        endSpan
        characters(".")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("#hashtag")]
    #[case("####### seven")]
    #[case("    # indented")]
    fn not_headings(#[case] markup: &str) {
        assert!(!render(markup).contains("beginHeading"));
    }

    #[test]
    fn empty_heading() {
        let output = render("##");
        assert!(output.contains("beginHeading(2)"), "{output}");
    }

    #[test]
    fn paragraph_lines_join_with_newlines() {
        insta::assert_snapshot!(render("one\ntwo"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("one")
        characters("\n")
        characters("two")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("***")]
    #[case("- - -")]
    #[case(" ___")]
    fn thematic_breaks(#[case] markup: &str) {
        assert_eq!(
            render(markup),
            "beginDocument\nhorizontalRule\nendDocument"
        );
    }

    #[test]
    fn dashes_after_a_paragraph_are_a_rule() {
        let output = render("text\n---");
        assert!(output.contains("endBlock\nhorizontalRule"), "{output}");
        assert!(!output.contains("beginHeading"), "{output}");
    }

    #[test]
    fn fenced_code() {
        let output = render("```rust\nlet x = *y*;\n```\nafter");
        assert!(
            output.contains("beginBlock(code) [class=language-rust, lang=rust]"),
            "{output}"
        );
        assert!(output.contains(r#"characters("let x = *y*;")"#), "{output}");
        assert!(output.contains(r#"characters("after")"#), "{output}");
    }

    #[test]
    fn longer_fence_closes_tilde_block() {
        let output = render("~~~\na\n~~~~~\nb");
        assert!(output.contains(r#"characters("a")"#), "{output}");
        assert!(output.contains(r#"beginBlock(paragraph)"#), "{output}");
    }

    #[test]
    fn indented_code() {
        insta::assert_snapshot!(render("    let a;\n    let b;"), @r#"
        beginDocument
        beginBlock(code)
        characters("let a;")
        characters("\n")
        characters("let b;")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn indented_line_continues_a_paragraph() {
        let output = render("text\n    more");
        assert!(!output.contains("beginBlock(code)"), "{output}");
    }

    #[test]
    fn block_quotes() {
        insta::assert_snapshot!(render("> quoted\nlazy\n\nout"), @r#"
        beginDocument
        beginBlock(quote)
        beginBlock(paragraph)
        characters("quoted")
        characters("\n")
        characters("lazy")
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("out")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn lists_nest_by_indentation() {
        insta::assert_snapshot!(render("- one\n  1. sub\n- two"), @r#"
        beginDocument
        beginBlock(bulleted-list)
        beginBlock(list-item)
        characters("one")
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("sub")
        endBlock
        endBlock
        endBlock
        beginBlock(list-item)
        characters("two")
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn list_items_take_continuation_lines() {
        let output = render("- one\n  still one\n- two");
        assert!(
            output.contains("characters(\"one\")\ncharacters(\"\\n\")\ncharacters(\"still one\")"),
            "{output}"
        );
    }

    #[test]
    fn html_blocks_pass_through() {
        insta::assert_snapshot!(render("<div class=\"note\">\n*raw*\n</div>\n\ntext"), @r#"
        beginDocument
        charactersUnescaped("<div class=\"note\">")
        characters("\n")
        charactersUnescaped("*raw*")
        characters("\n")
        charactersUnescaped("</div>")
        beginBlock(paragraph)
        characters("text")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn html_blocks_are_text_when_escaping() {
        let dialect = commonmark(MarkupOptions {
            escape_html: true,
            ..MarkupOptions::default()
        })
        .unwrap();
        let output = rendered(&dialect, "<div>\n\nafter");
        assert!(output.contains(r#"characters("<div>")"#), "{output}");
        assert!(!output.contains("charactersUnescaped"), "{output}");
    }

    #[test]
    fn inline_tags_stay_in_paragraphs() {
        let output = render("text\n<span>");
        assert!(output.contains(r#"charactersUnescaped("<span>")"#), "{output}");
        assert_eq!(output.matches("beginBlock(paragraph)").count(), 1);
    }

    #[rstest]
    #[case("**strong**", "beginSpan(strong)")]
    #[case("*em*", "beginSpan(emphasis)")]
    #[case("__strong__", "beginSpan(strong)")]
    #[case("_em_", "beginSpan(emphasis)")]
    #[case("`code`", "beginSpan(code)")]
    #[case("``a ` b``", "beginSpan(code)")]
    #[case("~~gone~~", "beginSpan(deleted)")]
    fn phrase_modifiers(#[case] markup: &str, #[case] expected: &str) {
        let output = render(&format!("a {markup} b"));
        assert!(output.contains(expected), "{output}");
    }

    #[test]
    fn intraword_underscores_are_text() {
        assert!(!render("snake_case_name").contains("beginSpan"));
    }

    #[test]
    fn code_spans_are_literal() {
        let output = render("`*not em*`");
        assert!(output.contains(r#"characters("*not em*")"#), "{output}");
        assert!(!output.contains("beginSpan(emphasis)"), "{output}");
    }

    #[test]
    fn backslash_escapes() {
        let output = render(r"\*not em\*");
        assert!(!output.contains("beginSpan"), "{output}");
        assert!(output.contains(r#"characters("*")"#), "{output}");
    }

    #[test]
    fn inline_links() {
        insta::assert_snapshot!(render(r#"see [the **docs**](https://example.com "Docs") now"#), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("see ")
        beginSpan(link) [title=Docs, href=https://example.com]
        characters("the ")
        beginSpan(strong)
        characters("docs")
        endSpan
        endSpan
        characters(" now")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("![logo](logo.png)", "image(logo.png)")]
    #[case("![logo](<logo.png> 'The logo')", "image(logo.png) [title=The logo]")]
    #[case("<https://example.com/a>", r#"link(https://example.com/a, "https://example.com/a")"#)]
    #[case("<me@example.com>", r#"link(mailto:me@example.com, "me@example.com")"#)]
    #[case("https://example.com/x.", r#"link(https://example.com/x, "https://example.com/x")"#)]
    #[case("&copy;", "entityReference(copy)")]
    fn inline_elements(#[case] markup: &str, #[case] expected: &str) {
        let output = render(&format!("see {markup} now"));
        assert!(output.contains(expected), "{output}");
    }

    #[rstest]
    #[case("one  \ntwo")]
    #[case("one\\\ntwo")]
    fn hard_line_breaks(#[case] markup: &str) {
        let output = render(markup);
        assert!(output.contains("lineBreak"), "{output}");
    }

    #[test]
    fn unterminated_fence_is_reported() {
        let dialect = commonmark(MarkupOptions::default()).unwrap();
        let problems = MarkupValidator::new(&dialect).validate_all("text\n```\ncode");
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].offset, 5);
    }
}
