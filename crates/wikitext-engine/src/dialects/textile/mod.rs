//! Textile.
//!
//! Blocks are introduced by signatures such as `h1.`, `bq.` or `bc..`;
//! phrase modifiers only count at word boundaries and accept an attribute
//! block right after the opening delimiter.

mod attributes;
mod blocks;
mod phrases;
mod table;
mod validation;

use std::sync::LazyLock;

use regex::Regex;

pub use attributes::parse_block_attributes;
pub use blocks::{Signature, SignatureBlock};
pub use phrases::{AcronymToken, FootnoteReferenceToken, HyperlinkPhraseModifier, ImagePhraseModifier};
pub use table::TableBlock;
pub use validation::BlockWhitespaceRule;

use crate::builder::SpanType;
use crate::dialect::{Dialect, MarkupOptions};
use crate::error::ConfigurationError;
use crate::outline::DefaultIdStrategy;
use crate::parsing::blocks::{
    LineJoin, ListBlock, ListNesting, ParagraphBlock, TableOfContentsBlock,
};
use crate::parsing::inline::{
    ContentMode, EntityReferenceToken, EntityReplacementToken, EscapePhraseModifier, Guard,
    HtmlTagElement, ImpliedHyperlinkToken, SimplePhraseModifier, between_digits,
};
use attributes::PHRASE_ATTRIBUTES;
use phrases::{closes_quote, opens_quote, spaced};

/// Characters that may precede a phrase modifier.
const PHRASE_BOUNDARY: &str = r#"[\s.,"'?!;:)(}{\]\[]"#;

static TOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{toc(?::([^}]*))?\}\s*$").expect("Invalid Textile toc regex")
});

pub fn textile(options: MarkupOptions) -> Result<Dialect, ConfigurationError> {
    let raw_hyperlinks = options.detect_raw_hyperlinks;
    Dialect::builder("textile")
        .options(options)
        .id_strategy(DefaultIdStrategy)
        .preparer(blocks::register_footnotes)
        .block("heading", || SignatureBlock::new(Signature::Heading))
        .paragraph_breaking_block("list", || {
            ListBlock::new(blocks::list_line, ListNesting::Levels)
        })
        .block("preformatted", || SignatureBlock::new(Signature::Preformatted))
        .block("quote", || SignatureBlock::new(Signature::Quote))
        .block("code", || SignatureBlock::new(Signature::Code))
        .block("footnote", || SignatureBlock::new(Signature::Footnote))
        .paragraph_breaking_block("table", TableBlock::new)
        .block("comment", || SignatureBlock::new(Signature::Comment))
        .block("escape", || SignatureBlock::new(Signature::Escape))
        .block("table of contents", || TableOfContentsBlock::new(&TOC))
        .paragraph(|| ParagraphBlock::new(LineJoin::LineBreak).with_prefix(blocks::paragraph_prefix))
        .phrase_modifiers(|syntax| {
            syntax.begin_group(Guard::boundary(PHRASE_BOUNDARY));
            syntax.add(EscapePhraseModifier::new("==", "=="));
            for (delimiter, span) in [
                ("**", SpanType::Bold),
                ("__", SpanType::Italic),
                ("??", SpanType::Citation),
                ("*", SpanType::Strong),
                ("_", SpanType::Emphasis),
                ("-", SpanType::Deleted),
                ("+", SpanType::Inserted),
                ("^", SpanType::Superscript),
                ("~", SpanType::Subscript),
                ("%", SpanType::Span),
            ] {
                syntax.add(
                    SimplePhraseModifier::new(delimiter, span, ContentMode::Nested)
                        .with_attributes(PHRASE_ATTRIBUTES),
                );
            }
            syntax
                .add(
                    SimplePhraseModifier::new("@", SpanType::Code, ContentMode::Literal)
                        .with_attributes(PHRASE_ATTRIBUTES),
                )
                .add(HyperlinkPhraseModifier)
                .end_group()
                .add(ImagePhraseModifier)
                .add(HtmlTagElement::any());
        })
        .tokens(|tokens| {
            tokens
                .add(EntityReferenceToken)
                .add(FootnoteReferenceToken)
                .add(AcronymToken)
                .add(EntityReplacementToken::pattern(r"\((?i:tm)\)", "#8482"))
                .add(EntityReplacementToken::pattern(r"\((?i:c)\)", "#169"))
                .add(EntityReplacementToken::pattern(r"\((?i:r)\)", "#174"))
                .add(EntityReplacementToken::new("--", "#8212"))
                .add(EntityReplacementToken::new("-", "#8211").when(spaced))
                .add(EntityReplacementToken::new("\"", "#8220").when(opens_quote))
                .add(EntityReplacementToken::new("\"", "#8221").when(closes_quote))
                .add(EntityReplacementToken::new("'", "#8216").when(opens_quote))
                .add(EntityReplacementToken::new("'", "#8217").when(closes_quote))
                .add(EntityReplacementToken::new("x", "#215").when(between_digits));
            if raw_hyperlinks {
                tokens.add(ImpliedHyperlinkToken::default());
            }
        })
        .validation_rule(BlockWhitespaceRule)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Attributes, BlockType, DocumentEvent, EventRecorder};
    use crate::parsing::MarkupParser;
    use crate::parsing::tests::rendered;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn dialect() -> Dialect {
        textile(MarkupOptions::default()).unwrap()
    }

    fn render(markup: &str) -> String {
        rendered(&dialect(), markup)
    }

    #[test]
    fn headings_get_ids_from_their_text() {
        insta::assert_snapshot!(render("h1. a header\n\nh2. another header"), @r#"
        beginDocument
        beginHeading(1) [id=aheader]
        characters("a header")
        endHeading
        beginHeading(2) [id=anotherheader]
        characters("another header")
        endHeading
        endDocument
        "#);
    }

    #[test]
    fn explicit_heading_id_wins() {
        insta::assert_snapshot!(render("h1(#ab). heading1\nsecondline\n\na para"), @r#"
        beginDocument
        beginHeading(1) [id=ab]
        characters("heading1")
        characters("\n")
        characters("secondline")
        endHeading
        beginBlock(paragraph)
        characters("a para")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn h0_is_not_a_heading() {
        assert!(render("h0. heading0").contains(r#"characters("h0. heading0")"#));
    }

    #[test]
    fn paragraph_lines_are_joined_with_line_breaks() {
        insta::assert_snapshot!(render("first para\nnew line\n\nsecond para\n\n\n\n"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("first para")
        lineBreak
        characters("new line")
        endBlock
        beginBlock(paragraph)
        characters("second para")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("p(#ab). first para", "beginBlock(paragraph) [id=ab]")]
    #[case("p(foo). first para", "beginBlock(paragraph) [class=foo]")]
    #[case(
        "p(foo#ab){color:black;}. first para",
        "beginBlock(paragraph) [id=ab, class=foo, style=color:black;]"
    )]
    #[case("p<. first para", "beginBlock(paragraph) [style=text-align: left;]")]
    fn paragraph_attributes(#[case] markup: &str, #[case] expected: &str) {
        let output = render(markup);
        assert!(output.contains(expected), "{output}");
        assert!(output.contains(r#"characters("first para")"#), "{output}");
    }

    #[rstest]
    #[case("_emphasis_", "emphasis")]
    #[case("*strong text*", "strong")]
    #[case("__italic__", "italic")]
    #[case("**bold**", "bold")]
    #[case("??citation??", "citation")]
    #[case("-deleted text-", "deleted")]
    #[case("+inserted text+", "inserted")]
    #[case("^superscript^", "superscript")]
    #[case("~subscript~", "subscript")]
    #[case("%spanned text%", "span")]
    #[case("@code text@", "code")]
    fn phrase_modifiers(#[case] markup: &str, #[case] span: &str) {
        for text in [
            format!("a paragraph with {markup}"),
            format!("a paragraph with ({markup}"),
            format!("a paragraph with {markup}. punctuation"),
        ] {
            let output = render(&text);
            assert!(output.contains(&format!("beginSpan({span})")), "{text}: {output}");
        }
        let glued = format!("a paragraph with{markup}");
        assert!(!render(&glued).contains("beginSpan"), "{glued}");
        let trailing = format!("a paragraph with {markup}baz.");
        assert!(!render(&trailing).contains("beginSpan"), "{trailing}");
    }

    #[test]
    fn phrase_attributes_follow_the_delimiter() {
        assert!(render("a paragraph with **(#1)bold content**")
            .contains("beginSpan(bold) [id=1]"));
    }

    #[test]
    fn nested_phrases_keep_their_offsets() {
        let dialect = dialect();
        let mut recorder = EventRecorder::new();
        MarkupParser::new(&dialect).parse("a _sample *bold -sdf-*_", &mut recorder);
        let spans: Vec<(usize, usize)> = recorder
            .recorded()
            .iter()
            .filter(|r| matches!(r.event, DocumentEvent::BeginSpan { .. }))
            .map(|r| (r.locator.line_character_offset, r.locator.line_segment_end_offset))
            .collect();
        assert_eq!(spans, vec![(2, 23), (10, 22), (16, 21)]);
    }

    #[test]
    fn hyphens_are_not_deleted_text_without_content() {
        let output = render("this is - not a phrase modifier- and -neither is this - so there");
        assert!(!output.contains("beginSpan(deleted)"), "{output}");
    }

    #[test]
    fn code_is_literal() {
        insta::assert_snapshot!(render("a @code *b* <b>bo</b>@ more"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("a ")
        beginSpan(code)
        characters("code *b* <b>bo</b>")
        endSpan
        characters(" more")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn escaped_phrases_are_plain_text() {
        assert!(render("==*none*==").contains(r#"characters("*none*")"#));
    }

    #[test]
    fn hyperlinks_wrap_nested_markup() {
        insta::assert_snapshot!(render("Here comes a \"_Click me_\":/stories/10146 to something"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("Here comes a ")
        beginSpan(link) [href=/stories/10146]
        beginSpan(emphasis)
        characters("Click me")
        endSpan
        endSpan
        characters(" to something")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case(",")]
    #[case(".")]
    #[case(":")]
    #[case(";")]
    fn hyperlink_stops_before_punctuation(#[case] tail: &str) {
        let output = render(&format!("a \"hyperlink\":http://www.google.com{tail} to"));
        assert!(output.contains("beginSpan(link) [href=http://www.google.com]"), "{output}");
        assert!(output.contains(&format!("characters(\"{tail} to\")")), "{output}");
    }

    #[test]
    fn hyperlink_keeps_a_closing_paren() {
        let output = render("a \"hyperlink\":http://www.google.com) to");
        assert!(output.contains("[href=http://www.google.com)]"), "{output}");
    }

    #[test]
    fn hyperlink_title_and_class() {
        let output = render("\"(test)hyperlink(a title)\":http://www.google.com");
        assert!(
            output.contains(
                "beginSpan(link) [class=test, title=a title, href=http://www.google.com]"
            ),
            "{output}"
        );
    }

    #[rstest]
    #[case("!imageUrl!", "image(imageUrl)")]
    #[case("!imageUrl(alt text)!", "image(imageUrl) [title=alt text]")]
    #[case("!(foo-bar)hyperlink!:http://www.google.com", "imageLink(http://www.google.com, hyperlink)")]
    fn images(#[case] markup: &str, #[case] expected: &str) {
        let output = render(&format!("Here comes an {markup} with more text"));
        assert!(output.contains(expected), "{output}");
    }

    #[test]
    fn image_alignment() {
        let events = MarkupParser::new(&dialect()).parse_to_events("an !<imageUrl! here");
        let image = events
            .iter()
            .find_map(|event| match event {
                DocumentEvent::Image { attributes, .. } => Some(attributes.clone()),
                _ => None,
            })
            .unwrap();
        let mut expected = crate::builder::Attributes::new();
        expected.image_mut().align = Some("left".to_string());
        assert_eq!(image, expected);
    }

    #[test]
    fn exclamation_marks_are_not_images() {
        let output = render("Here comes a non-image!!! more text !!! and more");
        assert!(!output.contains("image("), "{output}");
    }

    #[test]
    fn strong_and_emphasis_in_a_paragraph() {
        let span = |kind| DocumentEvent::BeginSpan {
            kind,
            attributes: Attributes::new(),
        };
        assert_eq!(
            MarkupParser::new(&dialect()).parse_to_events("*bold* and _italic_"),
            vec![
                DocumentEvent::BeginDocument,
                DocumentEvent::BeginBlock {
                    kind: BlockType::Paragraph,
                    attributes: Attributes::new(),
                },
                span(SpanType::Strong),
                DocumentEvent::Characters("bold".to_string()),
                DocumentEvent::EndSpan,
                DocumentEvent::Characters(" and ".to_string()),
                span(SpanType::Emphasis),
                DocumentEvent::Characters("italic".to_string()),
                DocumentEvent::EndSpan,
                DocumentEvent::EndBlock,
                DocumentEvent::EndDocument,
            ]
        );
    }

    #[test]
    fn apostrophes_and_closing_quotes() {
        insta::assert_snapshot!(render("it's \"quoted\""), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("it")
        entityReference(#8217)
        characters("s ")
        entityReference(#8220)
        characters("quoted")
        entityReference(#8221)
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("copyright(c)", "#169")]
    #[case("Copyright (C)", "#169")]
    #[case("trade(tm)", "#8482")]
    #[case("Trademark (TM)", "#8482")]
    #[case("registered(r)", "#174")]
    #[case("one -- two", "#8212")]
    #[case("one-- two", "#8212")]
    #[case("one - two", "#8211")]
    #[case("2 x 4", "#215")]
    #[case("it's", "#8217")]
    #[case("some 'thing is' quoted", "#8216")]
    #[case("some \"thing is\" quoted", "#8220")]
    #[case("some \"thing is\" quoted", "#8221")]
    fn replacement_tokens(#[case] markup: &str, #[case] entity: &str) {
        let output = render(markup);
        assert!(output.contains(&format!("entityReference({entity})")), "{output}");
    }

    #[rstest]
    #[case("a x 4")]
    #[case("Foo bar-baz one two three four-five.")]
    #[case("Some A&BC Thing")]
    fn text_without_tokens(#[case] markup: &str) {
        let output = render(markup);
        assert!(!output.contains("entityReference"), "{output}");
    }

    #[test]
    fn acronyms_need_three_capitals() {
        assert!(render("Some text ABC(A Better Comb)").contains("acronym(ABC, \"A Better Comb\")"));
        assert!(!render("Some text AB(A Better Comb)").contains("acronym"));
    }

    #[test]
    fn footnote_references_link_to_defined_footnotes() {
        insta::assert_snapshot!(render("See foo[1].\n\nfn1. Foo."), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("See foo")
        beginSpan(superscript) [class=footnote]
        link(#___fn1, "1") [href=#___fn1]
        endSpan
        characters(".")
        endBlock
        beginBlock(paragraph) [id=___fn1, class=footnote]
        beginSpan(superscript)
        characters("1")
        endSpan
        characters(" Foo.")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn undefined_footnote_reference_is_text() {
        let output = render("See foo[1].\n\nNo such footnote!");
        assert!(output.contains(r#"characters("[1]")"#), "{output}");
        assert!(!output.contains("superscript"), "{output}");
    }

    #[test]
    fn footnote_reference_location() {
        let dialect = dialect();
        let mut recorder = EventRecorder::new();
        MarkupParser::new(&dialect).parse("a footnote reference[1] more text\n\nfn1. x", &mut recorder);
        let span = recorder
            .recorded()
            .iter()
            .find(|r| matches!(r.event, DocumentEvent::BeginSpan { .. }))
            .unwrap();
        assert_eq!(span.locator.line_character_offset, 20);
        assert_eq!(span.locator.line_segment_end_offset, 23);
    }

    #[test]
    fn code_block_keeps_lines_and_tabs() {
        insta::assert_snapshot!(render("bc. one\n\ttwo\n\nthree"), @r#"
        beginDocument
        beginBlock(code)
        characters("one")
        characters("\n")
        characters("\ttwo")
        endBlock
        beginBlock(paragraph)
        characters("three")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn extended_code_spans_blank_lines() {
        insta::assert_snapshot!(render("bc.. \none\ntwo\n\nthree\n\np. some para"), @r#"
        beginDocument
        beginBlock(code)
        characters("one")
        characters("\n")
        characters("two")
        characters("\n")
        characters("\n")
        characters("three")
        characters("\n")
        endBlock
        beginBlock(paragraph)
        characters("some para")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn preformatted_does_not_mark_up_content() {
        let output = render("pre. \n|_. a|_. table|\n|a|row|");
        assert!(output.contains("beginBlock(preformatted)"), "{output}");
        assert!(output.contains(r#"characters("|_. a|_. table|")"#), "{output}");
        assert!(!output.contains("table-row"), "{output}");
    }

    #[test]
    fn block_quote_with_citation() {
        insta::assert_snapshot!(render("bq.:http://www.example.com some text"), @r#"
        beginDocument
        beginBlock(quote)
        beginBlock(paragraph)
        characters("some text")
        endBlock
        endBlock
        endDocument
        "#);
        let events = MarkupParser::new(&dialect()).parse_to_events("bq.:http://x.org y");
        assert!(events.iter().any(|event| matches!(
            event,
            DocumentEvent::BeginBlock { attributes, .. }
                if matches!(&attributes.detail, crate::builder::AttributeDetail::Quote(q)
                    if q.citation.as_deref() == Some("http://x.org"))
        )));
    }

    #[test]
    fn extended_quote_holds_several_paragraphs() {
        insta::assert_snapshot!(render("bq.. one\ntwo\n\nthree\np. some para"), @r#"
        beginDocument
        beginBlock(quote)
        beginBlock(paragraph)
        characters("one")
        lineBreak
        characters("two")
        endBlock
        beginBlock(paragraph)
        characters("three")
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("some para")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn comments_and_escapes() {
        insta::assert_snapshot!(render("###. hidden\n\nnotextile. <b>*raw*</b>"), @r#"
        beginDocument
        charactersUnescaped("<b>*raw*</b>")
        endDocument
        "#);
    }

    #[test]
    fn lists_nest_by_marker() {
        insta::assert_snapshot!(render("# a list\n#* nested\n# level1\n\npara"), @r#"
        beginDocument
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("a list")
        beginBlock(bulleted-list)
        beginBlock(list-item)
        characters("nested")
        endBlock
        endBlock
        endBlock
        beginBlock(list-item)
        characters("level1")
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("para")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn nested_list_of_another_type_stays_inside_its_item() {
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

    #[rstest]
    #[case("# a\n## b\n# c", 1)]
    #[case("* a\n## b\n* c", 1)]
    #[case("* a\n*# b\n#* c\n* d", 1)]
    #[case("# a\n#* b\n#* c\n# d", 1)]
    #[case("* a\n** b\n*** c\n* d", 1)]
    #[case("# a\n* b", 2)]
    fn sibling_items_share_their_list(#[case] markup: &str, #[case] top_level_lists: usize) {
        let events = MarkupParser::new(&dialect()).parse_to_events(markup);
        let opened = events
            .iter()
            .filter(|event| matches!(event, DocumentEvent::BeginBlock { .. }))
            .count();
        let closed = events
            .iter()
            .filter(|event| matches!(event, DocumentEvent::EndBlock))
            .count();
        assert_eq!(opened, closed);

        let mut depth = 0i32;
        let mut top_level = 0;
        for event in &events {
            if depth == 1 && matches!(event, DocumentEvent::BeginBlock { .. }) {
                top_level += 1;
            }
            depth += event.depth_change();
        }
        assert_eq!(top_level, top_level_lists, "{events:#?}");
    }

    #[test]
    fn list_type_change_starts_a_new_list() {
        insta::assert_snapshot!(render("# first\n* second"), @r#"
        beginDocument
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("first")
        endBlock
        endBlock
        beginBlock(bulleted-list)
        beginBlock(list-item)
        characters("second")
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn list_interrupts_a_paragraph() {
        insta::assert_snapshot!(render("first para\n# numeric list\nfirst para second line"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("first para")
        endBlock
        beginBlock(numeric-list)
        beginBlock(list-item)
        characters("numeric list")
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("first para second line")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn list_attributes() {
        assert!(render("#{color: blue} a list with style")
            .contains("beginBlock(numeric-list) [style=color: blue]"));
    }

    #[test]
    fn dashes_do_not_make_a_list() {
        insta::assert_snapshot!(render("- first\n- second"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("- first")
        lineBreak
        characters("- second")
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn table_cells() {
        insta::assert_snapshot!(render("table{border: 1px solid black}.\n|_. a|\\2b|{color: red;}c|"), @r#"
        beginDocument
        beginBlock(table) [style=border: 1px solid black]
        beginBlock(table-row)
        beginBlock(table-cell-header)
        characters("a")
        endBlock
        beginBlock(table-cell-normal)
        characters("b")
        endBlock
        beginBlock(table-cell-normal) [style=color: red;]
        characters("c")
        endBlock
        endBlock
        endBlock
        endDocument
        "#);
    }

    #[test]
    fn table_interrupts_a_paragraph_and_rows_carry_style() {
        insta::assert_snapshot!(render("foo bar\n|a|\n{background:#ddd}. |*b*|\n\na para"), @r#"
        beginDocument
        beginBlock(paragraph)
        characters("foo bar")
        endBlock
        beginBlock(table)
        beginBlock(table-row)
        beginBlock(table-cell-normal)
        characters("a")
        endBlock
        endBlock
        beginBlock(table-row) [style=background:#ddd]
        beginBlock(table-cell-normal)
        beginSpan(strong)
        characters("b")
        endSpan
        endBlock
        endBlock
        endBlock
        beginBlock(paragraph)
        characters("a para")
        endBlock
        endDocument
        "#);
    }

    #[rstest]
    #[case("|^a|", "style=vertical-align: top;")]
    #[case("|<a|", "style=text-align: left;")]
    #[case("|>a|", "style=text-align: right;")]
    #[case("|<>a|", "style=text-align: center;")]
    #[case("|(foo)a|", "class=foo")]
    #[case("|(#bar)a|", "id=bar")]
    fn cell_attributes(#[case] markup: &str, #[case] expected: &str) {
        let output = render(markup);
        assert!(output.contains(expected), "{output}");
        assert!(output.contains(r#"characters("a")"#), "{output}");
    }

    #[test]
    fn cell_spans() {
        let events = MarkupParser::new(&dialect()).parse_to_events("|\\4/2a|");
        let cell = events
            .iter()
            .find_map(|event| match event {
                DocumentEvent::BeginBlock { kind: crate::builder::BlockType::TableCellNormal, attributes } => {
                    Some(attributes.clone())
                }
                _ => None,
            })
            .unwrap();
        let mut expected = crate::builder::Attributes::new();
        expected.table_cell_mut().colspan = Some(4);
        expected.table_cell_mut().rowspan = Some(2);
        assert_eq!(cell, expected);
    }

    #[test]
    fn table_of_contents_links_headings() {
        let output = render("h1. Top\n\n{toc:maxLevel=1}\n\nh2. Sub\n\nh1. Other");
        insta::assert_snapshot!(output, @r#"
        beginDocument
        beginHeading(1) [id=top]
        characters("Top")
        endHeading
        beginBlock(numeric-list) [class=toc]
        beginBlock(list-item)
        link(#top, "Top")
        endBlock
        beginBlock(list-item)
        link(#other, "Other")
        endBlock
        endBlock
        beginHeading(2) [id=sub]
        characters("Sub")
        endHeading
        beginHeading(1) [id=other]
        characters("Other")
        endHeading
        endDocument
        "#);
    }

    #[test]
    fn html_tags_pass_through_unless_escaped() {
        let output = render("some <span class=\"s\">mark</span> up");
        assert!(output.contains(r#"charactersUnescaped("<span class=\"s\">")"#), "{output}");
        let escaped = textile(MarkupOptions {
            escape_html: true,
            ..MarkupOptions::default()
        })
        .unwrap();
        let output = rendered(&escaped, "some <b>x</b> up");
        assert!(!output.contains("charactersUnescaped"), "{output}");
    }

    #[test]
    fn raw_hyperlinks_only_when_enabled() {
        assert!(!render("see http://example.com now").contains("link("));
        let dialect = textile(MarkupOptions {
            detect_raw_hyperlinks: true,
            ..MarkupOptions::default()
        })
        .unwrap();
        assert!(rendered(&dialect, "see http://example.com now").contains("link(http://example.com"));
    }
}
