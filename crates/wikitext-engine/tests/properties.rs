//! Property tests over every built-in dialect: any input parses to a
//! balanced event stream whose text events are located on the source.

use proptest::prelude::*;
use wikitext_engine::builder::RecordedEvent;
use wikitext_engine::{
    Dialect, DialectName, DocumentEvent, EventRecorder, MarkupOptions, MarkupParser,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dialects() -> Vec<Dialect> {
    DialectName::ALL
        .iter()
        .map(|name| name.create(MarkupOptions::default()).unwrap())
        .collect()
}

fn record(dialect: &Dialect, markup: &str) -> Vec<RecordedEvent> {
    let mut recorder = EventRecorder::new();
    MarkupParser::new(dialect).parse(markup, &mut recorder);
    recorder.recorded().to_vec()
}

fn assert_balanced(name: &str, events: &[RecordedEvent]) {
    let mut depth = 0i32;
    for recorded in events {
        depth += recorded.event.depth_change();
        assert!(depth >= 0, "{name}: {} closes nothing", recorded.event);
    }
    assert_eq!(depth, 0, "{name}: unbalanced events");
    assert_eq!(
        events.first().map(|r| &r.event),
        Some(&DocumentEvent::BeginDocument),
        "{name}"
    );
    assert_eq!(
        events.last().map(|r| &r.event),
        Some(&DocumentEvent::EndDocument),
        "{name}"
    );
}

/// `markup` is the text the blocks saw, after the dialect's preprocessor.
fn assert_located(name: &str, markup: &str, events: &[RecordedEvent]) {
    for recorded in events {
        let DocumentEvent::Characters(text) = &recorded.event else {
            continue;
        };
        let locator = recorded.locator;
        assert_eq!(
            text.len(),
            locator.segment_len(),
            "{name}: characters({text:?}) at {}..{}",
            locator.document_offset(),
            locator.document_segment_end_offset()
        );
        assert!(
            locator.document_segment_end_offset() <= markup.len() + 1,
            "{name}: characters({text:?}) located past the end"
        );
    }
}

/// Text dense in the characters the dialects treat as markup.
fn markup() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,6}",
            2 => Just(" ".to_string()),
            2 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
            3 => prop::sample::select(vec![
                "*", "**", "_", "__", "'''", "''", "=", "==", "#", "-", "----", "|", "||",
                "!", "[", "]", "[[", "]]", "{", "}", "{{{", "}}}", "<", ">", "<!--", "-->",
                "`", "```", "~~", "^", ",,", "@", "%", "+", "\\", "(", ")", ":", ";",
                "h1. ", "bq. ", "bc. ", "{code}", "{quote}", "{noformat}", "{|", "|}",
                "|-", "<nowiki>", "</nowiki>", "<pre>", "</pre>", "....", "////", "> ",
                "1. ", "    ", "\t", "__TOC__", "{toc}", "toc::[]", "https://example.com",
                "&amp;", "é", "\r", "{{mdash}}", "{{CURRENTYEAR}}",
            ])
            .prop_map(str::to_string),
        ],
        0..60,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn every_dialect_balances_its_events(markup in markup()) {
        init_logging();
        for (name, dialect) in DialectName::ALL.iter().zip(dialects()) {
            let events = record(&dialect, &markup);
            assert_balanced(name.as_str(), &events);
            assert_located(name.as_str(), &dialect.preprocess(&markup), &events);
        }
    }

    #[test]
    fn parsing_is_repeatable(markup in markup()) {
        for dialect in dialects() {
            let parser = MarkupParser::new(&dialect);
            prop_assert_eq!(parser.parse_to_events(&markup), parser.parse_to_events(&markup));
        }
    }

    #[test]
    fn regions_parse_as_balanced_fragments(markup in markup(), start in 0usize..200, len in 0usize..200) {
        for dialect in dialects() {
            let mut recorder = EventRecorder::new();
            MarkupParser::new(&dialect).parse_region(&markup, start..start + len, &mut recorder);
            let depth: i32 = recorder.recorded().iter().map(|r| r.event.depth_change()).sum();
            prop_assert_eq!(depth, 0);
        }
    }
}

#[test]
fn every_dialect_handles_the_mixed_sample() {
    init_logging();
    let sample = include_str!("../benches/sample.txt");
    for (name, dialect) in DialectName::ALL.iter().zip(dialects()) {
        let events = record(&dialect, sample);
        assert_balanced(name.as_str(), &events);
        assert_located(name.as_str(), &dialect.preprocess(sample), &events);
        assert!(events.len() > 2, "{name}: no content");
    }
}
