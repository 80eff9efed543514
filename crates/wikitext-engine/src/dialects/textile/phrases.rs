use super::attributes::PHRASE_ATTRIBUTES;
use crate::builder::{Attributes, SpanType};
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement, is_word_char};

// ends before trailing punctuation, but `)` may close the URL
const LINK_URL: &str = r#"[^\s"]*[^\s".,;:!?']"#;

/// `"text(title)":url`, with attributes after the opening quote. The text
/// is parsed again for phrase modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperlinkPhraseModifier;

impl PatternElement for HyperlinkPhraseModifier {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!(
            r#""{}([^"]+?)(?:\(([^)]*)\))?":({LINK_URL})"#,
            PHRASE_ATTRIBUTES.pattern
        )
    }

    fn group_count(&self) -> usize {
        PHRASE_ATTRIBUTES.group_count + 3
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let mut attributes = (PHRASE_ATTRIBUTES.parse)(found, 1);
        attributes.link_mut().href = found.group(7).map(str::to_string);
        if let Some(title) = found.group(6) {
            attributes.title = Some(title.to_string());
        }
        cx.begin_span(SpanType::Link, &attributes);
        cx.emit_nested(found, 5);
        cx.set_segment(found.start(), found.end());
        cx.end_span();
    }

    fn name(&self) -> String {
        "hyperlink".to_string()
    }
}

/// `!(class)<url(alt)!:href`: an image, optionally aligned and linked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePhraseModifier;

impl PatternElement for ImagePhraseModifier {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!(
            r"!{}(<|>|=)?([^\s!()]+)(?:\(([^)]*)\))?!(?::({LINK_URL}))?",
            PHRASE_ATTRIBUTES.pattern
        )
    }

    fn group_count(&self) -> usize {
        PHRASE_ATTRIBUTES.group_count + 4
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(url) = found.group(6) else {
            return;
        };
        let mut attributes = (PHRASE_ATTRIBUTES.parse)(found, 1);
        let align = found.group(5).map(|marker| match marker {
            "<" => "left",
            ">" => "right",
            _ => "center",
        });
        let alt = found.group(7);
        let image = attributes.image_mut();
        image.align = align.map(str::to_string);
        image.alt = alt.map(str::to_string);
        if let Some(alt) = alt {
            attributes.title = Some(alt.to_string());
        }
        match found.group(8) {
            Some(href) => cx.image_link(&Attributes::link(Some(href)), &attributes, href, url),
            None => cx.image(&attributes, url),
        }
    }

    fn name(&self) -> String {
        "image".to_string()
    }
}

/// `[1]`: a reference to footnote 1, when the document defines it; plain
/// text otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootnoteReferenceToken;

impl PatternElement for FootnoteReferenceToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\[(\d+)\]".to_string()
    }

    fn group_count(&self) -> usize {
        1
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(number) = found.group(1) else {
            return;
        };
        let Some(id) = cx.state().footnote_id(number).map(str::to_string) else {
            cx.characters(found.range());
            return;
        };
        let href = format!("#{id}");
        cx.begin_span(SpanType::Superscript, &Attributes::new().with_class("footnote"));
        cx.link(&Attributes::link(Some(&href)), Some(&href), number);
        cx.end_span();
    }

    fn name(&self) -> String {
        "footnote reference".to_string()
    }
}

/// `ABC(A Better Comb)`: three or more capitals followed by their
/// definition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcronymToken;

impl PatternElement for AcronymToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"([A-Z]{3,})\(([^)]+)\)".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn accepts(&self, found: &ElementMatch<'_>) -> bool {
        found.char_before().is_none_or(|c| !is_word_char(c))
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        if let (Some(term), Some(definition)) = (found.group(1), found.group(2)) {
            cx.state_mut().add_glossary_term(term, definition);
            cx.acronym(term, definition);
        }
    }

    fn name(&self) -> String {
        "acronym".to_string()
    }
}

/// An opening quote: at the start of the text or after whitespace or an
/// opening bracket, and followed by something other than whitespace.
pub fn opens_quote(found: &ElementMatch<'_>) -> bool {
    found
        .char_before()
        .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '[' | '{'))
        && found.char_after().is_some_and(|c| !c.is_whitespace())
}

/// A closing quote or apostrophe: right after a non-space character.
pub fn closes_quote(found: &ElementMatch<'_>) -> bool {
    found.char_before().is_some_and(|c| !c.is_whitespace())
}

/// A lone hyphen with whitespace on both sides.
pub fn spaced(found: &ElementMatch<'_>) -> bool {
    found.char_before().is_some_and(char::is_whitespace)
        && found.char_after().is_some_and(char::is_whitespace)
}
