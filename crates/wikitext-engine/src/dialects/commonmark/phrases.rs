use crate::builder::{Attributes, SpanType};
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement};

const DESTINATION: &str = r#"\(\s*<?([^\s()<>]*)>?(?:\s+(?:"([^"]*)"|'([^']*)'))?\s*\)"#;

fn title<'h>(found: &ElementMatch<'h>) -> Option<&'h str> {
    found.group(3).or_else(|| found.group(4))
}

/// `<https://example.com>` or `<user@example.com>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutolinkElement;

impl PatternElement for AutolinkElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        r"<(?:([a-zA-Z][a-zA-Z0-9+.-]{1,31}:[^\s<>]*)|([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*))>".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        if let Some(uri) = found.group(1) {
            cx.link(&Attributes::link(Some(uri)), Some(uri), uri);
        } else if let Some(email) = found.group(2) {
            let href = format!("mailto:{email}");
            cx.link(&Attributes::link(Some(&href)), Some(&href), email);
        }
    }

    fn name(&self) -> String {
        "autolink".to_string()
    }
}

/// `![alt](src "title")`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageElement;

impl PatternElement for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!(r"!\[([^\]]*)\]{DESTINATION}")
    }

    fn group_count(&self) -> usize {
        4
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let url = found.group(2).unwrap_or("");
        let mut attributes = Attributes::new();
        attributes.image_mut().alt = found
            .group(1)
            .filter(|alt| !alt.is_empty())
            .map(str::to_string);
        attributes.title = title(found).map(str::to_string);
        cx.image(&attributes, url);
    }

    fn name(&self) -> String {
        "image".to_string()
    }
}

/// `[text](href "title")`. The text is parsed again for markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkElement;

impl PatternElement for LinkElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!(r"\[([^\]]*)\]{DESTINATION}")
    }

    fn group_count(&self) -> usize {
        4
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let mut attributes = Attributes::link(found.group(2));
        attributes.title = title(found).map(str::to_string);
        cx.begin_span(SpanType::Link, &attributes);
        cx.emit_nested(found, 1);
        cx.set_segment(found.start(), found.end());
        cx.end_span();
    }

    fn name(&self) -> String {
        "link".to_string()
    }
}
