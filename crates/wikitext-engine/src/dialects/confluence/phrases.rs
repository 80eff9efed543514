use crate::builder::{Attributes, SpanType};
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement};

/// `[url]`, `[text|url]` or `[text|url|tip]`; `#name` links to an anchor
/// in the same page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkElement;

impl PatternElement for LinkElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        r"\[([^\]|]+)(?:\|([^\]|]*))?(?:\|([^\]]*))?\]".to_string()
    }

    fn group_count(&self) -> usize {
        3
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let first = found.group(1).unwrap_or("").trim();
        let (text, href) = match found.group(2).map(str::trim) {
            Some(href) if !href.is_empty() => (first, href),
            _ => (first, first),
        };
        let mut attributes = Attributes::link(Some(href));
        if let Some(tip) = found.group(3).map(str::trim).filter(|t| !t.is_empty()) {
            attributes.title = Some(tip.to_string());
        }
        cx.link(&attributes, Some(href), text);
    }

    fn name(&self) -> String {
        "link".to_string()
    }
}

/// `!image.png!` or `!image.png|align=right, alt=A picture!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageElement;

impl PatternElement for ImageElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        r"!([^\s!|]+)(?:\|([^!]*))?!".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(url) = found.group(1) else {
            return;
        };
        let mut attributes = Attributes::new();
        attributes.image_mut();
        for option in found.group(2).unwrap_or("").split(',') {
            let Some((key, value)) = option.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "align" => attributes.image_mut().align = Some(value.to_string()),
                "alt" => attributes.image_mut().alt = Some(value.to_string()),
                "title" => attributes.title = Some(value.to_string()),
                "width" => attributes.image_mut().width = value.parse().ok(),
                "height" => attributes.image_mut().height = value.parse().ok(),
                _ => {}
            }
        }
        cx.image(&attributes, url);
    }

    fn name(&self) -> String {
        "image".to_string()
    }
}

/// `{color:red}text{color}`: coloured text, parsed again for markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPhraseModifier;

impl PatternElement for ColorPhraseModifier {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        r"\{color:([^}]+)\}(.*?)\{color\}".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let color = found.group(1).unwrap_or("").trim();
        let attributes = Attributes::new().with_style(format!("color: {color};"));
        cx.begin_span(SpanType::Span, &attributes);
        cx.emit_nested(found, 2);
        cx.set_segment(found.start(), found.end());
        cx.end_span();
    }

    fn name(&self) -> String {
        "color".to_string()
    }
}

/// `{anchor:name}`: a link target without a destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorToken;

impl PatternElement for AnchorToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\{anchor:([^}]+)\}".to_string()
    }

    fn group_count(&self) -> usize {
        1
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        if let Some(name) = found.group(1) {
            cx.link(&Attributes::new().with_id(name.trim()), None, "");
        }
    }

    fn name(&self) -> String {
        "anchor".to_string()
    }
}
