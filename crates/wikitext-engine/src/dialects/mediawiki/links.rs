use std::sync::LazyLock;

use regex::Regex;

use crate::builder::Attributes;
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement, is_word_char};

static IMAGE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)?(?:x(\d+))?px$").expect("Invalid MediaWiki image size regex")
});

/// `[[Image:name.png|thumb|left|200px|Caption]]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageToken;

impl PatternElement for ImageToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\[\[(?:Image|File):([^\]|]+)(?:\|([^\]]*))?\]\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(name) = found.group(1).map(str::trim) else {
            return;
        };
        let mut attributes = Attributes::new();
        attributes.image_mut();
        for option in found.group(2).unwrap_or("").split('|').map(str::trim) {
            match option {
                "" | "border" | "frameless" => {}
                "thumb" | "thumbnail" | "frame" => attributes.append_class("thumb"),
                "left" | "right" | "center" | "none" => {
                    attributes.image_mut().align = Some(option.to_string());
                }
                _ => match IMAGE_SIZE.captures(option) {
                    Some(size) => {
                        let image = attributes.image_mut();
                        image.width = size.get(1).and_then(|w| w.as_str().parse().ok());
                        image.height = size.get(2).and_then(|h| h.as_str().parse().ok());
                    }
                    None => {
                        attributes.image_mut().alt = Some(option.to_string());
                        attributes.title = Some(option.to_string());
                    }
                },
            }
        }
        cx.image(&attributes, &name.replace(' ', "_"));
    }

    fn name(&self) -> String {
        "image".to_string()
    }
}

/// `[[Page]]`, `[[Page|text]]`, `[[Page#Section]]` and `[[#Section]]`.
///
/// Page names go through the dialect's internal link pattern with spaces
/// written as `_`. A leading `:` (as in `[[:Category:Help]]`) is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalLinkToken;

impl InternalLinkToken {
    fn href(cx: &ParseContext<'_>, target: &str) -> String {
        let (page, anchor) = match target.split_once('#') {
            Some((page, anchor)) => (page.trim(), Some(anchor.trim().replace(' ', "_"))),
            None => (target, None),
        };
        let mut href = if page.is_empty() {
            String::new()
        } else {
            cx.options().internal_link(&page.replace(' ', "_"))
        };
        if let Some(anchor) = anchor {
            href.push('#');
            href.push_str(&anchor);
        }
        href
    }
}

impl PatternElement for InternalLinkToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\[\[([^\]|]+)(?:\|([^\]]*))?\]\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(target) = found.group(1).map(str::trim) else {
            return;
        };
        let target = target.strip_prefix(':').unwrap_or(target);
        let href = Self::href(cx, target);
        let text = found
            .group(2)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(target);
        cx.link(&Attributes::link(Some(&href)), Some(&href), text);
    }

    fn name(&self) -> String {
        "internal link".to_string()
    }
}

/// `[http://example.com text]`; without text the URL is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalLinkToken;

impl PatternElement for ExternalLinkToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\[((?:https?|ftp|mailto|news|file):[^\s\]]+)(?:\s+([^\]]*))?\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(url) = found.group(1) else {
            return;
        };
        let text = found
            .group(2)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(url);
        cx.link(&Attributes::link(Some(url)), Some(url), text);
    }

    fn name(&self) -> String {
        "external link".to_string()
    }
}

/// `----` inside running text counts as a rule only at the ends of the
/// text or with a space and a word character on that side.
pub fn standalone_rule(found: &ElementMatch<'_>) -> bool {
    fn spaced_word(mut chars: impl Iterator<Item = char>) -> bool {
        match chars.next() {
            None => true,
            Some(c) if c.is_whitespace() => chars.next().is_some_and(is_word_char),
            Some(_) => false,
        }
    }
    spaced_word(found.text_before().chars().rev()) && spaced_word(found.text_after().chars())
}
