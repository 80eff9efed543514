use crate::builder::Attributes;
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement};

fn anchor(cx: &mut ParseContext<'_>, id: Option<&str>) {
    if let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) {
        cx.link(&Attributes::new().with_id(id), None, "");
    }
}

/// `[[id]]` or `[[id,label]]`: an anchor target.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorToken;

impl PatternElement for AnchorToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"\[\[([^\],]+)(,[^\]]+)?\]\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        anchor(cx, found.group(1));
    }

    fn name(&self) -> String {
        "anchor".to_string()
    }
}

/// `anchor:id[]`, the macro form of [`AnchorToken`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorMacroToken;

impl PatternElement for AnchorMacroToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"anchor:([^\s\[]+)\[([^\]]*)\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        anchor(cx, found.group(1));
    }

    fn name(&self) -> String {
        "anchor macro".to_string()
    }
}

/// `<<id>>` or `<<id,text>>`. The target is used as the href unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossReferenceToken;

impl PatternElement for CrossReferenceToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"<<([^>,]+)(?:,([^>]+))?>>".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(target) = found.group(1).map(str::trim) else {
            return;
        };
        let text = found
            .group(2)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(target);
        cx.link(&Attributes::link(Some(target)), Some(target), text);
    }

    fn name(&self) -> String {
        "cross reference".to_string()
    }
}

/// `link:target[text]` and `https://host/path[text]`. Empty text shows the
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkMacroToken;

impl PatternElement for LinkMacroToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"(?:link:([^\s\[]+)|((?:https?|ftp|irc|mailto)://[^\s\[]+))\[([^\]]*)\]".to_string()
    }

    fn group_count(&self) -> usize {
        3
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(target) = found.group(1).or_else(|| found.group(2)) else {
            return;
        };
        let text = found
            .group(3)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(target);
        cx.link(&Attributes::link(Some(target)), Some(target), text);
    }

    fn name(&self) -> String {
        "link macro".to_string()
    }
}

/// `image:url[alt]`, also in its block form `image::url[alt]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMacroToken;

impl PatternElement for ImageMacroToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"image::?([^\s\[]+)\[([^\]]*)\]".to_string()
    }

    fn group_count(&self) -> usize {
        2
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(url) = found.group(1) else {
            return;
        };
        let mut attributes = Attributes::new();
        let mut options = found.group(2).unwrap_or("").split(',').map(str::trim);
        if let Some(alt) = options.next().filter(|alt| !alt.is_empty()) {
            attributes.image_mut().alt = Some(alt.to_string());
        }
        let image = attributes.image_mut();
        image.width = options.next().and_then(|w| w.parse().ok());
        image.height = options.next().and_then(|h| h.parse().ok());
        cx.image(&attributes, url);
    }

    fn name(&self) -> String {
        "image".to_string()
    }
}
