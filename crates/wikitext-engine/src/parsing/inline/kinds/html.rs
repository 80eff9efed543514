use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement};

const ATTRIBUTE: &str =
    r#"\s+[a-zA-Z_:][-a-zA-Z0-9_:.]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#;

/// A start, end or empty-element HTML tag written inline.
///
/// The tag is passed through as raw output, or emitted as text when the
/// dialect's options ask for HTML to be escaped.
#[derive(Debug, Clone)]
pub struct HtmlTagElement {
    names: String,
}

impl HtmlTagElement {
    /// Any well-formed tag name.
    pub fn any() -> Self {
        Self {
            names: "[a-zA-Z][a-zA-Z0-9]*".to_string(),
        }
    }

    /// Only the listed tag names, case-insensitively.
    pub fn allowed(names: &[&str]) -> Self {
        Self {
            names: format!("(?i:{})", names.join("|")),
        }
    }
}

impl PatternElement for HtmlTagElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!(
            r"</(?:{names})\s*>|<(?:{names})(?:{ATTRIBUTE})*\s*/?>",
            names = self.names
        )
    }

    fn group_count(&self) -> usize {
        0
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        emit_raw(cx, found);
    }

    fn name(&self) -> String {
        "html tag".to_string()
    }
}

/// `<!-- ... -->` on a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCommentElement;

impl PatternElement for HtmlCommentElement {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        "<!--.*?-->".to_string()
    }

    fn group_count(&self) -> usize {
        0
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        emit_raw(cx, found);
    }
}

fn emit_raw(cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
    if cx.options().escape_html {
        cx.characters(found.range());
    } else if let Some(text) = found.group(0) {
        cx.characters_unescaped(text);
    }
}
