use regex::escape;

use crate::builder::Attributes;
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement, is_word_char};

/// Extra check on the text around a token match.
pub type TokenContext = fn(&ElementMatch<'_>) -> bool;

/// Raw URLs: scheme, then anything up to whitespace, not ending in
/// punctuation.
pub const URL_PATTERN: &str = r#"(?:https?|ftp)://[^\s<>"]*[^\s<>"\.,;:!?)\]'*]"#;

/// Replaces the whole match with one entity reference.
#[derive(Debug, Clone)]
pub struct EntityReplacementToken {
    pattern: String,
    entity: &'static str,
    context: Option<TokenContext>,
}

impl EntityReplacementToken {
    /// Replaces `literal` wherever it occurs.
    pub fn new(literal: &str, entity: &'static str) -> Self {
        Self::pattern(&escape(literal), entity)
    }

    /// Replaces matches of a pattern without capturing groups.
    pub fn pattern(pattern: &str, entity: &'static str) -> Self {
        Self {
            pattern: pattern.to_string(),
            entity,
            context: None,
        }
    }

    /// Only replaces matches whose surroundings satisfy `context`.
    #[must_use]
    pub fn when(mut self, context: TokenContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl PatternElement for EntityReplacementToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn group_count(&self) -> usize {
        0
    }

    fn accepts(&self, found: &ElementMatch<'_>) -> bool {
        self.context.is_none_or(|context| context(found))
    }

    fn emit(&self, cx: &mut ParseContext<'_>, _found: &ElementMatch<'_>) {
        cx.entity_reference(self.entity);
    }

    fn name(&self) -> String {
        format!("entity {}", self.entity)
    }
}

/// `&name;`, `&#123;` and `&#x1F;` written out in the markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityReferenceToken;

impl PatternElement for EntityReferenceToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        r"&(#x?[0-9a-fA-F]{1,8}|[a-zA-Z][a-zA-Z0-9]{1,31});".to_string()
    }

    fn group_count(&self) -> usize {
        1
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        if let Some(entity) = found.group(1) {
            cx.entity_reference(entity);
        }
    }
}

/// A forced line break.
#[derive(Debug, Clone)]
pub struct LineBreakToken {
    pattern: String,
    context: Option<TokenContext>,
}

impl LineBreakToken {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            context: None,
        }
    }

    #[must_use]
    pub fn when(mut self, context: TokenContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl PatternElement for LineBreakToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn group_count(&self) -> usize {
        0
    }

    fn accepts(&self, found: &ElementMatch<'_>) -> bool {
        self.context.is_none_or(|context| context(found))
    }

    fn emit(&self, cx: &mut ParseContext<'_>, _found: &ElementMatch<'_>) {
        cx.line_break();
    }
}

/// A horizontal rule inside running text.
#[derive(Debug, Clone)]
pub struct HorizontalRuleToken {
    pattern: String,
    context: Option<TokenContext>,
}

impl HorizontalRuleToken {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            context: None,
        }
    }

    #[must_use]
    pub fn when(mut self, context: TokenContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl PatternElement for HorizontalRuleToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn group_count(&self) -> usize {
        0
    }

    fn accepts(&self, found: &ElementMatch<'_>) -> bool {
        self.context.is_none_or(|context| context(found))
    }

    fn emit(&self, cx: &mut ParseContext<'_>, _found: &ElementMatch<'_>) {
        cx.horizontal_rule();
    }
}

/// A bare URL in running text becomes a link to itself.
#[derive(Debug, Clone)]
pub struct ImpliedHyperlinkToken {
    pattern: String,
    context: Option<TokenContext>,
}

impl Default for ImpliedHyperlinkToken {
    fn default() -> Self {
        Self::new(URL_PATTERN)
    }
}

impl ImpliedHyperlinkToken {
    /// `pattern` has no capturing groups; the whole match is the URL.
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            context: None,
        }
    }

    #[must_use]
    pub fn when(mut self, context: TokenContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl PatternElement for ImpliedHyperlinkToken {
    fn kind(&self) -> ElementKind {
        ElementKind::Token
    }

    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn group_count(&self) -> usize {
        0
    }

    fn accepts(&self, found: &ElementMatch<'_>) -> bool {
        self.context.is_none_or(|context| context(found))
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        if let Some(url) = found.group(0) {
            cx.link(&Attributes::link(Some(url)), Some(url), url);
        }
    }
}

/// True if the match sits between two word characters, as in `don't`.
pub fn between_word_chars(found: &ElementMatch<'_>) -> bool {
    found.char_before().is_some_and(is_word_char) && found.char_after().is_some_and(is_word_char)
}

/// True if the match has a space on both sides with word characters beyond,
/// as in `a -- b`.
pub fn spaced_between_words(found: &ElementMatch<'_>) -> bool {
    let mut before = found.text_before().chars().rev();
    let mut after = found.text_after().chars();
    matches!(before.next(), Some(c) if c.is_whitespace())
        && before.next().is_some_and(is_word_char)
        && matches!(after.next(), Some(c) if c.is_whitespace())
        && after.next().is_some_and(is_word_char)
}

/// True if the match sits between digits, allowing one space on each side,
/// as in `2 x 4`.
pub fn between_digits(found: &ElementMatch<'_>) -> bool {
    fn digit_near(mut chars: impl Iterator<Item = char>) -> bool {
        match chars.next() {
            Some(' ') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }
    digit_near(found.text_before().chars().rev()) && digit_near(found.text_after().chars())
}
