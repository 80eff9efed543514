pub mod html;
pub mod phrase;
pub mod tokens;

pub use html::{HtmlCommentElement, HtmlTagElement};
pub use phrase::{
    AttributeSyntax, ContentMode, EscapePhraseModifier, SimplePhraseModifier, TRIMMED_CONTENT,
};
pub use tokens::{
    EntityReferenceToken, EntityReplacementToken, HorizontalRuleToken, ImpliedHyperlinkToken,
    LineBreakToken, TokenContext, URL_PATTERN, between_digits, between_word_chars,
    spaced_between_words,
};
