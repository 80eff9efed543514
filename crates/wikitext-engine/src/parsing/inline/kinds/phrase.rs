use regex::escape;

use crate::builder::{Attributes, SpanType};
use crate::parsing::ParseContext;
use crate::parsing::inline::{ElementKind, ElementMatch, PatternElement};

/// Content of a phrase that must not start or end with whitespace.
pub const TRIMMED_CONTENT: &str = r"\S(?:.*?\S)?";

/// How a phrase modifier emits what it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Phrase modifiers and tokens again, over the content's own range.
    Nested,
    /// Tokens only.
    Tokens,
    /// Characters exactly as written.
    Literal,
}

/// Optional attribute block right after an opening delimiter, e.g. Textile's
/// `(class#id){style}[lang]`.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSyntax {
    pub pattern: &'static str,
    pub group_count: usize,
    /// Builds attributes from the match; the second argument is the element
    /// group holding the first attribute group.
    pub parse: fn(&ElementMatch<'_>, usize) -> Attributes,
}

/// Delimited content wrapped in one or more spans.
#[derive(Debug, Clone)]
pub struct SimplePhraseModifier {
    open: String,
    close: String,
    content: String,
    spans: Vec<SpanType>,
    mode: ContentMode,
    attributes: Option<AttributeSyntax>,
    style: Option<String>,
}

impl SimplePhraseModifier {
    /// The same literal delimiter on both sides.
    pub fn new(delimiter: &str, span: SpanType, mode: ContentMode) -> Self {
        Self::wrapped(delimiter, delimiter, span, mode)
    }

    /// Distinct literal opening and closing delimiters.
    pub fn wrapped(open: &str, close: &str, span: SpanType, mode: ContentMode) -> Self {
        Self {
            open: escape(open),
            close: escape(close),
            content: TRIMMED_CONTENT.to_string(),
            spans: vec![span],
            mode,
            attributes: None,
            style: None,
        }
    }

    /// Spans opened outermost first; attributes go on the first one.
    #[must_use]
    pub fn with_spans(mut self, spans: &[SpanType]) -> Self {
        self.spans = spans.to_vec();
        self
    }

    /// Content pattern without capturing groups.
    #[must_use]
    pub fn with_content(mut self, pattern: &str) -> Self {
        self.content = pattern.to_string();
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeSyntax) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Fixed CSS style on the outermost span.
    #[must_use]
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    fn attribute_groups(&self) -> usize {
        self.attributes.map_or(0, |a| a.group_count)
    }

    fn content_group(&self) -> usize {
        self.attribute_groups() + 1
    }
}

impl PatternElement for SimplePhraseModifier {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        let attributes = self.attributes.map_or("", |a| a.pattern);
        format!("{}{attributes}({}){}", self.open, self.content, self.close)
    }

    fn group_count(&self) -> usize {
        self.attribute_groups() + 1
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let mut attributes = match self.attributes {
            Some(syntax) => (syntax.parse)(found, 1),
            None => Attributes::new(),
        };
        if let Some(style) = &self.style {
            attributes.append_style(style);
        }
        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                cx.begin_span(*span, &attributes);
            } else {
                cx.begin_span(*span, &Attributes::new());
            }
        }
        let group = self.content_group();
        match self.mode {
            ContentMode::Nested => cx.emit_nested(found, group),
            ContentMode::Tokens => {
                if let Some(range) = found.group_range(group) {
                    cx.emit_markup_text(range);
                }
            }
            ContentMode::Literal => {
                if let Some(range) = found.group_range(group) {
                    cx.characters(range);
                }
            }
        }
        cx.set_segment(found.start(), found.end());
        for _ in &self.spans {
            cx.end_span();
        }
    }

    fn name(&self) -> String {
        format!("phrase {}…{}", self.open, self.close)
    }
}

/// Delimited content emitted as plain text, without any span.
#[derive(Debug, Clone)]
pub struct EscapePhraseModifier {
    open: String,
    close: String,
    content: String,
    unescaped: bool,
}

impl EscapePhraseModifier {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: escape(open),
            close: escape(close),
            content: ".*?".to_string(),
            unescaped: false,
        }
    }

    /// Content pattern without capturing groups.
    #[must_use]
    pub fn with_content(mut self, pattern: &str) -> Self {
        self.content = pattern.to_string();
        self
    }

    /// Emit the content as raw output rather than text.
    #[must_use]
    pub fn unescaped(mut self) -> Self {
        self.unescaped = true;
        self
    }
}

impl PatternElement for EscapePhraseModifier {
    fn kind(&self) -> ElementKind {
        ElementKind::PhraseModifier
    }

    fn pattern(&self) -> String {
        format!("{}({}){}", self.open, self.content, self.close)
    }

    fn group_count(&self) -> usize {
        1
    }

    fn emit(&self, cx: &mut ParseContext<'_>, found: &ElementMatch<'_>) {
        let Some(range) = found.group_range(1) else {
            return;
        };
        if self.unescaped {
            cx.set_segment(range.start, range.end);
            if let Some(text) = found.group(1)
                && !text.is_empty()
            {
                cx.characters_unescaped(text);
            }
        } else {
            cx.characters(range);
        }
    }

    fn name(&self) -> String {
        format!("escape {}…{}", self.open, self.close)
    }
}
