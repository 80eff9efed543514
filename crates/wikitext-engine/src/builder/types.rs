use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural block kinds. Headings have their own begin/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    BulletedList,
    NumericList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionItem,
    Table,
    TableRow,
    TableCellHeader,
    TableCellNormal,
    Preformatted,
    Code,
    Quote,
    Div,
    Footnote,
    Panel,
    Note,
    Info,
    Tip,
    Warning,
    TableOfContents,
}

impl BlockType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::BulletedList => "bulleted-list",
            Self::NumericList => "numeric-list",
            Self::ListItem => "list-item",
            Self::DefinitionList => "definition-list",
            Self::DefinitionTerm => "definition-term",
            Self::DefinitionItem => "definition-item",
            Self::Table => "table",
            Self::TableRow => "table-row",
            Self::TableCellHeader => "table-cell-header",
            Self::TableCellNormal => "table-cell-normal",
            Self::Preformatted => "preformatted",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Div => "div",
            Self::Footnote => "footnote",
            Self::Panel => "panel",
            Self::Note => "note",
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::TableOfContents => "table-of-contents",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline span kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanType {
    Emphasis,
    Strong,
    Italic,
    Bold,
    Citation,
    Deleted,
    Inserted,
    Underlined,
    Superscript,
    Subscript,
    Span,
    Code,
    Monospace,
    Link,
    Quote,
    Mark,
}

impl SpanType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Italic => "italic",
            Self::Bold => "bold",
            Self::Citation => "citation",
            Self::Deleted => "deleted",
            Self::Inserted => "inserted",
            Self::Underlined => "underlined",
            Self::Superscript => "superscript",
            Self::Subscript => "subscript",
            Self::Span => "span",
            Self::Code => "code",
            Self::Monospace => "monospace",
            Self::Link => "link",
            Self::Quote => "quote",
            Self::Mark => "mark",
        }
    }
}

impl fmt::Display for SpanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
