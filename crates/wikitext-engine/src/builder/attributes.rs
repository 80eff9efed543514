use serde::Serialize;

/// Attributes attached to a block, span, heading, link or image.
///
/// Each event gets its own value; the builder receives a reference that is
/// only valid for the duration of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "AttributeDetail::is_none")]
    pub detail: AttributeDetail,
}

/// Kind-specific attribute fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum AttributeDetail {
    #[default]
    None,
    Link(LinkAttributes),
    Quote(QuoteAttributes),
    Image(ImageAttributes),
    Table(TableAttributes),
    TableCell(TableCellAttributes),
    List(ListAttributes),
}

impl AttributeDetail {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkAttributes {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteAttributes {
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageAttributes {
    pub alt: Option<String>,
    pub align: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableAttributes {
    pub border: Option<String>,
    pub cellpadding: Option<String>,
    pub cellspacing: Option<String>,
    pub width: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableCellAttributes {
    pub colspan: Option<u32>,
    pub rowspan: Option<u32>,
    pub align: Option<String>,
    pub valign: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListAttributes {
    pub start: Option<u64>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.css_style = Some(style.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: AttributeDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Attributes for a hyperlink span or anchor.
    #[must_use]
    pub fn link(href: Option<&str>) -> Self {
        Self::default().with_detail(AttributeDetail::Link(LinkAttributes {
            href: href.map(str::to_string),
            ..LinkAttributes::default()
        }))
    }

    /// Appends a declaration to `css_style`, inserting a separator if needed.
    pub fn append_style(&mut self, declaration: &str) {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            return;
        }
        match &mut self.css_style {
            Some(style) => {
                if !style.trim_end().ends_with(';') {
                    style.push(';');
                }
                style.push(' ');
                style.push_str(declaration);
            }
            None => self.css_style = Some(declaration.to_string()),
        }
    }

    /// Appends a class name to `css_class`, space separated.
    pub fn append_class(&mut self, class: &str) {
        let class = class.trim();
        if class.is_empty() {
            return;
        }
        match &mut self.css_class {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.css_class = Some(class.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Link fields, created on demand.
    pub fn link_mut(&mut self) -> &mut LinkAttributes {
        if !matches!(self.detail, AttributeDetail::Link(_)) {
            self.detail = AttributeDetail::Link(LinkAttributes::default());
        }
        match &mut self.detail {
            AttributeDetail::Link(link) => link,
            _ => unreachable!("detail was just set to a link"),
        }
    }

    pub fn table_mut(&mut self) -> &mut TableAttributes {
        if !matches!(self.detail, AttributeDetail::Table(_)) {
            self.detail = AttributeDetail::Table(TableAttributes::default());
        }
        match &mut self.detail {
            AttributeDetail::Table(table) => table,
            _ => unreachable!("detail was just set to a table"),
        }
    }

    pub fn table_cell_mut(&mut self) -> &mut TableCellAttributes {
        if !matches!(self.detail, AttributeDetail::TableCell(_)) {
            self.detail = AttributeDetail::TableCell(TableCellAttributes::default());
        }
        match &mut self.detail {
            AttributeDetail::TableCell(cell) => cell,
            _ => unreachable!("detail was just set to a table cell"),
        }
    }

    pub fn image_mut(&mut self) -> &mut ImageAttributes {
        if !matches!(self.detail, AttributeDetail::Image(_)) {
            self.detail = AttributeDetail::Image(ImageAttributes::default());
        }
        match &mut self.detail {
            AttributeDetail::Image(image) => image,
            _ => unreachable!("detail was just set to an image"),
        }
    }

    pub fn list_mut(&mut self) -> &mut ListAttributes {
        if !matches!(self.detail, AttributeDetail::List(_)) {
            self.detail = AttributeDetail::List(ListAttributes::default());
        }
        match &mut self.detail {
            AttributeDetail::List(list) => list,
            _ => unreachable!("detail was just set to a list"),
        }
    }

    pub fn href(&self) -> Option<&str> {
        match &self.detail {
            AttributeDetail::Link(link) => link.href.as_deref(),
            _ => None,
        }
    }
}
