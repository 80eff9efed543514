use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Switches shared by all dialects. Each dialect reads the ones it
/// understands when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkupOptions {
    /// Emit inline HTML as text instead of passing it through.
    pub escape_html: bool,
    /// Turn bare URLs into links.
    pub detect_raw_hyperlinks: bool,
    /// Locale such as `fr_FR` for generated text, e.g. month names from
    /// MediaWiki date templates. Unknown locales fall back to English.
    pub locale: Option<String>,
    /// Href template for internal links, `{0}` is the page name.
    pub internal_link_pattern: String,
    /// Markup stored in a repository: leading spaces do not make
    /// preformatted text.
    pub optimize_for_repository: bool,
    /// Paragraph lines are joined with line breaks instead of newlines.
    pub newlines_cause_line_break: bool,
    /// Recognise blocks only; inline markup is emitted as plain text.
    pub blocks_only: bool,
    /// Skip blocks that generate content, such as tables of contents.
    pub filter_generative_contents: bool,
    /// MediaWiki templates by name. They take precedence over the built-in
    /// ones.
    pub templates: BTreeMap<String, String>,
    /// MediaWiki template names to remove instead of expanding; `*` matches
    /// any run of characters.
    pub template_excludes: Vec<String>,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            escape_html: false,
            detect_raw_hyperlinks: false,
            locale: None,
            internal_link_pattern: "/wiki/{0}".to_string(),
            optimize_for_repository: false,
            newlines_cause_line_break: false,
            blocks_only: false,
            filter_generative_contents: false,
            templates: BTreeMap::new(),
            template_excludes: Vec::new(),
        }
    }
}

impl MarkupOptions {
    /// Href for an internal page link.
    pub fn internal_link(&self, page: &str) -> String {
        self.internal_link_pattern.replace("{0}", page)
    }
}
