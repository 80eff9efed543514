//! Template expansion, run over the whole document before it is parsed.
//!
//! `{{name}}` and `{{name|arg|key=value}}` are replaced by the template's
//! text. Inside that text `{{{1}}}` or `{{{key}}}` is replaced by the
//! matching argument and `{{{key|default}}}` falls back to `default`.
//! Templates may use other templates; expansion repeats until nothing
//! changes, a bounded number of times.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Local, Locale};
use regex::{Captures, Regex};

use crate::dialect::MarkupOptions;

static TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}|]+?)\s*((?:\|[^{}]*)?)\}\}")
        .expect("Invalid MediaWiki template regex")
});
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{\s*([^{}|]+?)\s*(?:\|([^{}]*))?\}\}\}")
        .expect("Invalid MediaWiki template parameter regex")
});

const MAX_PASSES: usize = 8;

/// A source of template text by name.
pub trait TemplateResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl TemplateResolver for BTreeMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Dash templates and the `CURRENT*` date and time variables.
#[derive(Debug, Clone)]
pub struct BuiltInTemplates {
    now: DateTime<FixedOffset>,
    locale: Option<Locale>,
}

impl BuiltInTemplates {
    pub fn new(locale: Option<&str>) -> Self {
        Self::at(Local::now().fixed_offset(), locale)
    }

    /// Date variables report `now`.
    pub fn at(now: DateTime<FixedOffset>, locale: Option<&str>) -> Self {
        let locale = locale.and_then(|tag| Locale::try_from(tag.replace('-', "_").as_str()).ok());
        Self { now, locale }
    }

    fn date(&self, format: &str) -> String {
        match self.locale {
            Some(locale) => self.now.format_localized(format, locale).to_string(),
            None => self.now.format(format).to_string(),
        }
    }
}

impl TemplateResolver for BuiltInTemplates {
    fn resolve(&self, name: &str) -> Option<String> {
        let format = match name {
            "mdash" | "emdash" => return Some("&nbsp;&mdash; ".to_string()),
            "ndash" | "endash" => return Some("&nbsp;&ndash; ".to_string()),
            "CURRENTYEAR" => "%Y",
            "CURRENTMONTH" => "%m",
            "CURRENTMONTHNAME" | "CURRENTMONTHNAMEGEN" => "%B",
            "CURRENTMONTHABBREV" => "%b",
            "CURRENTDAY" => "%-d",
            "CURRENTDAY2" => "%d",
            "CURRENTDOW" => "%w",
            "CURRENTDAYNAME" => "%A",
            "CURRENTTIME" => "%H:%M",
            "CURRENTHOUR" => "%H",
            "CURRENTWEEK" => "%V",
            "CURRENTTIMESTAMP" => "%Y%m%d%H%M%S",
            _ => return None,
        };
        Some(self.date(format))
    }
}

/// Resolvers in lookup order plus the template names to remove.
///
/// A template no resolver knows is left as written.
#[derive(Default)]
pub struct TemplateExpander<'r> {
    resolvers: Vec<&'r dyn TemplateResolver>,
    excludes: Vec<Regex>,
}

impl<'r> TemplateExpander<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn resolver(mut self, resolver: &'r dyn TemplateResolver) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Names matching any of `patterns` expand to nothing. `*` matches any
    /// run of characters.
    #[must_use]
    pub fn excludes(mut self, patterns: &[String]) -> Self {
        self.excludes.extend(patterns.iter().filter_map(|pattern| {
            let pattern = regex::escape(pattern.trim()).replace(r"\*", ".*");
            Regex::new(&format!("^{pattern}$")).ok()
        }));
        self
    }

    pub fn expand<'m>(&self, markup: &'m str) -> Cow<'m, str> {
        let mut text = Cow::Borrowed(markup);
        for _ in 0..MAX_PASSES {
            let expanded = match self.expand_once(&text) {
                Cow::Owned(expanded) if expanded != *text => expanded,
                _ => break,
            };
            text = Cow::Owned(expanded);
        }
        text
    }

    fn expand_once<'m>(&self, markup: &'m str) -> Cow<'m, str> {
        TEMPLATE.replace_all(markup, |captures: &Captures<'_>| {
            self.replacement(markup, captures)
        })
    }

    fn replacement(&self, markup: &str, captures: &Captures<'_>) -> String {
        let Some(whole) = captures.get(0) else {
            return String::new();
        };
        // a `{{{parameter}}}` outside any template stays as written
        if markup[..whole.start()].ends_with('{') || markup[whole.end()..].starts_with('}') {
            return whole.as_str().to_string();
        }
        let name = &captures[1];
        if self.excludes.iter().any(|exclude| exclude.is_match(name)) {
            log::debug!("template {name} excluded");
            return String::new();
        }
        match self.resolvers.iter().find_map(|resolver| resolver.resolve(name)) {
            Some(body) => substitute(&body, &captures[2]),
            None => whole.as_str().to_string(),
        }
    }
}

/// Replaces parameter references in `body` with `arguments`, given as
/// written after the template name (`|one|key=value`).
fn substitute(body: &str, arguments: &str) -> String {
    let mut positional = Vec::new();
    let mut named = BTreeMap::new();
    for argument in arguments.split('|').skip(1) {
        match argument.split_once('=') {
            Some((key, value)) => {
                named.insert(key.trim(), value.trim());
            }
            None => positional.push(argument.trim()),
        }
    }
    PARAMETER
        .replace_all(body, |captures: &Captures<'_>| {
            let key = &captures[1];
            key.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| positional.get(i).copied())
                .or_else(|| named.get(key).copied())
                .or_else(|| captures.get(2).map(|m| m.as_str()))
                .unwrap_or("")
                .to_string()
        })
        .into_owned()
}

/// Expands the options' templates, then the built-in ones.
pub fn expand_templates<'m>(markup: &'m str, options: &MarkupOptions) -> Cow<'m, str> {
    if !markup.contains("{{") {
        return Cow::Borrowed(markup);
    }
    let built_in = BuiltInTemplates::new(options.locale.as_deref());
    let expander = TemplateExpander::new()
        .resolver(&options.templates)
        .resolver(&built_in)
        .excludes(&options.template_excludes);
    expander.expand(markup)
}
