//! Textile attribute blocks: `(class#id)`, `{style}`, `[lang]` and the
//! alignment markers that may follow a block signature.

use std::sync::LazyLock;

use regex::Regex;

use crate::builder::Attributes;
use crate::parsing::inline::{AttributeSyntax, ElementMatch};

/// Any run of attribute parts after a block signature or list marker.
pub const BLOCK_ATTRIBUTES: &str = r"(?:\([^()]*\)|\{[^}]*\}|\[[^\]]*\]|<>|<|>|=)*";

/// Attributes right after a phrase modifier's opening delimiter.
pub const PHRASE_ATTRIBUTES: AttributeSyntax = AttributeSyntax {
    pattern: r"(?:\(([^#)]*)(?:#([^)]*))?\))?(?:\{([^}]*)\})?(?:\[([^\]]*)\])?",
    group_count: 4,
    parse: phrase_attributes,
};

static PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^()]*)\)|\{([^}]*)\}|\[([^\]]*)\]|(<>|<|>|=)")
        .expect("Invalid Textile attribute regex")
});

/// Parses a run of block attribute parts, e.g. `(foo#ab){color:black;}<`.
pub fn parse_block_attributes(text: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for part in PART.captures_iter(text) {
        if let Some(class_and_id) = part.get(1) {
            apply_class_and_id(&mut attributes, class_and_id.as_str());
        } else if let Some(style) = part.get(2) {
            attributes.append_style(style.as_str());
        } else if let Some(language) = part.get(3) {
            attributes.language = Some(language.as_str().to_string());
        } else if let Some(alignment) = part.get(4) {
            attributes.append_style(alignment_style(alignment.as_str()));
        }
    }
    attributes
}

/// `class#id`, either part optional.
pub fn apply_class_and_id(attributes: &mut Attributes, text: &str) {
    let (class, id) = match text.split_once('#') {
        Some((class, id)) => (class, Some(id)),
        None => (text, None),
    };
    attributes.append_class(class);
    if let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) {
        attributes.id = Some(id.to_string());
    }
}

pub fn alignment_style(marker: &str) -> &'static str {
    match marker {
        "<" => "text-align: left;",
        ">" => "text-align: right;",
        "=" | "<>" => "text-align: center;",
        "^" => "vertical-align: top;",
        "~" => "vertical-align: bottom;",
        _ => "",
    }
}

fn phrase_attributes(found: &ElementMatch<'_>, first: usize) -> Attributes {
    let mut attributes = Attributes::new();
    if let Some(class) = found.group(first) {
        attributes.append_class(class);
    }
    if let Some(id) = found.group(first + 1).filter(|id| !id.is_empty()) {
        attributes.id = Some(id.to_string());
    }
    if let Some(style) = found.group(first + 2) {
        attributes.append_style(style);
    }
    if let Some(language) = found.group(first + 3).filter(|l| !l.is_empty()) {
        attributes.language = Some(language.to_string());
    }
    attributes
}
