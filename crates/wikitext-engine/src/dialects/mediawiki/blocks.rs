use std::sync::LazyLock;

use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::blocks::ListLine;

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*#:;]+)\s*").expect("Invalid MediaWiki list regex"));

static HTML_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][-a-zA-Z0-9_:]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("Invalid HTML attribute regex")
});

/// `*` bullets, `#` numbers, `;` terms and `:` definitions, one marker per
/// level. `;term : definition` puts both on one line.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let markers = captures.get(1)?.as_str();
    let content = captures.get(0)?.end();
    let path = markers
        .chars()
        .map(|marker| match marker {
            '*' => BlockType::BulletedList,
            '#' => BlockType::NumericList,
            _ => BlockType::DefinitionList,
        })
        .collect();
    let item = match markers.chars().last() {
        Some(';') => BlockType::DefinitionTerm,
        Some(':') => BlockType::DefinitionItem,
        _ => BlockType::ListItem,
    };
    let mut list_line = ListLine::new(path, item, content);
    if item == BlockType::DefinitionTerm {
        list_line.definition = definition_split(line, content);
    }
    Some(list_line)
}

// the first `:` that is not part of a URL scheme
fn definition_split(line: &str, content: usize) -> Option<(usize, usize)> {
    let colon = line[content..]
        .match_indices(':')
        .map(|(i, _)| content + i)
        .find(|&at| !line[at..].starts_with("://"))?;
    let term_end = content + line[content..colon].trim_end().len();
    let rest = &line[colon + 1..];
    let definition_start = colon + 1 + (rest.len() - rest.trim_start().len());
    Some((term_end, definition_start))
}

/// `name="value"` pairs of an HTML-like tag or table line, in order.
pub fn html_attributes(text: &str) -> Vec<(String, String)> {
    HTML_ATTRIBUTE
        .captures_iter(text)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str().to_ascii_lowercase();
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .or_else(|| captures.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

/// Attributes every element understands; returns false for anything else.
pub fn apply_common(attributes: &mut Attributes, name: &str, value: &str) -> bool {
    match name {
        "id" => attributes.id = Some(value.to_string()),
        "class" => attributes.append_class(value),
        "style" => attributes.append_style(value),
        "title" => attributes.title = Some(value.to_string()),
        "lang" => attributes.language = Some(value.to_string()),
        "bgcolor" => attributes.append_style(&format!("background-color: {value};")),
        _ => return false,
    }
    true
}

/// `<source lang="java">`: the language becomes the class `source-java`.
pub fn source_attributes(params: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in html_attributes(params.unwrap_or("")) {
        if name == "lang" {
            attributes.append_class(&format!("source-{value}"));
        }
    }
    attributes
}

pub fn pre_attributes(params: Option<&str>) -> Attributes {
    let mut attributes = Attributes::new();
    for (name, value) in html_attributes(params.unwrap_or("")) {
        apply_common(&mut attributes, &name, &value);
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn markers_map_to_list_types() {
        let item = list_line("*#: nested").unwrap();
        assert_eq!(
            item.path,
            vec![
                BlockType::BulletedList,
                BlockType::NumericList,
                BlockType::DefinitionList
            ]
        );
        assert_eq!(item.item, BlockType::DefinitionItem);
        assert_eq!(item.content, 4);
    }

    #[test]
    fn term_and_definition_on_one_line() {
        let line = "; term : the definition";
        let item = list_line(line).unwrap();
        assert_eq!(item.item, BlockType::DefinitionTerm);
        let (term_end, definition_start) = item.definition.unwrap();
        assert_eq!(&line[item.content..term_end], "term");
        assert_eq!(&line[definition_start..], "the definition");
    }

    #[test]
    fn urls_do_not_split_terms() {
        assert_eq!(list_line(";http://example.com").unwrap().definition, None);
    }

    #[test]
    fn attribute_quoting_styles() {
        assert_eq!(
            html_attributes(r#" border="1" class='wide' width=50%"#),
            vec![
                ("border".to_string(), "1".to_string()),
                ("class".to_string(), "wide".to_string()),
                ("width".to_string(), "50%".to_string()),
            ]
        );
    }

    #[test]
    fn source_language_class() {
        let attributes = source_attributes(Some(r#" lang="java""#));
        assert_eq!(attributes.css_class.as_deref(), Some("source-java"));
        assert!(source_attributes(None).is_empty());
    }
}
