use std::collections::{HashMap, HashSet};
use std::fmt;

/// Turns heading text into an anchor id. One strategy per dialect.
pub trait IdGenerationStrategy: fmt::Debug + Send + Sync {
    fn generate_id(&self, heading_text: &str) -> String;
}

/// Keeps ASCII alphanumerics and `.`, lowercased: "a header" becomes
/// "aheader". Ids never start with a digit.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultIdStrategy;

impl IdGenerationStrategy for DefaultIdStrategy {
    fn generate_id(&self, heading_text: &str) -> String {
        let id: String = heading_text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match id.chars().next() {
            Some(first) if first.is_ascii_digit() => format!("a{id}"),
            _ => id,
        }
    }
}

/// Whitespace runs become `_`, case is kept, anything outside a safe set is
/// written as `.XX` per UTF-8 byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaWikiIdStrategy;

impl IdGenerationStrategy for MediaWikiIdStrategy {
    fn generate_id(&self, heading_text: &str) -> String {
        let mut id = String::with_capacity(heading_text.len());
        for word in heading_text.split_whitespace() {
            if !id.is_empty() {
                id.push('_');
            }
            for c in word.chars() {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':') {
                    id.push(c);
                } else {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).bytes() {
                        id.push_str(&format!(".{byte:02X}"));
                    }
                }
            }
        }
        id
    }
}

/// Lowercase slug: whitespace becomes `-`, punctuation other than `-` and `_`
/// is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlugIdStrategy;

impl IdGenerationStrategy for SlugIdStrategy {
    fn generate_id(&self, heading_text: &str) -> String {
        heading_text
            .trim()
            .chars()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some('-')
                } else if c.is_alphanumeric() || c == '-' || c == '_' {
                    Some(c)
                } else {
                    None
                }
            })
            .flat_map(char::to_lowercase)
            .collect()
    }
}

/// `_` followed by the lowercased words joined with `_`: "Section Title"
/// becomes "_section_title".
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiDocIdStrategy;

impl IdGenerationStrategy for AsciiDocIdStrategy {
    fn generate_id(&self, heading_text: &str) -> String {
        let words: Vec<String> = heading_text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            String::new()
        } else {
            format!("_{}", words.join("_"))
        }
    }
}

/// Per-parse registry that keeps ids unique.
///
/// The first occurrence of an id keeps it; later ones get `-2`, `-3`, ...
/// Text that yields no id at all falls back to `<kind>-<n>`.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    used: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_id(
        &mut self,
        strategy: &dyn IdGenerationStrategy,
        kind: &str,
        text: &str,
    ) -> String {
        let mut base = strategy.generate_id(text);
        if base.is_empty() {
            let counter = self.counters.entry(kind.to_string()).or_insert(0);
            *counter += 1;
            base = format!("{kind}-{counter}");
        }
        self.reserve(base)
    }

    /// Claims `id`, or the first free suffixed variant of it.
    pub fn reserve(&mut self, id: String) -> String {
        if !self.used.contains(&id) {
            self.used.insert(id.clone());
            return id;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{id}-{n}");
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }
}
