use std::collections::{BTreeMap, HashMap};

use super::locator::Locator;
use crate::outline::{IdGenerator, OutlineItem};

/// Mutable state owned by exactly one parse.
#[derive(Debug, Default)]
pub struct ContentState {
    pub(crate) locator: Locator,
    pub(crate) previous_line: Option<Locator>,
    pub ids: IdGenerator,
    footnotes: HashMap<String, String>,
    glossary: BTreeMap<String, String>,
    pub(crate) outline: Option<OutlineItem>,
    block_title: Option<String>,
    block_attributes: Option<String>,
}

impl ContentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Registers footnote `number` and returns its anchor id.
    pub fn register_footnote(&mut self, number: &str) -> String {
        if let Some(id) = self.footnotes.get(number) {
            return id.clone();
        }
        let id = self.ids.reserve(format!("___fn{number}"));
        self.footnotes.insert(number.to_string(), id.clone());
        id
    }

    /// Anchor id of footnote `number`, if the document defines it.
    pub fn footnote_id(&self, number: &str) -> Option<&str> {
        self.footnotes.get(number).map(String::as_str)
    }

    /// Records an acronym definition; the first definition wins.
    pub fn add_glossary_term(&mut self, term: &str, definition: &str) {
        self.glossary
            .entry(term.to_string())
            .or_insert_with(|| definition.to_string());
    }

    /// Acronyms seen so far, sorted by term.
    pub fn glossary(&self) -> &BTreeMap<String, String> {
        &self.glossary
    }

    /// Title line waiting for the next block (`.Title` style metadata).
    pub fn set_block_title(&mut self, title: impl Into<String>) {
        self.block_title = Some(title.into());
    }

    pub fn take_block_title(&mut self) -> Option<String> {
        self.block_title.take()
    }

    /// Attribute list waiting for the next block (`[source,java]` style).
    pub fn set_block_attributes(&mut self, attributes: impl Into<String>) {
        self.block_attributes = Some(attributes.into());
    }

    pub fn take_block_attributes(&mut self) -> Option<String> {
        self.block_attributes.take()
    }
}
