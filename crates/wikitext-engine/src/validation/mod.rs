//! Soft problems in markup, reported as data.
//!
//! Rules look at a region of the document and report what they find; they
//! never stop a parse. [`MarkupValidator`] combines a dialect's rules with
//! [`StructureRule`], which re-parses the region to check that the event
//! stream is balanced.

use std::fmt;

use serde::Serialize;

use crate::builder::{Attributes, BlockType, DocumentBuilder, SpanType};
use crate::dialect::Dialect;
use crate::parsing::MarkupParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationProblem {
    pub offset: usize,
    pub length: usize,
    pub severity: Severity,
    pub message: String,
}

impl ValidationProblem {
    pub fn new(severity: Severity, message: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{severity} at {}..{}: {}",
            self.offset,
            self.offset + self.length,
            self.message
        )
    }
}

/// A check over a region of markup.
pub trait ValidationRule: fmt::Debug + Send + Sync {
    /// The first problem in `markup[offset..offset + length]`, if any.
    fn find_problem(&self, markup: &str, offset: usize, length: usize)
    -> Option<ValidationProblem>;

    /// Every problem in the region, found by repeatedly searching past the
    /// previous one.
    fn find_problems(&self, markup: &str, offset: usize, length: usize) -> Vec<ValidationProblem> {
        let end = offset + length;
        let mut problems = Vec::new();
        let mut start = offset;
        while start < end {
            let Some(problem) = self.find_problem(markup, start, end - start) else {
                break;
            };
            start = (problem.offset + problem.length).max(start + 1);
            problems.push(problem);
        }
        problems
    }
}

/// Reports an error when the dialect produces unbalanced events for a
/// region.
#[derive(Debug, Clone, Copy)]
pub struct StructureRule<'d> {
    dialect: &'d Dialect,
}

impl<'d> StructureRule<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }
}

impl ValidationRule for StructureRule<'_> {
    fn find_problem(
        &self,
        markup: &str,
        offset: usize,
        length: usize,
    ) -> Option<ValidationProblem> {
        let mut checker = BalanceChecker::default();
        MarkupParser::new(self.dialect).parse_region(
            markup,
            offset..offset + length,
            &mut checker,
        );
        if checker.is_balanced() {
            None
        } else {
            log::warn!(
                "dialect {} produced unbalanced events for {offset}..{}",
                self.dialect.name(),
                offset + length
            );
            Some(ValidationProblem::new(
                Severity::Error,
                "markup produced unbalanced document structure",
                offset,
                length,
            ))
        }
    }
}

/// No-op builder that only tracks nesting.
#[derive(Debug, Default)]
struct BalanceChecker {
    open: Vec<&'static str>,
    mismatched: bool,
}

impl BalanceChecker {
    fn is_balanced(&self) -> bool {
        self.open.is_empty() && !self.mismatched
    }

    fn begin(&mut self, kind: &'static str) {
        self.open.push(kind);
    }

    fn end(&mut self, kind: &'static str) {
        if self.open.pop() != Some(kind) {
            self.mismatched = true;
        }
    }
}

impl DocumentBuilder for BalanceChecker {
    fn begin_document(&mut self) {
        self.begin("document");
    }

    fn end_document(&mut self) {
        self.end("document");
    }

    fn begin_block(&mut self, _kind: BlockType, _attributes: &Attributes) {
        self.begin("block");
    }

    fn end_block(&mut self) {
        self.end("block");
    }

    fn begin_span(&mut self, _kind: SpanType, _attributes: &Attributes) {
        self.begin("span");
    }

    fn end_span(&mut self) {
        self.end("span");
    }

    fn begin_heading(&mut self, _level: u8, _attributes: &Attributes) {
        self.begin("heading");
    }

    fn end_heading(&mut self) {
        self.end("heading");
    }

    fn characters(&mut self, _text: &str) {}

    fn characters_unescaped(&mut self, _text: &str) {}

    fn entity_reference(&mut self, _entity: &str) {}

    fn image(&mut self, _attributes: &Attributes, _url: &str) {}

    fn image_link(&mut self, _: &Attributes, _: &Attributes, _: &str, _: &str) {}

    fn link(&mut self, _attributes: &Attributes, _href: Option<&str>, _text: &str) {}

    fn acronym(&mut self, _text: &str, _definition: &str) {}

    fn line_break(&mut self) {}

    fn horizontal_rule(&mut self) {}
}

/// Runs the structure check and a dialect's own rules over a region.
#[derive(Debug, Clone, Copy)]
pub struct MarkupValidator<'d> {
    dialect: &'d Dialect,
}

impl<'d> MarkupValidator<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// Problems in the whole document, ordered by offset.
    pub fn validate_all(&self, markup: &str) -> Vec<ValidationProblem> {
        self.validate(markup, 0, markup.len())
    }

    /// Problems in `markup[offset..offset + length]`, ordered by offset. The
    /// region is clamped to the document.
    pub fn validate(&self, markup: &str, offset: usize, length: usize) -> Vec<ValidationProblem> {
        let mut end = offset.saturating_add(length).min(markup.len());
        while !markup.is_char_boundary(end) {
            end -= 1;
        }
        let mut start = offset.min(end);
        while !markup.is_char_boundary(start) {
            start -= 1;
        }
        if start == end {
            return Vec::new();
        }

        let structure = StructureRule::new(self.dialect);
        let mut problems: Vec<ValidationProblem> = structure
            .find_problem(markup, start, end - start)
            .into_iter()
            .collect();
        for rule in self.dialect.validation_rules() {
            problems.extend(rule.find_problems(markup, start, end - start));
        }
        problems.sort_by_key(|p| (p.offset, p.severity));
        problems
    }
}
