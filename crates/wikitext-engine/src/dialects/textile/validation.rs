use std::sync::LazyLock;

use regex::Regex;

use super::attributes::BLOCK_ATTRIBUTES;
use crate::validation::{Severity, ValidationProblem, ValidationRule};

static SIGNATURE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^(?:h[1-6]|p|bc|bq|pre|fn\d+|###|notextile|table){BLOCK_ATTRIBUTES}\.\.?(?::\S+)?"
    ))
    .expect("Invalid Textile signature prefix regex")
});

/// Flags block signatures such as `h1.` or `bc.` that run straight into
/// their content, which Textile reads as a plain paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockWhitespaceRule;

impl ValidationRule for BlockWhitespaceRule {
    fn find_problem(
        &self,
        markup: &str,
        offset: usize,
        length: usize,
    ) -> Option<ValidationProblem> {
        let end = offset + length;
        SIGNATURE_PREFIX
            .find_iter(markup)
            .skip_while(|m| m.start() < offset)
            .take_while(|m| m.start() < end)
            .find(|m| {
                markup[m.end()..]
                    .chars()
                    .next()
                    .is_some_and(|c| !c.is_whitespace())
            })
            .map(|m| {
                ValidationProblem::new(
                    Severity::Warning,
                    "a block signature must be followed by a space",
                    m.start(),
                    m.len(),
                )
            })
    }
}
