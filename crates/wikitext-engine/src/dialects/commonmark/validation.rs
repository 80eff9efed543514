use std::sync::LazyLock;

use regex::Regex;

use crate::validation::{Severity, ValidationProblem, ValidationRule};

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("Invalid fence regex"));

/// Flags a code fence that is never closed, which turns the rest of the
/// document into code.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnterminatedFenceRule;

impl ValidationRule for UnterminatedFenceRule {
    fn find_problem(
        &self,
        markup: &str,
        offset: usize,
        length: usize,
    ) -> Option<ValidationProblem> {
        let end = (offset + length).min(markup.len());
        let mut open: Option<(usize, &str)> = None;
        let mut line_start = 0;
        for line in markup.split_inclusive('\n') {
            let text = line.trim_end_matches(['\n', '\r']);
            match open {
                Some((_, fence)) => {
                    let trimmed = text.trim_start_matches(' ');
                    let closes = text.len() - trimmed.len() <= 3
                        && trimmed.starts_with(fence)
                        && trimmed
                            .trim_end()
                            .chars()
                            .all(|c| Some(c) == fence.chars().next());
                    if closes {
                        open = None;
                    }
                }
                None => {
                    if let Some(m) = FENCE.captures(text).and_then(|c| c.get(1)) {
                        open = Some((line_start + m.start(), m.as_str()));
                    }
                }
            }
            line_start += line.len();
        }
        let (at, fence) = open?;
        (offset..end.max(offset + 1)).contains(&at).then(|| {
            ValidationProblem::new(
                Severity::Warning,
                "code fence is not closed",
                at,
                fence.len(),
            )
        })
    }
}
