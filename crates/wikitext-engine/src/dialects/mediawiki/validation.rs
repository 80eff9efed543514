use crate::validation::{Severity, ValidationProblem, ValidationRule};

/// Flags `<!--` without a matching `-->`, which hides the rest of the
/// document.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnclosedCommentRule;

impl ValidationRule for UnclosedCommentRule {
    fn find_problem(
        &self,
        markup: &str,
        offset: usize,
        length: usize,
    ) -> Option<ValidationProblem> {
        let end = (offset + length).min(markup.len());
        let mut from = offset;
        while from < end {
            let open = from + markup.get(from..end)?.find("<!--")?;
            match markup[open + 4..].find("-->") {
                Some(close) => from = open + 4 + close + 3,
                None => {
                    return Some(ValidationProblem::new(
                        Severity::Warning,
                        "comment is not closed",
                        open,
                        4,
                    ));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closed_comments_are_fine() {
        let markup = "a <!-- b --> c\n<!--\nmulti\n-->";
        assert_eq!(UnclosedCommentRule.find_problem(markup, 0, markup.len()), None);
    }

    #[test]
    fn unclosed_comment_is_reported_at_its_start() {
        let markup = "a <!-- b --> c <!-- never";
        let problem = UnclosedCommentRule
            .find_problem(markup, 0, markup.len())
            .unwrap();
        assert_eq!(problem.offset, 15);
        assert_eq!(problem.length, 4);
    }
}
