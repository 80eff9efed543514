//! Compiles independently written element patterns into one alternation.
//!
//! Each element's fragment is wrapped in its own capturing group, so the
//! compiled pattern has, for element `i`, one wrapper group followed by the
//! element's declared groups. The offset of every wrapper group is recorded
//! while the alternation is assembled; after a match the first element whose
//! wrapper group participated is the one that matched, and its groups are
//! read relative to that offset.
//!
//! Elements can be grouped behind a [`Guard`]. The guard's prefix is a
//! non-capturing alternation placed in front of the grouped fragments (it
//! consumes the boundary character, which is why the element's own match
//! starts at its wrapper group rather than at the overall match). The guard's
//! suffix condition is checked in code after the match.
//!
//! Every fragment is compiled on its own first to check its declared group
//! count, and the combined pattern is checked against the sum of the counts,
//! so a miscounted element is reported when the dialect is built. The
//! standalone form (guard prefix plus fragment) is kept: when the element
//! the alternation picked is rejected, the others are tried at the same
//! position before the search moves on.

use std::fmt;
use std::ops::Range;

use regex::Regex;

use super::element::{ElementMatch, PatternElement, is_word_char};
use crate::error::ConfigurationError;

/// What must follow a guarded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixGuard {
    Any,
    /// End of the scanned range or a non-word character.
    NonWord,
}

/// Boundary conditions shared by a group of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    prefix: Option<String>,
    suffix: SuffixGuard,
}

impl Guard {
    /// `prefix` is a regex alternative matched right before the element; it
    /// must not contain capturing groups.
    pub fn new(prefix: Option<&str>, suffix: SuffixGuard) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            suffix,
        }
    }

    /// Start of the range or one of `class`, and a non-word character (or
    /// end of range) afterwards.
    pub fn boundary(class: &str) -> Self {
        Self::new(Some(&format!("^|{class}")), SuffixGuard::NonWord)
    }

    fn prefix_pattern(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("(?:{prefix})"),
            None => String::new(),
        }
    }

    fn accepts_suffix(&self, next: Option<char>) -> bool {
        match self.suffix {
            SuffixGuard::Any => true,
            SuffixGuard::NonWord => next.is_none_or(|c| !is_word_char(c)),
        }
    }
}

enum SyntaxItem {
    Element(Box<dyn PatternElement>),
    BeginGroup(Guard),
    EndGroup,
}

/// Ordered list of elements and guard groups, compiled by [`build`].
///
/// [`build`]: SyntaxBuilder::build
#[derive(Default)]
pub struct SyntaxBuilder {
    items: Vec<SyntaxItem>,
}

impl fmt::Debug for SyntaxBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxBuilder")
            .field("items", &self.items.len())
            .finish()
    }
}

impl SyntaxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: impl PatternElement + 'static) -> &mut Self {
        self.items.push(SyntaxItem::Element(Box::new(element)));
        self
    }

    /// Elements added until [`end_group`](Self::end_group) share `guard`.
    pub fn begin_group(&mut self, guard: Guard) -> &mut Self {
        self.items.push(SyntaxItem::BeginGroup(guard));
        self
    }

    pub fn end_group(&mut self) -> &mut Self {
        self.items.push(SyntaxItem::EndGroup);
        self
    }

    pub fn build(self) -> Result<PatternBasedSyntax, ConfigurationError> {
        let mut alternatives = Vec::new();
        let mut elements = Vec::new();
        let mut guards: Vec<Guard> = Vec::new();
        let mut open: Option<(usize, Vec<String>)> = None;
        let mut next_group = 1;
        let mut published = 0;

        for item in self.items {
            match item {
                SyntaxItem::Element(element) => {
                    check_element(element.as_ref())?;
                    let fragment = format!("({})", element.pattern());
                    let prefix = open
                        .as_ref()
                        .map(|(guard, _)| guards[*guard].prefix_pattern())
                        .unwrap_or_default();
                    let alone = Regex::new(&format!("{prefix}{fragment}")).map_err(|source| {
                        ConfigurationError::InvalidPattern {
                            element: element.name(),
                            source,
                        }
                    })?;
                    let wrapper = next_group;
                    next_group += 1 + element.group_count();
                    published += element.group_count();
                    let guard = match &mut open {
                        Some((guard, fragments)) => {
                            fragments.push(fragment);
                            Some(*guard)
                        }
                        None => {
                            alternatives.push(fragment);
                            None
                        }
                    };
                    elements.push(CompiledElement {
                        element,
                        alone,
                        wrapper,
                        guard,
                    });
                }
                SyntaxItem::BeginGroup(guard) => {
                    if open.is_some() {
                        return Err(ConfigurationError::UnbalancedGroup(
                            "groups cannot be nested",
                        ));
                    }
                    check_guard(&guard)?;
                    guards.push(guard);
                    open = Some((guards.len() - 1, Vec::new()));
                }
                SyntaxItem::EndGroup => {
                    let Some((guard, fragments)) = open.take() else {
                        return Err(ConfigurationError::UnbalancedGroup(
                            "end_group without begin_group",
                        ));
                    };
                    if !fragments.is_empty() {
                        alternatives.push(format!(
                            "{}(?:{})",
                            guards[guard].prefix_pattern(),
                            fragments.join("|")
                        ));
                    }
                }
            }
        }
        if open.is_some() {
            return Err(ConfigurationError::UnbalancedGroup(
                "begin_group without end_group",
            ));
        }

        let regex = if alternatives.is_empty() {
            None
        } else {
            let regex = Regex::new(&alternatives.join("|")).map_err(|source| {
                ConfigurationError::InvalidPattern {
                    element: "compiled alternation".to_string(),
                    source,
                }
            })?;
            let expected = next_group - 1;
            let actual = regex.captures_len() - 1;
            if actual != expected {
                return Err(ConfigurationError::CompiledGroupMismatch { expected, actual });
            }
            Some(regex)
        };

        log::debug!(
            "compiled {} elements in {} guard groups, {published} published groups",
            elements.len(),
            guards.len()
        );
        Ok(PatternBasedSyntax {
            regex,
            elements,
            guards,
            published,
        })
    }
}

fn check_element(element: &dyn PatternElement) -> Result<(), ConfigurationError> {
    let regex =
        Regex::new(&element.pattern()).map_err(|source| ConfigurationError::InvalidPattern {
            element: element.name(),
            source,
        })?;
    let actual = regex.captures_len() - 1;
    if actual != element.group_count() {
        return Err(ConfigurationError::GroupCountMismatch {
            element: element.name(),
            declared: element.group_count(),
            actual,
        });
    }
    Ok(())
}

fn check_guard(guard: &Guard) -> Result<(), ConfigurationError> {
    let Some(prefix) = &guard.prefix else {
        return Ok(());
    };
    let regex = Regex::new(prefix).map_err(|source| ConfigurationError::InvalidGuard {
        prefix: prefix.clone(),
        source,
    })?;
    let actual = regex.captures_len() - 1;
    if actual != 0 {
        return Err(ConfigurationError::GroupCountMismatch {
            element: format!("guard prefix {prefix:?}"),
            declared: 0,
            actual,
        });
    }
    Ok(())
}

struct CompiledElement {
    element: Box<dyn PatternElement>,
    /// Guard prefix and fragment without the rest of the alternation; the
    /// fragment's wrapper is group 1.
    alone: Regex,
    wrapper: usize,
    guard: Option<usize>,
}

/// A compiled, immutable alternation of pattern elements.
pub struct PatternBasedSyntax {
    regex: Option<Regex>,
    elements: Vec<CompiledElement>,
    guards: Vec<Guard>,
    published: usize,
}

impl fmt::Debug for PatternBasedSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBasedSyntax")
            .field("elements", &self.elements.len())
            .field("guards", &self.guards.len())
            .field("published", &self.published)
            .finish()
    }
}

impl PatternBasedSyntax {
    /// A syntax that never matches.
    pub fn empty() -> Self {
        Self {
            regex: None,
            elements: Vec::new(),
            guards: Vec::new(),
            published: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> &dyn PatternElement {
        self.elements[index].element.as_ref()
    }

    /// Sum of the elements' declared group counts.
    pub fn group_count(&self) -> usize {
        self.published
    }

    /// Group offset of each element's wrapper group in the compiled pattern.
    pub fn group_offsets(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.wrapper).collect()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// First accepted element match in `line[range]` at or after `from`.
    ///
    /// `^` in element patterns matches at `range.start`. When the element
    /// the alternation picked is empty, fails its guard's suffix or is
    /// rejected, the other elements are tried in order at the same position;
    /// if none is accepted the search resumes one character further on.
    pub fn find<'h>(
        &self,
        line: &'h str,
        range: Range<usize>,
        from: usize,
    ) -> Option<ElementMatch<'h>> {
        let regex = self.regex.as_ref()?;
        let hay = line.get(range.clone())?;
        let mut pos = from.checked_sub(range.start)?;
        while pos <= hay.len() {
            let captures = regex.captures_at(hay, pos)?;
            let index = self
                .elements
                .iter()
                .position(|e| captures.get(e.wrapper).is_some())?;
            let compiled = &self.elements[index];
            let at = captures.get(0).map_or(pos, |m| m.start());
            let start = captures.get(compiled.wrapper).map_or(at, |m| m.start());
            let found = ElementMatch::new(hay, range.start, captures, compiled.wrapper, index);
            if self.is_accepted(compiled, &found) {
                return Some(found);
            }
            if let Some(found) = self.find_other(hay, range.start, at, index) {
                return Some(found);
            }
            pos = start + hay[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }

    /// An accepted match of any element but `skip` starting exactly at `at`.
    fn find_other<'h>(
        &self,
        hay: &'h str,
        base: usize,
        at: usize,
        skip: usize,
    ) -> Option<ElementMatch<'h>> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != skip)
            .find_map(|(index, compiled)| {
                let captures = compiled.alone.captures_at(hay, at)?;
                if captures.get(0)?.start() != at {
                    return None;
                }
                let found = ElementMatch::new(hay, base, captures, 1, index);
                self.is_accepted(compiled, &found).then_some(found)
            })
    }

    fn is_accepted(&self, compiled: &CompiledElement, found: &ElementMatch<'_>) -> bool {
        let guarded = compiled
            .guard
            .is_none_or(|g| self.guards[g].accepts_suffix(found.char_after()));
        !found.is_empty() && guarded && compiled.element.accepts(found)
    }
}
