//! Inline markup: phrase modifiers and tokens.
//!
//! Dialects describe inline syntax as an ordered list of [`PatternElement`]s.
//! A [`SyntaxBuilder`] compiles them into one alternation so a line is
//! scanned once per match rather than once per element.

pub mod element;
pub mod kinds;
pub mod syntax;

pub use element::{ElementKind, ElementMatch, PatternElement, is_word_char};
pub use kinds::*;
pub use syntax::{Guard, PatternBasedSyntax, SuffixGuard, SyntaxBuilder};
