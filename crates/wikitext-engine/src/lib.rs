//! Line-oriented lightweight markup to document events.
//!
//! One engine, many dialects: a [`Dialect`] lists blocks, phrase modifiers
//! and tokens, and [`MarkupParser`] turns markup into calls on a
//! [`DocumentBuilder`].

pub mod builder;
pub mod dialect;
pub mod dialects;
pub mod error;
pub mod outline;
pub mod parsing;
pub mod validation;

// Re-export key types for easier usage
pub use builder::{
    Attributes, BlockType, DocumentBuilder, DocumentEvent, EventRecorder, NoOpBuilder, SpanType,
};
pub use dialect::{Dialect, DialectBuilder, MarkupOptions};
pub use dialects::DialectName;
pub use error::ConfigurationError;
pub use outline::{OutlineItem, OutlineParser};
pub use parsing::{Locator, MarkupParser};
pub use validation::{MarkupValidator, Severity, ValidationProblem, ValidationRule};
