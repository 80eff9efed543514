pub mod lines;
pub mod span;

pub use lines::{Line, LineSequence};
pub use span::Span;
