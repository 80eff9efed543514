pub mod container;
pub mod fenced;
pub mod heading;
pub mod indented;
pub mod list;
pub mod literal;
pub mod paragraph;
pub mod rule;
pub mod table_of_contents;

pub use container::{ContainerAttributes, DelimitedContainer, PrefixedContainer};
pub use fenced::{FenceClose, FenceContent, FencedBlock};
pub use heading::{HeadingBlock, digit_level, emit_heading, marker_length};
pub use indented::{IndentedBlock, IndentedContent};
pub use list::{ListBlock, ListLine, ListLineParser, ListNesting, ListStack};
pub use literal::{LiteralBlock, LiteralContent};
pub use paragraph::{LineJoin, ParagraphBlock, PrefixParser};
pub use rule::HorizontalRuleBlock;
pub use table_of_contents::TableOfContentsBlock;
