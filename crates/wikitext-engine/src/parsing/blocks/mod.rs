pub mod kinds;
pub mod machine;
pub mod types;

pub use kinds::{
    ContainerAttributes, DelimitedContainer, FenceClose, FenceContent, FencedBlock, HeadingBlock,
    HorizontalRuleBlock, IndentedBlock, IndentedContent, LineJoin, ListBlock, ListLine,
    ListLineParser, ListNesting, ListStack, LiteralBlock, LiteralContent, ParagraphBlock,
    PrefixParser, PrefixedContainer, TableOfContentsBlock, digit_level, emit_heading,
    marker_length,
};
pub use machine::BlockMachine;
pub use types::{Block, BlockKind, Consumed};
