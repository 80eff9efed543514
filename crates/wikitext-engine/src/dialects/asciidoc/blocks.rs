use std::sync::LazyLock;

use regex::Regex;

use crate::builder::BlockType;
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed, ListLine};

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.([^.\s].*?)\s*$").expect("Invalid AsciiDoc title regex"));
static ATTRIBUTE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\[\]]*)\]\s*$").expect("Invalid AsciiDoc attribute list regex")
});
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\*{1,5}|-|\.{1,5})\s+\S").expect("Invalid AsciiDoc list regex")
});

/// A `.Title` or `[style,language]` line. It emits nothing and leaves its
/// value in the content state for the next listing block.
#[derive(Debug, Default)]
pub struct MetadataBlock {
    closed: bool,
}

impl MetadataBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for MetadataBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Metadata
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && (TITLE.is_match(line) || ATTRIBUTE_LIST.is_match(line))
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        if let Some(title) = TITLE.captures(line).and_then(|c| c.get(1)) {
            cx.state_mut().set_block_title(title.as_str());
        } else if let Some(list) = ATTRIBUTE_LIST.captures(line).and_then(|c| c.get(1)) {
            cx.state_mut().set_block_attributes(list.as_str());
        }
        self.closed = true;
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}

/// `// text`, dropped from the output. Four or more slashes open a comment
/// block instead.
#[derive(Debug, Default)]
pub struct LineCommentBlock {
    closed: bool,
}

impl LineCommentBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Block for LineCommentBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Comment
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && line.starts_with("//") && !line.starts_with("////")
    }

    fn process_line_content(
        &mut self,
        _cx: &mut ParseContext<'_>,
        _line: &str,
        _offset: usize,
    ) -> Consumed {
        self.closed = true;
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, _cx: &mut ParseContext<'_>) {
        self.closed = true;
    }
}

/// `*`/`-` bullets and `.` numbers. The number of marker characters is the
/// nesting depth, so `**` and `..` both sit one level below `*`.
pub fn list_line(line: &str) -> Option<ListLine> {
    let captures = LIST_ITEM.captures(line)?;
    let marker = captures.get(1)?;
    let kind = if marker.as_str().starts_with('.') {
        BlockType::NumericList
    } else {
        BlockType::BulletedList
    };
    let rest = &line[marker.end()..];
    let content = marker.end() + (rest.len() - rest.trim_start().len());
    let mut item = ListLine::new(vec![kind], BlockType::ListItem, content);
    item.indent = marker.as_str().len();
    Some(item)
}
