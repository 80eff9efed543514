use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenList {
    level: usize,
    kind: BlockType,
    item_open: bool,
}

/// Open list levels of a list block, innermost last.
///
/// Each incoming item line first repairs the stack to the level and list
/// type it implies: deeper levels open nested lists (inside an item of the
/// parent), shallower levels or a different type at the same level close
/// lists until the top matches.
#[derive(Debug, Default)]
pub struct ListStack {
    open: Vec<OpenList>,
}

impl ListStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Makes the innermost open list a `kind` list at `level` (1-based).
    ///
    /// `attributes` apply to a list opened at exactly `level`; intermediate
    /// levels are opened without attributes.
    pub fn adjust(
        &mut self,
        cx: &mut ParseContext<'_>,
        level: usize,
        kind: BlockType,
        attributes: &Attributes,
    ) {
        let level = level.max(1);
        loop {
            match self.open.last() {
                Some(top) if top.level == level && top.kind == kind => return,
                Some(top) if level > top.level => {
                    let next = top.level + 1;
                    self.ensure_item(cx);
                    self.push(cx, next, kind, level, attributes);
                }
                Some(_) => self.close_one(cx),
                None => self.push(cx, 1, kind, level, attributes),
            }
        }
    }

    /// Makes the open lists match `path`, outermost first.
    ///
    /// Used when every line spells out the type of each level, as with
    /// `*#` markers. The first level whose type differs is closed along with
    /// everything inside it.
    pub fn adjust_path(
        &mut self,
        cx: &mut ParseContext<'_>,
        path: &[BlockType],
        attributes: &Attributes,
    ) {
        let keep = self
            .open
            .iter()
            .zip(path)
            .take_while(|(open, kind)| open.kind == **kind)
            .count();
        while self.open.len() > keep {
            self.close_one(cx);
        }
        while self.open.len() < path.len() {
            let level = self.open.len() + 1;
            self.ensure_item(cx);
            self.push(cx, level, path[level - 1], path.len(), attributes);
        }
    }

    /// Ends the open item of the innermost list, if any, and opens a new one.
    pub fn open_item(
        &mut self,
        cx: &mut ParseContext<'_>,
        kind: BlockType,
        attributes: &Attributes,
    ) {
        if let Some(top) = self.open.last_mut() {
            if top.item_open {
                cx.end_block();
            }
            cx.begin_block(kind, attributes);
            top.item_open = true;
        }
    }

    /// Closes the innermost list and its open item.
    pub fn close_one(&mut self, cx: &mut ParseContext<'_>) {
        if let Some(top) = self.open.pop() {
            if top.item_open {
                cx.end_block();
            }
            cx.end_block();
        }
    }

    pub fn close_all(&mut self, cx: &mut ParseContext<'_>) {
        while !self.open.is_empty() {
            self.close_one(cx);
        }
    }

    fn ensure_item(&mut self, cx: &mut ParseContext<'_>) {
        if let Some(top) = self.open.last_mut()
            && !top.item_open
        {
            cx.begin_block(BlockType::ListItem, &Attributes::new());
            top.item_open = true;
        }
    }

    fn push(
        &mut self,
        cx: &mut ParseContext<'_>,
        level: usize,
        kind: BlockType,
        target: usize,
        attributes: &Attributes,
    ) {
        if level == target {
            cx.begin_block(kind, attributes);
        } else {
            cx.begin_block(kind, &Attributes::new());
        }
        self.open.push(OpenList {
            level,
            kind,
            item_open: false,
        });
    }
}

/// One list line as a dialect reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    /// List type of each level, outermost first; the length is the level.
    pub path: Vec<BlockType>,
    /// Block opened for the item itself.
    pub item: BlockType,
    /// Line-relative offset where the item text starts.
    pub content: usize,
    /// Attributes for a list opened by this line.
    pub attributes: Attributes,
    /// `(term_end, definition_start)` when a term and its definition share
    /// the line.
    pub definition: Option<(usize, usize)>,
    /// Columns of indentation before the marker, for indentation-based
    /// nesting.
    pub indent: usize,
}

impl ListLine {
    pub fn new(path: Vec<BlockType>, item: BlockType, content: usize) -> Self {
        Self {
            path,
            item,
            content,
            attributes: Attributes::new(),
            definition: None,
            indent: 0,
        }
    }

    pub fn level(&self) -> usize {
        self.path.len()
    }
}

pub type ListLineParser = fn(&str) -> Option<ListLine>;

/// How the type of outer levels is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNesting {
    /// Each line's markers name every level (`*#:`) and a line whose outer
    /// markers differ from the open lists starts over from that level.
    Markers,
    /// The marker count is the level and the last marker the type (`**#`);
    /// outer markers are not compared.
    Levels,
    /// Only the innermost type is known; the level follows from how far
    /// the marker is indented relative to the enclosing items.
    Indentation,
}

/// A list of consecutive item lines.
///
/// A blank line ends the list. Any other line that is not an item ends it
/// too, unless the list accepts continuation lines, which are appended to
/// the open item after a newline as long as they would not start a
/// paragraph-breaking block.
#[derive(Debug)]
pub struct ListBlock {
    parse: ListLineParser,
    nesting: ListNesting,
    continuation: bool,
    stack: ListStack,
    indents: Vec<usize>,
    lines: usize,
    closed: bool,
}

impl ListBlock {
    pub fn new(parse: ListLineParser, nesting: ListNesting) -> Self {
        Self {
            parse,
            nesting,
            continuation: false,
            stack: ListStack::new(),
            indents: Vec::new(),
            lines: 0,
            closed: false,
        }
    }

    #[must_use]
    pub fn with_continuation(mut self) -> Self {
        self.continuation = true;
        self
    }

    // deeper than the innermost item nests, shallower returns to the
    // closest enclosing level
    fn indentation_level(&mut self, indent: usize) -> usize {
        while self.indents.last().is_some_and(|&top| indent < top) {
            self.indents.pop();
        }
        if self.indents.last().is_none_or(|&top| indent > top) {
            self.indents.push(indent);
        }
        self.indents.len()
    }

    fn emit_item(&mut self, cx: &mut ParseContext<'_>, line: &str, item: ListLine) {
        cx.set_segment(0, line.len());
        match self.nesting {
            ListNesting::Markers => self.stack.adjust_path(cx, &item.path, &item.attributes),
            ListNesting::Levels => {
                let kind = item.path.last().copied().unwrap_or(BlockType::BulletedList);
                self.stack.adjust(cx, item.level(), kind, &item.attributes);
            }
            ListNesting::Indentation => {
                let kind = item.path.last().copied().unwrap_or(BlockType::BulletedList);
                let level = self.indentation_level(item.indent);
                self.stack.adjust(cx, level, kind, &item.attributes);
            }
        }
        match item.definition {
            Some((term_end, definition_start)) => {
                self.stack.open_item(cx, BlockType::DefinitionTerm, &Attributes::new());
                cx.emit_markup_line(item.content..term_end);
                cx.set_segment(term_end, definition_start);
                self.stack.open_item(cx, BlockType::DefinitionItem, &Attributes::new());
                cx.emit_markup_line(definition_start..line.len());
            }
            None => {
                self.stack.open_item(cx, item.item, &Attributes::new());
                cx.emit_markup_line(item.content..line.len());
            }
        }
    }
}

impl Block for ListBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::List
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && (self.parse)(line).is_some()
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        offset: usize,
    ) -> Consumed {
        if line.trim().is_empty() {
            self.close(cx);
            return Consumed::Line;
        }
        if offset == 0
            && let Some(item) = (self.parse)(line)
        {
            self.emit_item(cx, line, item);
            self.lines += 1;
            return Consumed::Line;
        }
        if self.continuation && self.lines > 0 && !cx.breaks_paragraph(line, offset) {
            cx.previous_line_terminator();
            let start = offset + (line[offset..].len() - line[offset..].trim_start().len());
            cx.emit_markup_line(start..line.len());
            return Consumed::Line;
        }
        self.close(cx);
        Consumed::UpTo(offset)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        self.stack.close_all(cx);
        self.closed = true;
    }
}
