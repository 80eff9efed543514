use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::outline::OutlineItem;
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// A single-line macro that expands to a list of links to the document's
/// headings.
///
/// `pattern` must match the whole line; its first capture group, if any,
/// holds options such as `maxLevel=2` (also `levels=2`), separated by `|`,
/// `,` or spaces. Nothing is emitted during the outline pass or when
/// generated content is filtered.
#[derive(Debug)]
pub struct TableOfContentsBlock {
    pattern: &'static Regex,
    max_level: u8,
    closed: bool,
}

impl TableOfContentsBlock {
    pub fn new(pattern: &'static Regex) -> Self {
        Self {
            pattern,
            max_level: 6,
            closed: false,
        }
    }

    fn parse_options(&mut self, options: &str) {
        for option in options.split(['|', ',', ' ']) {
            let Some((key, value)) = option.split_once('=') else {
                continue;
            };
            if matches!(key.trim(), "maxLevel" | "levels")
                && let Ok(level) = value.trim().parse::<u8>()
            {
                self.max_level = level.clamp(1, 6);
            }
        }
    }

    fn emit_items(&self, cx: &mut ParseContext<'_>, items: &[OutlineItem], top: bool) {
        let visible: Vec<&OutlineItem> = items
            .iter()
            .filter(|item| item.level <= self.max_level)
            .collect();
        if visible.is_empty() {
            return;
        }
        let attributes = if top {
            Attributes::new().with_class("toc")
        } else {
            Attributes::new()
        };
        cx.begin_block(BlockType::NumericList, &attributes);
        for item in visible {
            cx.begin_block(BlockType::ListItem, &Attributes::new());
            if let Some(id) = &item.id {
                cx.link(&Attributes::new(), Some(&format!("#{id}")), &item.label);
            }
            self.emit_items(cx, &item.children, false);
            cx.end_block();
        }
        cx.end_block();
    }
}

impl Block for TableOfContentsBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::TableOfContents
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.pattern.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        if let Some(options) = self.pattern.captures(line).and_then(|c| c.get(1)) {
            self.parse_options(options.as_str());
        }
        if cx.is_generative() {
            cx.set_segment(0, line.len());
            let outline = cx.outline();
            self.emit_items(cx, &outline.children, true);
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
