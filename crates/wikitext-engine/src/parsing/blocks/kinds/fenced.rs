use regex::Regex;

use crate::builder::{Attributes, BlockType};
use crate::parsing::ParseContext;
use crate::parsing::blocks::{Block, BlockKind, Consumed};

/// Which lines end a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceClose {
    /// Exactly the opening fence.
    Exact,
    /// The fence character repeated at least as often as in the opening.
    AtLeast,
}

/// What a fenced block emits for its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceContent {
    Code,
    Preformatted,
    /// Nothing at all.
    Comment,
    /// Lines passed through unescaped, outside any block.
    Raw,
}

/// Lines between an opening fence and its closing fence, taken literally.
///
/// Group 1 of `open` is the fence, group 2 (optional) an info string whose
/// first word is the language. A line that only looks like a closing fence,
/// such as a shorter run of the fence character, is content; at end of
/// input the block is closed as it stands.
#[derive(Debug)]
pub struct FencedBlock {
    open: &'static Regex,
    close: FenceClose,
    content: FenceContent,
    language_class: Option<&'static str>,
    metadata: bool,
    fence: String,
    indent: usize,
    lines: usize,
    started: bool,
    closed: bool,
}

impl FencedBlock {
    pub fn new(open: &'static Regex, close: FenceClose, content: FenceContent) -> Self {
        Self {
            open,
            close,
            content,
            language_class: None,
            metadata: false,
            fence: String::new(),
            indent: 0,
            lines: 0,
            started: false,
            closed: false,
        }
    }

    /// Also sets the class `{prefix}{language}` when a language is given.
    #[must_use]
    pub fn with_language_class(mut self, prefix: &'static str) -> Self {
        self.language_class = Some(prefix);
        self
    }

    /// Takes a pending title and `[style,language]` attribute line from the
    /// content state.
    #[must_use]
    pub fn with_metadata(mut self) -> Self {
        self.metadata = true;
        self
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        match self.close {
            FenceClose::Exact => trimmed == self.fence,
            FenceClose::AtLeast => {
                let Some(fence_char) = self.fence.chars().next() else {
                    return false;
                };
                trimmed.len() >= self.fence.len() && trimmed.chars().all(|c| c == fence_char)
            }
        }
    }

    fn start(&mut self, cx: &mut ParseContext<'_>, line: &str) {
        let mut attributes = Attributes::new();
        if let Some(captures) = self.open.captures(line) {
            if let Some(fence) = captures.get(1) {
                self.fence = fence.as_str().to_string();
                self.indent = fence.start();
            }
            if let Some(language) = captures
                .get(2)
                .and_then(|info| info.as_str().split_whitespace().next())
            {
                attributes.language = Some(language.to_string());
            }
        }
        if self.metadata {
            if let Some(title) = cx.state_mut().take_block_title() {
                attributes.title = Some(title);
            }
            if let Some(list) = cx.state_mut().take_block_attributes() {
                let mut parts = list.split(',').map(str::trim);
                let style = parts.next().unwrap_or("");
                if let Some(language) = parts.next().filter(|l| !l.is_empty()) {
                    attributes.language = Some(language.to_string());
                } else if style != "source" && !style.is_empty() {
                    attributes.append_class(style);
                }
            }
        }
        if let (Some(prefix), Some(language)) = (self.language_class, attributes.language.clone()) {
            attributes.append_class(&format!("{prefix}{language}"));
        }
        cx.set_segment(0, line.len());
        match self.content {
            FenceContent::Code => cx.begin_block(BlockType::Code, &attributes),
            FenceContent::Preformatted => cx.begin_block(BlockType::Preformatted, &attributes),
            FenceContent::Comment | FenceContent::Raw => {}
        }
        self.started = true;
    }

    fn emit_line(&mut self, cx: &mut ParseContext<'_>, line: &str) {
        let leading = line.len() - line.trim_start_matches(' ').len();
        let start = leading.min(self.indent);
        match self.content {
            FenceContent::Comment => {}
            FenceContent::Raw => {
                if self.lines > 0 {
                    cx.previous_line_terminator();
                }
                cx.set_segment(start, line.len());
                if !line[start..].is_empty() {
                    cx.characters_unescaped(&line[start..]);
                }
            }
            FenceContent::Code | FenceContent::Preformatted => {
                if self.lines > 0 {
                    cx.previous_line_terminator();
                }
                cx.characters(start..line.len());
            }
        }
        self.lines += 1;
    }
}

impl Block for FencedBlock {
    fn kind(&self) -> BlockKind {
        match self.content {
            FenceContent::Comment => BlockKind::Comment,
            FenceContent::Raw => BlockKind::RawHtml,
            FenceContent::Preformatted => BlockKind::Preformatted,
            FenceContent::Code => BlockKind::Code,
        }
    }

    fn can_start(&mut self, line: &str, offset: usize) -> bool {
        offset == 0 && self.open.is_match(line)
    }

    fn process_line_content(
        &mut self,
        cx: &mut ParseContext<'_>,
        line: &str,
        _offset: usize,
    ) -> Consumed {
        if !self.started {
            self.start(cx, line);
            return Consumed::Line;
        }
        if self.closes(line) {
            cx.set_segment(0, line.len());
            self.close(cx);
            return Consumed::Line;
        }
        self.emit_line(cx, line);
        Consumed::Line
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self, cx: &mut ParseContext<'_>) {
        if self.closed {
            return;
        }
        if self.started && matches!(self.content, FenceContent::Code | FenceContent::Preformatted) {
            cx.end_block();
        }
        self.closed = true;
    }
}
