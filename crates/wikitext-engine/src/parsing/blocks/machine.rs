use super::types::{Block, BlockKind, Consumed};
use crate::parsing::ParseContext;

/// Feeds lines to blocks: the open block first, then the first block whose
/// `can_start` accepts the line, then a paragraph.
///
/// Used for the document itself and inside container blocks (quotes,
/// panels), which run their own machine over the part of the line they do
/// not claim.
#[derive(Debug, Default)]
pub struct BlockMachine {
    current: Option<Box<dyn Block>>,
}

impl BlockMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_kind(&self) -> Option<BlockKind> {
        self.current.as_ref().map(|block| block.kind())
    }

    /// Processes `line` from `offset` to its end.
    pub fn push_line(&mut self, cx: &mut ParseContext<'_>, line: &str, mut offset: usize) {
        loop {
            let fresh = self.current.is_none();
            if fresh {
                if offset > 0 && offset >= line.len() {
                    return;
                }
                match Self::open(cx, line, offset) {
                    Some(block) => self.current = Some(block),
                    None => return,
                }
            }
            let Some(block) = self.current.as_mut() else {
                return;
            };

            if !fresh && block.kind() == BlockKind::Paragraph && cx.breaks_paragraph(line, offset)
            {
                block.close(cx);
                self.current = None;
                continue;
            }

            let consumed = block.process_line_content(cx, line, offset);
            let closed = block.is_closed();
            if closed {
                self.current = None;
            }
            match consumed {
                Consumed::Line => return,
                Consumed::UpTo(next) if next <= offset && (fresh || !closed) => {
                    log::warn!(
                        "block made no progress at line {} offset {offset}",
                        cx.line().number
                    );
                    return;
                }
                Consumed::UpTo(next) => offset = next,
            }
        }
    }

    /// End of input: closes whatever is still open.
    pub fn finish(&mut self, cx: &mut ParseContext<'_>) {
        if let Some(mut block) = self.current.take()
            && !block.is_closed()
        {
            block.close(cx);
        }
    }

    fn open(cx: &mut ParseContext<'_>, line: &str, offset: usize) -> Option<Box<dyn Block>> {
        if let Some(block) = cx.start_block(line, offset) {
            return Some(block);
        }
        let rest = line.get(offset..).unwrap_or("");
        if rest.trim().is_empty() {
            None
        } else {
            Some(cx.new_paragraph())
        }
    }
}
