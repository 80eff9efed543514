use serde::Serialize;

use super::text::Span;

/// Source position of the event being emitted.
///
/// Character offsets are line-relative byte offsets; the document-level
/// accessors add the line's document offset. For every `characters` event the
/// text length equals `document_segment_end_offset() - document_offset()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Locator {
    /// 1-based line number, 0 before the first line.
    pub line_number: usize,
    /// Document offset of the first byte of the current line.
    pub line_document_offset: usize,
    /// Length of the current line, without its terminator.
    pub line_length: usize,
    /// Start of the current segment, relative to the line.
    pub line_character_offset: usize,
    /// End (exclusive) of the current segment, relative to the line.
    pub line_segment_end_offset: usize,
}

impl Locator {
    #[must_use]
    pub fn document_offset(&self) -> usize {
        self.line_document_offset + self.line_character_offset
    }

    #[must_use]
    pub fn document_segment_end_offset(&self) -> usize {
        self.line_document_offset + self.line_segment_end_offset
    }

    #[must_use]
    pub fn segment_len(&self) -> usize {
        self.line_segment_end_offset
            .saturating_sub(self.line_character_offset)
    }

    /// Document span of the current segment.
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.document_offset(), self.document_segment_end_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_offsets_add_line_start() {
        let locator = Locator {
            line_number: 2,
            line_document_offset: 10,
            line_length: 8,
            line_character_offset: 2,
            line_segment_end_offset: 6,
        };
        assert_eq!(locator.document_offset(), 12);
        assert_eq!(locator.document_segment_end_offset(), 16);
        assert_eq!(locator.segment_len(), 4);
        assert_eq!(locator.span(), Span::new(12, 16));
    }
}
