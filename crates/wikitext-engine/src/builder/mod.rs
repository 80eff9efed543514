//! The document event protocol.
//!
//! The engine never produces output itself. Every structure it recognises is
//! reported to a [`DocumentBuilder`] as a stream of balanced begin/end calls
//! with character data in between. Renderers, outline collectors and
//! validators are all just builders.
//!
//! Before each call the engine hands the builder the current [`Locator`], so
//! an implementation can map any event back to the exact source text it came
//! from.

pub mod attributes;
pub mod event;
pub mod types;

pub use attributes::{
    AttributeDetail, Attributes, ImageAttributes, LinkAttributes, ListAttributes,
    QuoteAttributes, TableAttributes, TableCellAttributes,
};
pub use event::{DocumentEvent, EventRecorder, NoOpBuilder, RecordedEvent};
pub use types::{BlockType, SpanType};

use crate::parsing::Locator;

/// Sink for document events.
///
/// A conformant engine drives every `begin_*` with exactly one matching
/// `end_*`, also when the input ends in the middle of a structure.
pub trait DocumentBuilder {
    /// Source position of the event about to be delivered.
    fn set_locator(&mut self, _locator: &Locator) {}

    fn begin_document(&mut self);
    fn end_document(&mut self);

    fn begin_block(&mut self, kind: BlockType, attributes: &Attributes);
    fn end_block(&mut self);

    fn begin_span(&mut self, kind: SpanType, attributes: &Attributes);
    fn end_span(&mut self);

    fn begin_heading(&mut self, level: u8, attributes: &Attributes);
    fn end_heading(&mut self);

    /// Text that a renderer must escape.
    fn characters(&mut self, text: &str);
    /// Text passed through to the output verbatim (raw HTML and friends).
    fn characters_unescaped(&mut self, text: &str);
    /// A named or numeric entity such as `amp` or `#8482`.
    fn entity_reference(&mut self, entity: &str);

    fn image(&mut self, attributes: &Attributes, url: &str);
    fn image_link(
        &mut self,
        link_attributes: &Attributes,
        image_attributes: &Attributes,
        href: &str,
        image_url: &str,
    );
    /// A link. `href == None` together with an id encodes an anchor target.
    fn link(&mut self, attributes: &Attributes, href: Option<&str>, text: &str);
    fn acronym(&mut self, text: &str, definition: &str);
    fn line_break(&mut self);
    fn horizontal_rule(&mut self);
}
