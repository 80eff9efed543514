use std::fmt;

use serde::Serialize;

use super::{Attributes, BlockType, DocumentBuilder, SpanType};
use crate::parsing::Locator;

/// One builder call, captured as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DocumentEvent {
    BeginDocument,
    EndDocument,
    BeginBlock {
        kind: BlockType,
        attributes: Attributes,
    },
    EndBlock,
    BeginSpan {
        kind: SpanType,
        attributes: Attributes,
    },
    EndSpan,
    BeginHeading {
        level: u8,
        attributes: Attributes,
    },
    EndHeading,
    Characters(String),
    CharactersUnescaped(String),
    EntityReference(String),
    Image {
        attributes: Attributes,
        url: String,
    },
    ImageLink {
        link_attributes: Attributes,
        image_attributes: Attributes,
        href: String,
        image_url: String,
    },
    Link {
        attributes: Attributes,
        href: Option<String>,
        text: String,
    },
    Acronym {
        text: String,
        definition: String,
    },
    LineBreak,
    HorizontalRule,
}

impl DocumentEvent {
    /// Delivers this event to another builder.
    pub fn replay(&self, builder: &mut dyn DocumentBuilder) {
        match self {
            Self::BeginDocument => builder.begin_document(),
            Self::EndDocument => builder.end_document(),
            Self::BeginBlock { kind, attributes } => builder.begin_block(*kind, attributes),
            Self::EndBlock => builder.end_block(),
            Self::BeginSpan { kind, attributes } => builder.begin_span(*kind, attributes),
            Self::EndSpan => builder.end_span(),
            Self::BeginHeading { level, attributes } => builder.begin_heading(*level, attributes),
            Self::EndHeading => builder.end_heading(),
            Self::Characters(text) => builder.characters(text),
            Self::CharactersUnescaped(text) => builder.characters_unescaped(text),
            Self::EntityReference(entity) => builder.entity_reference(entity),
            Self::Image { attributes, url } => builder.image(attributes, url),
            Self::ImageLink {
                link_attributes,
                image_attributes,
                href,
                image_url,
            } => builder.image_link(link_attributes, image_attributes, href, image_url),
            Self::Link {
                attributes,
                href,
                text,
            } => builder.link(attributes, href.as_deref(), text),
            Self::Acronym { text, definition } => builder.acronym(text, definition),
            Self::LineBreak => builder.line_break(),
            Self::HorizontalRule => builder.horizontal_rule(),
        }
    }

    /// +1 for an opening event, -1 for a closing one, 0 otherwise.
    #[must_use]
    pub fn depth_change(&self) -> i32 {
        match self {
            Self::BeginDocument
            | Self::BeginBlock { .. }
            | Self::BeginSpan { .. }
            | Self::BeginHeading { .. } => 1,
            Self::EndDocument | Self::EndBlock | Self::EndSpan | Self::EndHeading => -1,
            _ => 0,
        }
    }
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &Attributes) -> fmt::Result {
    let mut parts = Vec::new();
    if let Some(id) = &attributes.id {
        parts.push(format!("id={id}"));
    }
    if let Some(class) = &attributes.css_class {
        parts.push(format!("class={class}"));
    }
    if let Some(style) = &attributes.css_style {
        parts.push(format!("style={style}"));
    }
    if let Some(language) = &attributes.language {
        parts.push(format!("lang={language}"));
    }
    if let Some(title) = &attributes.title {
        parts.push(format!("title={title}"));
    }
    if let Some(href) = attributes.href() {
        parts.push(format!("href={href}"));
    }
    if parts.is_empty() {
        Ok(())
    } else {
        write!(f, " [{}]", parts.join(", "))
    }
}

/// Compact one-line form used by snapshot tests.
impl fmt::Display for DocumentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginDocument => f.write_str("beginDocument"),
            Self::EndDocument => f.write_str("endDocument"),
            Self::BeginBlock { kind, attributes } => {
                write!(f, "beginBlock({kind})")?;
                write_attributes(f, attributes)
            }
            Self::EndBlock => f.write_str("endBlock"),
            Self::BeginSpan { kind, attributes } => {
                write!(f, "beginSpan({kind})")?;
                write_attributes(f, attributes)
            }
            Self::EndSpan => f.write_str("endSpan"),
            Self::BeginHeading { level, attributes } => {
                write!(f, "beginHeading({level})")?;
                write_attributes(f, attributes)
            }
            Self::EndHeading => f.write_str("endHeading"),
            Self::Characters(text) => write!(f, "characters({text:?})"),
            Self::CharactersUnescaped(text) => write!(f, "charactersUnescaped({text:?})"),
            Self::EntityReference(entity) => write!(f, "entityReference({entity})"),
            Self::Image { attributes, url } => {
                write!(f, "image({url})")?;
                write_attributes(f, attributes)
            }
            Self::ImageLink {
                href, image_url, ..
            } => write!(f, "imageLink({href}, {image_url})"),
            Self::Link {
                attributes,
                href,
                text,
            } => {
                match href {
                    Some(href) => write!(f, "link({href}, {text:?})")?,
                    None => write!(f, "link(-, {text:?})")?,
                }
                write_attributes(f, attributes)
            }
            Self::Acronym { text, definition } => write!(f, "acronym({text}, {definition:?})"),
            Self::LineBreak => f.write_str("lineBreak"),
            Self::HorizontalRule => f.write_str("horizontalRule"),
        }
    }
}

/// An event together with the locator that was current when it was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub event: DocumentEvent,
    pub locator: Locator,
}

/// Builder that keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventRecorder {
    locator: Locator,
    events: Vec<RecordedEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Events without their locators.
    pub fn events(&self) -> Vec<DocumentEvent> {
        self.events.iter().map(|r| r.event.clone()).collect()
    }

    pub fn into_events(self) -> Vec<DocumentEvent> {
        self.events.into_iter().map(|r| r.event).collect()
    }

    /// One event per line, in [`DocumentEvent`]'s display form.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(|r| r.event.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, event: DocumentEvent) {
        self.events.push(RecordedEvent {
            event,
            locator: self.locator,
        });
    }
}

impl DocumentBuilder for EventRecorder {
    fn set_locator(&mut self, locator: &Locator) {
        self.locator = *locator;
    }

    fn begin_document(&mut self) {
        self.push(DocumentEvent::BeginDocument);
    }

    fn end_document(&mut self) {
        self.push(DocumentEvent::EndDocument);
    }

    fn begin_block(&mut self, kind: BlockType, attributes: &Attributes) {
        self.push(DocumentEvent::BeginBlock {
            kind,
            attributes: attributes.clone(),
        });
    }

    fn end_block(&mut self) {
        self.push(DocumentEvent::EndBlock);
    }

    fn begin_span(&mut self, kind: SpanType, attributes: &Attributes) {
        self.push(DocumentEvent::BeginSpan {
            kind,
            attributes: attributes.clone(),
        });
    }

    fn end_span(&mut self) {
        self.push(DocumentEvent::EndSpan);
    }

    fn begin_heading(&mut self, level: u8, attributes: &Attributes) {
        self.push(DocumentEvent::BeginHeading {
            level,
            attributes: attributes.clone(),
        });
    }

    fn end_heading(&mut self) {
        self.push(DocumentEvent::EndHeading);
    }

    fn characters(&mut self, text: &str) {
        self.push(DocumentEvent::Characters(text.to_string()));
    }

    fn characters_unescaped(&mut self, text: &str) {
        self.push(DocumentEvent::CharactersUnescaped(text.to_string()));
    }

    fn entity_reference(&mut self, entity: &str) {
        self.push(DocumentEvent::EntityReference(entity.to_string()));
    }

    fn image(&mut self, attributes: &Attributes, url: &str) {
        self.push(DocumentEvent::Image {
            attributes: attributes.clone(),
            url: url.to_string(),
        });
    }

    fn image_link(
        &mut self,
        link_attributes: &Attributes,
        image_attributes: &Attributes,
        href: &str,
        image_url: &str,
    ) {
        self.push(DocumentEvent::ImageLink {
            link_attributes: link_attributes.clone(),
            image_attributes: image_attributes.clone(),
            href: href.to_string(),
            image_url: image_url.to_string(),
        });
    }

    fn link(&mut self, attributes: &Attributes, href: Option<&str>, text: &str) {
        self.push(DocumentEvent::Link {
            attributes: attributes.clone(),
            href: href.map(str::to_string),
            text: text.to_string(),
        });
    }

    fn acronym(&mut self, text: &str, definition: &str) {
        self.push(DocumentEvent::Acronym {
            text: text.to_string(),
            definition: definition.to_string(),
        });
    }

    fn line_break(&mut self) {
        self.push(DocumentEvent::LineBreak);
    }

    fn horizontal_rule(&mut self) {
        self.push(DocumentEvent::HorizontalRule);
    }
}

/// Discards everything. Used when only the side effects of a parse matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBuilder;

impl DocumentBuilder for NoOpBuilder {
    fn begin_document(&mut self) {}
    fn end_document(&mut self) {}
    fn begin_block(&mut self, _kind: BlockType, _attributes: &Attributes) {}
    fn end_block(&mut self) {}
    fn begin_span(&mut self, _kind: SpanType, _attributes: &Attributes) {}
    fn end_span(&mut self) {}
    fn begin_heading(&mut self, _level: u8, _attributes: &Attributes) {}
    fn end_heading(&mut self) {}
    fn characters(&mut self, _text: &str) {}
    fn characters_unescaped(&mut self, _text: &str) {}
    fn entity_reference(&mut self, _entity: &str) {}
    fn image(&mut self, _attributes: &Attributes, _url: &str) {}
    fn image_link(
        &mut self,
        _link_attributes: &Attributes,
        _image_attributes: &Attributes,
        _href: &str,
        _image_url: &str,
    ) {
    }
    fn link(&mut self, _attributes: &Attributes, _href: Option<&str>, _text: &str) {}
    fn acronym(&mut self, _text: &str, _definition: &str) {}
    fn line_break(&mut self) {}
    fn horizontal_rule(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replay_reproduces_recorded_events() {
        let mut first = EventRecorder::new();
        first.begin_block(BlockType::Paragraph, &Attributes::new());
        first.characters("hi");
        first.link(&Attributes::new().with_id("a"), None, "");
        first.end_block();

        let mut second = EventRecorder::new();
        for recorded in first.recorded() {
            recorded.event.replay(&mut second);
        }
        assert_eq!(first.events(), second.events());
    }

    #[test]
    fn display_form_is_compact() {
        let event = DocumentEvent::BeginBlock {
            kind: BlockType::Preformatted,
            attributes: Attributes::new().with_class("nowrap"),
        };
        assert_eq!(event.to_string(), "beginBlock(preformatted) [class=nowrap]");
        let anchor = DocumentEvent::Link {
            attributes: Attributes::new().with_id("x"),
            href: None,
            text: String::new(),
        };
        assert_eq!(anchor.to_string(), "link(-, \"\") [id=x]");
    }

    #[test]
    fn recorder_keeps_locator_per_event() {
        let mut recorder = EventRecorder::new();
        let locator = Locator {
            line_number: 3,
            line_document_offset: 10,
            line_length: 5,
            line_character_offset: 1,
            line_segment_end_offset: 4,
        };
        recorder.set_locator(&locator);
        recorder.characters("abc");
        assert_eq!(recorder.recorded()[0].locator, locator);
    }
}
