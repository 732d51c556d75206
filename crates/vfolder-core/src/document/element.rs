//! Minimal owned XML element tree.
//!
//! Only elements and their attributes are kept; text, comments and
//! processing instructions are dropped on parse. Serialization writes an
//! indented document with an XML declaration.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{CoreError, CoreResult};

/// An XML element with ordered attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name`, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    fn matches(&self, tag: &str, key_attr: &str, key: &str) -> bool {
        self.tag == tag && self.attribute(key_attr) == Some(key)
    }

    /// First element in document order, this one included, whose tag is
    /// `tag` and whose `key_attr` equals `key` exactly.
    pub fn find_mut(&mut self, tag: &str, key_attr: &str, key: &str) -> Option<&mut Element> {
        if self.matches(tag, key_attr, key) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(tag, key_attr, key))
    }

    /// Detaches the first matching descendant, in document order, from its
    /// parent.
    pub fn remove_descendant(&mut self, tag: &str, key_attr: &str, key: &str) -> Option<Element> {
        for pos in 0..self.children.len() {
            if self.children[pos].matches(tag, key_attr, key) {
                return Some(self.children.remove(pos));
            }
            if let Some(removed) = self.children[pos].remove_descendant(tag, key_attr, key) {
                return Some(removed);
            }
        }
        None
    }

    /// Parses a document and returns its document element.
    pub fn parse(xml: &str) -> CoreResult<Element> {
        let mut reader = Reader::from_str(xml);
        let mut open: Vec<Element> = Vec::new();
        let mut document: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!(
                    "xml error at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;
            match event {
                Event::Start(start) => open.push(element_from(&start)?),
                Event::Empty(start) => {
                    let element = element_from(&start)?;
                    attach(&mut open, &mut document, element)?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| malformed("unexpected closing tag".to_string()))?;
                    attach(&mut open, &mut document, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(malformed(format!("unclosed element <{}>", unclosed.tag)));
        }
        document.ok_or_else(|| malformed("document has no root element".to_string()))
    }

    /// Serializes this element as a complete, indented XML document.
    pub fn to_document_string(&self) -> CoreResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
        self.write(&mut writer)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| CoreError::Io(std::io::Error::other(e)))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> CoreResult<()> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(write_error);
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(write_error)
    }
}

fn element_from(start: &BytesStart<'_>) -> CoreResult<Element> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| malformed(format!("element name is not utf-8: {e}")))?
        .to_string();
    let mut element = Element::new(tag);
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| malformed(format!("bad attribute on <{}>: {e}", element.tag)))?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value: Cow<'_, str> = attribute
            .unescape_value()
            .map_err(|e| malformed(format!("bad value for `{name}`: {e}")))?;
        element.attributes.push((name, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    open: &mut [Element],
    document: &mut Option<Element>,
    element: Element,
) -> CoreResult<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if document.is_none() => *document = Some(element),
        None => return Err(malformed("more than one document element".to_string())),
    }
    Ok(())
}

fn malformed(reason: String) -> CoreError {
    CoreError::MalformedDocument(reason)
}

fn write_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::Io(std::io::Error::other(e.to_string()))
}
