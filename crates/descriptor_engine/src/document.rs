//! Owned element tree for descriptor documents.
//!
//! The substitution engine rewrites attribute values and text nodes in
//! place and hands whole subtrees to an external unmarshaller, so the
//! descriptor is assembled from the quick-xml event stream into a small
//! mutable tree instead of being processed as a stream.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{DescriptorError, DescriptorResult};

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

/// A single node in the descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and child nodes, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Attribute name/value pairs in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets or replaces the named attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(attr_name, _)| attr_name == name)
        {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Returns all direct child elements with the given name, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |child| child.name == name)
    }

    /// Returns all direct child elements, in order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenates the direct text content of this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(text) = node {
                out.push_str(text);
            }
        }
        out
    }

    /// Renders this element as a generic JSON value: attributes become
    /// `@name` entries, non-blank direct text becomes `#text`, repeated
    /// child element names become arrays, and a leaf element with neither
    /// attributes nor children collapses to its trimmed text.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{map::Entry, Map, Value};

        let children: Vec<&Element> = self.child_elements().collect();
        let text = self.text();
        let trimmed = text.trim();
        if self.attributes.is_empty() && children.is_empty() {
            return Value::String(trimmed.to_string());
        }

        let mut map = Map::new();
        for (name, value) in &self.attributes {
            map.insert(format!("@{name}"), Value::String(value.clone()));
        }
        if !trimmed.is_empty() {
            map.insert("#text".to_string(), Value::String(trimmed.to_string()));
        }
        for child in children {
            let rendered = child.to_json();
            match map.entry(child.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(rendered);
                }
                Entry::Occupied(mut slot) => {
                    if let Value::Array(items) = slot.get_mut() {
                        items.push(rendered);
                    } else {
                        let first = slot.get().clone();
                        slot.insert(Value::Array(vec![first, rendered]));
                    }
                }
            }
        }
        Value::Object(map)
    }
}

/// Parses a descriptor document and returns its root element.
///
/// The input must be well-formed XML with a single root element;
/// processing instructions, comments and the XML declaration are
/// discarded.
pub fn parse_document(xml: &str) -> DescriptorResult<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => {
                let element = element_from_start(&start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| DescriptorError::Parse {
                    reason: "unexpected closing tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let data = text.unescape().map_err(parse_error)?.into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(data));
                }
            }
            Event::CData(cdata) => {
                let data = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DescriptorError::Parse {
            reason: "descriptor document ended with unclosed elements".to_string(),
        });
    }
    root.ok_or_else(|| DescriptorError::Parse {
        reason: "descriptor document has no root element".to_string(),
    })
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> DescriptorResult<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| DescriptorError::Parse {
            reason: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(parse_error)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> DescriptorResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(DescriptorError::Parse {
                    reason: "descriptor document has more than one root element".to_string(),
                });
            }
            *root = Some(element);
            Ok(())
        }
    }
}

fn parse_error(error: quick_xml::Error) -> DescriptorError {
    DescriptorError::Parse {
        reason: error.to_string(),
    }
}
