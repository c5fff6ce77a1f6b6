//! Ordered XML document tree
//!
//! A small owned tree that preserves element order and attribute order
//! verbatim, so a parsed document can be mutated and serialized back out
//! with a stable, diff-able shape. Whitespace-only text between elements
//! is dropped on parse; the serializer re-indents. Text content inside
//! elements is kept as-is.

use std::io;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Indentation used by the pretty serializer (two spaces per level).
const INDENT_CHAR: u8 = b' ';
const INDENT_SIZE: usize = 2;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("failed to serialize XML: {message}")]
    Write { message: String },
}

/// One child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

/// An element with attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attribute key/value pairs in insertion order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one in place (position kept)
    /// or appending a new one.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Mutable child elements in document order.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> + '_ {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// First text node's content.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Replace the first text node's content, or append one.
    pub fn set_text(&mut self, value: &str) {
        for node in self.children.iter_mut() {
            if let XmlNode::Text(t) = node {
                *t = value.to_string();
                return;
            }
        }
        self.children.push(XmlNode::Text(value.to_string()));
    }

    /// Collect all descendant elements matching the predicate, depth-first.
    /// The element itself is not tested.
    pub fn collect_descendants(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_into(pred, &mut found);
        found
    }

    fn collect_into<'s>(&'s self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'s Element>) {
        for child in self.child_elements() {
            if pred(child) {
                found.push(child);
            }
            child.collect_into(pred, found);
        }
    }
}

/// A parsed XML document. The declaration is not retained; serialization
/// always emits a standard UTF-8 declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

/// Parse a document from a string, preserving element, child, and
/// attribute order. Whitespace-only text nodes are dropped.
pub fn parse(input: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Err(e) => {
                return Err(XmlError::Malformed {
                    position: reader.buffer_position(),
                    message: e.to_string(),
                })
            }
            Ok(Event::Start(e)) => {
                let el = element_from_start(&e, position)?;
                stack.push(el);
            }
            Ok(Event::Empty(e)) => {
                let el = element_from_start(&e, position)?;
                attach(&mut stack, &mut root, el, position)?;
            }
            Ok(Event::End(_)) => {
                let el = stack.pop().ok_or_else(|| XmlError::Malformed {
                    position,
                    message: "closing tag without matching opening tag".to_string(),
                })?;
                attach(&mut stack, &mut root, el, position)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| XmlError::Malformed {
                    position,
                    message: err.to_string(),
                })?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                } else if !text.trim().is_empty() {
                    return Err(XmlError::Malformed {
                        position,
                        message: "text content outside of root element".to_string(),
                    });
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.children.push(XmlNode::CData(text));
                }
            }
            Ok(Event::Comment(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    parent.children.push(XmlNode::Comment(text));
                }
            }
            Ok(Event::Eof) => break,
            // Declaration, doctype, processing instructions
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Malformed {
            position: reader.buffer_position(),
            message: format!("unclosed element: {}", stack[stack.len() - 1].name),
        });
    }

    root.map(|root| Document { root }).ok_or(XmlError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::Malformed {
            position,
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Malformed {
                position,
                message: err.to_string(),
            })?
            .into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    el: Element,
    position: u64,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(el));
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(XmlError::Malformed {
            position,
            message: "multiple root elements".to_string(),
        })
    }
}

/// Serialize a document as pretty-printed UTF-8 bytes with an XML
/// declaration. Elements whose children are only text stay on one line.
pub fn to_pretty_bytes(doc: &Document) -> Result<Vec<u8>, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), INDENT_CHAR, INDENT_SIZE);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    write_element(&mut writer, &doc.root)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, el: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_err);
    }

    writer.write_event(Event::Start(start)).map_err(write_err)?;
    for child in &el.children {
        match child {
            XmlNode::Element(child_el) => write_element(writer, child_el)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_err)?,
            XmlNode::Comment(t) => writer
                .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
                .map_err(write_err)?,
            XmlNode::CData(t) => writer
                .write_event(Event::CData(BytesCData::new(t.as_str())))
                .map_err(write_err)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(write_err)
}

fn write_err(e: impl std::fmt::Display) -> XmlError {
    XmlError::Write {
        message: e.to_string(),
    }
}
