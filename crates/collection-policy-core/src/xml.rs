//! Owned XML element tree
//!
//! A small DOM sufficient for the collection-policy document: elements keep
//! their qualified name, resolved namespace URI and attributes in source
//! order (namespace declarations included), so a load/save cycle preserves
//! `xmlns` and `xsi:schemaLocation` verbatim. Whitespace-only text is
//! dropped on load and remaining text is trimmed.

use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use crate::errors::{PolicyError, Result};

/// Child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `collection_policy` or `x:term`
    pub name: String,
    /// Resolved namespace URI, `None` when the element is unqualified
    pub namespace: Option<String>,
    /// Attributes in document order as `(qualified name, value)`
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element in the given namespace with no attributes
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_string),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Name without its prefix
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// True when the element has the given local name and namespace
    pub fn is(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name() == local_name && self.namespace.as_deref() == namespace
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.child_elements()
            .find(|child| child.local_name() == local_name)
    }

    pub fn find_child_mut(&mut self, local_name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.local_name() == local_name => Some(element),
            _ => None,
        })
    }

    /// Concatenated text of direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Parse a complete document into its root element
///
/// # Errors
/// Returns `PolicyError::Parse` for malformed markup, unbound prefixes,
/// mismatched or unclosed tags, stray text outside the root, or a missing
/// or repeated root element.
pub fn parse(text: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| PolicyError::parse(format!("at byte {}: {}", position, e)))?;
        let namespace = bound_namespace(resolved);

        match event {
            Event::Start(start) => {
                let element = open_element(&reader, &start, namespace)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, &start, namespace)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| PolicyError::parse("closing tag without opening tag"))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(content) => {
                let value = content.unescape()?.into_owned();
                push_text(value, &mut stack)?;
            }
            Event::CData(content) => {
                let value = String::from_utf8(content.into_inner().into_owned())
                    .map_err(|e| PolicyError::parse(format!("CDATA is not UTF-8: {}", e)))?;
                push_text(value, &mut stack)?;
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(PolicyError::parse(format!(
            "unexpected end of input: element <{}> is not closed",
            open.name
        )));
    }

    root.ok_or_else(|| PolicyError::parse("document has no root element"))
}

/// Namespace of a resolved name, or the undeclared prefix on failure
fn bound_namespace(resolved: ResolveResult<'_>) -> std::result::Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(String::from_utf8_lossy(&prefix).into_owned()),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    namespace: std::result::Result<Option<String>, String>,
) -> Result<Element> {
    let name = utf8(start.name().as_ref())?;
    let namespace = namespace.map_err(|prefix| {
        PolicyError::parse(format!(
            "element <{}> uses undeclared prefix '{}'",
            name, prefix
        ))
    })?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?;
        if key.contains(':') && !is_reserved_attribute(&key) {
            let (resolved, _) = reader.resolve_attribute(attr.key);
            if let ResolveResult::Unknown(prefix) = resolved {
                return Err(PolicyError::parse(format!(
                    "attribute '{}' on <{}> uses undeclared prefix '{}'",
                    key,
                    name,
                    String::from_utf8_lossy(&prefix)
                )));
            }
        }
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

/// `xmlns`, `xmlns:*` and `xml:*` are bound without a declaration
fn is_reserved_attribute(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:")
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(PolicyError::parse(format!(
            "second root element <{}>",
            element.name
        ))),
    }
}

fn push_text(value: String, stack: &mut [Element]) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(value));
            Ok(())
        }
        None => Err(PolicyError::parse("text content outside the root element")),
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| PolicyError::parse(format!("name is not UTF-8: {}", e)))
}

/// Serialize a root element as a complete document with XML declaration
///
/// # Errors
/// Returns `PolicyError::Serialization` if the writer fails.
pub fn write(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(serialization)?;
    write_element(&mut writer, root)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| PolicyError::Serialization {
        message: e.to_string(),
    })
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialization);
    }

    writer.write_event(Event::Start(start)).map_err(serialization)?;
    for child in &element.children {
        match child {
            Node::Element(inner) => write_element(writer, inner)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialization)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(serialization)
}

/// Escape markup and the whitespace characters that attribute-value
/// normalization would otherwise fold into spaces
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in escape(value).chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            other => out.push(other),
        }
    }
    out
}

fn serialization(err: impl std::fmt::Display) -> PolicyError {
    PolicyError::Serialization {
        message: err.to_string(),
    }
}
