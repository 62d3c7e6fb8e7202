//! # XML Bridge — Reference Document ⇄ Generic Tree
//!
//! The taxonomy index consumes a parsed tree, not markup. This module turns
//! the SISO reference XML into that tree and back.
//!
//! ## Tree shape
//!
//! - An element becomes an object. Its attributes become members named with
//!   the attribute prefix (`__uid`, `__description`).
//! - `uuid` and `baseuuid` attributes are dropped.
//! - A child element appearing once is a single member; repeated children
//!   collapse into an array in document order.
//! - An element with only text becomes a string. Text mixed with attributes
//!   or children is kept under `#text`.
//!
//! Emitting reverses the mapping. Member order among different child names is
//! not preserved.

use std::io;
use std::str::Utf8Error;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde_json::{Map, Value};
use thiserror::Error;

/// Member holding text that sits beside attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Attributes never copied into the tree.
const DROPPED_ATTRIBUTES: [&str; 2] = ["uuid", "baseuuid"];

/// Errors from the XML bridge.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("element or attribute name is not UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    #[error("closing tag </{found}> without a matching open tag")]
    UnexpectedClose { found: String },

    #[error("document ended inside <{name}>")]
    Unclosed { name: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("tree root must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// An element being assembled while its content is read.
struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            attributes: Map::new(),
            children: Map::new(),
            text: String::new(),
        }
    }

    fn open(start: &BytesStart<'_>, prefix: &str) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut frame = Frame::new(name);
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            if DROPPED_ATTRIBUTES.contains(&key) {
                continue;
            }
            let value = attr.unescape_value()?;
            frame
                .attributes
                .insert(format!("{prefix}{key}"), Value::String(value.into_owned()));
        }
        Ok(frame)
    }

    fn close(self) -> (String, Value) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, Value::String(self.text));
        }
        let mut members = self.attributes;
        members.extend(self.children);
        if !self.text.is_empty() {
            members.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        (self.name, Value::Object(members))
    }

    fn attach(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }
}

/// Parse XML text into the generic tree.
///
/// The result is an object holding the root element under its name, e.g.
/// `{"ebv": {...}}`.
pub fn xml_to_tree(xml: &str, prefix: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Frame::new(String::new())];
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start, prefix)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start, prefix)?.close();
                if let Some(parent) = stack.last_mut() {
                    parent.attach(name, value);
                }
            }
            Event::End(end) => {
                if stack.len() < 2 {
                    let found = std::str::from_utf8(end.name().as_ref())?.to_string();
                    return Err(XmlError::UnexpectedClose { found });
                }
                if let Some(frame) = stack.pop() {
                    let (name, value) = frame.close();
                    if let Some(parent) = stack.last_mut() {
                        parent.attach(name, value);
                    }
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(std::str::from_utf8(&data.into_inner())?);
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if stack.len() > 1 {
        let name = stack.pop().map(|f| f.name).unwrap_or_default();
        return Err(XmlError::Unclosed { name });
    }
    let document = stack.pop().map(|f| f.children).unwrap_or_default();
    if document.is_empty() {
        return Err(XmlError::NoRoot);
    }
    tracing::debug!(roots = document.len(), "parsed XML document");
    Ok(Value::Object(document))
}

/// Serialize the generic tree back to indented XML with a declaration.
pub fn tree_to_xml(tree: &Value, prefix: &str) -> Result<String, XmlError> {
    let Value::Object(roots) = tree else {
        return Err(XmlError::NotAnObject { found: json_type(tree) });
    };
    if roots.is_empty() {
        return Err(XmlError::NoRoot);
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    for (name, value) in roots {
        write_element(&mut writer, name, value, prefix)?;
    }
    let bytes = writer.into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
    prefix: &str,
) -> Result<(), XmlError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item, prefix)?;
            }
        }
        Value::Object(members) => {
            let mut start = BytesStart::new(name);
            let mut children = Vec::new();
            let mut text = None;
            for (key, member) in members {
                if key == TEXT_KEY {
                    text = Some(scalar_text(member));
                } else if let Some(attr) = key.strip_prefix(prefix).filter(|_| !prefix.is_empty()) {
                    start.push_attribute((attr, scalar_text(member).as_str()));
                } else {
                    children.push((key, member));
                }
            }

            if children.is_empty() && text.as_deref().map_or(true, str::is_empty) {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
            writer.write_event(Event::Start(start))?;
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
            for (key, member) in children {
                write_element(writer, key, member, prefix)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        scalar => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
