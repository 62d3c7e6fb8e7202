//! # Node Shapes — Normalizing the Generic Tree
//!
//! A markup-to-tree parser turns a repeated child element into an array and a
//! lone child into a plain object. The loader never branches on that: every
//! child lookup goes through [`OneOrMany`] and comes out as a list.
//!
//! Attributes are ordinary object members whose names carry a fixed prefix
//! (`__` by default). [`Node`] hides the prefix.

use serde_json::Value;

/// A child slot that held either a single node or a list of nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Number of nodes held.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    /// Whether no nodes are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> OneOrMany<&'a Value> {
    /// Classify a tree value. Arrays become `Many`, everything else `One`.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => OneOrMany::Many(items.iter().collect()),
            other => OneOrMany::One(other),
        }
    }
}

/// A `value` / `description` pair read from a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub value: i64,
    pub description: String,
}

/// An object in the generic tree, viewed through an attribute prefix.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
    prefix: &'a str,
}

impl<'a> Node<'a> {
    /// Wrap a tree value. Returns `None` unless it is an object.
    pub fn new(value: &'a Value, prefix: &'a str) -> Option<Self> {
        value.is_object().then_some(Self { value, prefix })
    }

    /// The wrapped tree value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Raw attribute value.
    pub fn attr(&self, name: &str) -> Option<&'a Value> {
        self.value.get(format!("{}{}", self.prefix, name))
    }

    /// Attribute as text. Numbers and booleans are rendered.
    pub fn attr_text(&self, name: &str) -> Option<String> {
        match self.attr(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Attribute as an integer. Text is trimmed before parsing.
    pub fn attr_int(&self, name: &str) -> Option<i64> {
        match self.attr(name)? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|u| u as i64))
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }

    /// Child slot by element name, normalized to a list.
    pub fn children(&self, name: &str) -> Option<Vec<&'a Value>> {
        self.value
            .get(name)
            .map(|child| OneOrMany::from_value(child).into_vec())
    }

    /// Whether a child slot with this element name is present.
    pub fn has_child(&self, name: &str) -> bool {
        self.value.get(name).is_some()
    }

    /// Read the `value` and `description` attributes.
    ///
    /// Returns a reason when either is missing or the value is not an integer.
    pub fn row(&self) -> Result<Row, String> {
        let description = self
            .attr_text("description")
            .ok_or_else(|| "missing description".to_string())?;
        let raw = self
            .attr("value")
            .ok_or_else(|| "missing value".to_string())?;
        let value = self
            .attr_int("value")
            .ok_or_else(|| format!("value {raw} is not an integer"))?;
        Ok(Row { value, description })
    }
}
