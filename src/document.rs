//! The graph-document data model shared by the codec, the synchronization
//! controller and the [`crate::remote::DocumentStore`] adapters.
//!
//! A [`Document`] is the unit of remote persistence: an addressable,
//! independently fetchable and saveable collection of [`Node`]s. Nodes carry
//! multi-valued properties keyed by vocabulary URI. The model is deliberately
//! small; it only has to express the Belief/Argumentation shape and survive a
//! JSON round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::error::AporiaError;

/// A single property value on a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A plain string literal.
    Literal(String),
    /// A reference to another node or an external resource.
    Link(String),
    /// A wall-clock timestamp.
    Date(DateTime<Utc>),
}

/// A graph node: a canonical identifier plus a multi-valued property table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    properties: BTreeMap<String, Vec<Value>>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The node's own canonical identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_literal(&mut self, property: &str, value: impl Into<String>) {
        self.push(property, Value::Literal(value.into()));
    }

    pub fn add_link(&mut self, property: &str, target: impl Into<String>) {
        self.push(property, Value::Link(target.into()));
    }

    pub fn add_date(&mut self, property: &str, when: DateTime<Utc>) {
        self.push(property, Value::Date(when));
    }

    /// First literal value of `property`, if any.
    pub fn literal(&self, property: &str) -> Option<&str> {
        self.properties.get(property)?.iter().find_map(|v| match v {
            Value::Literal(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// First link value of `property`, if any.
    pub fn link(&self, property: &str) -> Option<&str> {
        self.properties.get(property)?.iter().find_map(|v| match v {
            Value::Link(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Every link value of `property`, in insertion order.
    pub fn links<'a>(&'a self, property: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .get(property)
            .into_iter()
            .flatten()
            .filter_map(|v| match v {
                Value::Link(t) => Some(t.as_str()),
                _ => None,
            })
    }

    /// First date value of `property`, if any.
    pub fn date(&self, property: &str) -> Option<DateTime<Utc>> {
        self.properties.get(property)?.iter().find_map(|v| match v {
            Value::Date(d) => Some(*d),
            _ => None,
        })
    }

    fn push(&mut self, property: &str, value: Value) {
        self.properties
            .entry(property.to_string())
            .or_default()
            .push(value);
    }
}

/// An unordered collection of nodes keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    nodes: BTreeMap<String, Node>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Iterate every node. Documents are unordered; iteration is by
    /// identifier, not by insertion.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Exact lookup by canonical identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Insert or replace by node identity.
    pub fn set_node(&mut self, node: Node) {
        self.nodes.insert(node.id().to_string(), node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a link target within this document: exact identifier first,
    /// then the extracted node name, so absolute and document-relative
    /// spellings of the same node find each other.
    pub fn resolve(&self, reference: &str) -> Option<&Node> {
        if let Some(node) = self.nodes.get(reference) {
            return Some(node);
        }
        let name = node_name(reference)?;
        if let Some(node) = self.nodes.get(&name) {
            return Some(node);
        }
        self.nodes
            .values()
            .find(|node| node_name(node.id()).as_deref() == Some(name.as_str()))
    }

    pub fn to_json(&self) -> Result<String, AporiaError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, AporiaError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Extract the short node name from an identifier: the URL fragment when one
/// is present, otherwise the last non-empty path segment. Opaque names with
/// no separators pass through unchanged. `None` when nothing remains.
pub fn node_name(identifier: &str) -> Option<String> {
    if let Ok(url) = Url::parse(identifier) {
        if let Some(fragment) = url.fragment() {
            if !fragment.is_empty() {
                return Some(fragment.to_string());
            }
        }
        return url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string);
    }
    // Relative reference or opaque name.
    let (path, fragment) = match identifier.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (identifier, None),
    };
    if let Some(fragment) = fragment {
        if !fragment.is_empty() {
            return Some(fragment.to_string());
        }
    }
    path.rsplit('/').find(|s| !s.is_empty()).map(str::to_string)
}
