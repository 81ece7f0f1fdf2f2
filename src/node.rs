//! Tagged tree nodes exchanged with the socket.
//!
//! The binary codec lives below this crate; here a node is only a tag, a flat
//! attribute map and optional content (child nodes, raw bytes or text).
//! Attributes are kept in a `BTreeMap` so two identically built requests
//! compare and print the same way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Content carried by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    Nodes(Vec<BinaryNode>),
    Text(String),
    Bytes(Vec<u8>),
}

/// One element of a request or response tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryNode {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NodeContent>,
}

impl BinaryNode {
    pub fn new(tag: impl Into<String>) -> Self {
        BinaryNode {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            content: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BinaryNode>) -> Self {
        self.content = Some(NodeContent::Nodes(children));
        self
    }

    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.content = Some(NodeContent::Bytes(bytes.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Some(NodeContent::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Child nodes, or an empty slice when the content is bytes/text/absent
    pub fn children(&self) -> &[BinaryNode] {
        match &self.content {
            Some(NodeContent::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&BinaryNode> {
        self.children().iter().find(|n| n.tag == tag)
    }

    /// All children with the given tag, in document order
    pub fn children_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a BinaryNode> {
        self.children().iter().filter(move |n| n.tag == tag)
    }

    /// Content decoded as UTF-8 text (bytes are decoded lossily)
    pub fn content_string(&self) -> Option<String> {
        match &self.content {
            Some(NodeContent::Text(text)) => Some(text.clone()),
            Some(NodeContent::Bytes(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Text content of the first child with the given tag
    pub fn child_string(&self, tag: &str) -> Option<String> {
        self.child(tag).and_then(BinaryNode::content_string)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn write_node(node: &BinaryNode, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    write!(f, "{}<{}", indent, node.tag)?;
    for (name, value) in &node.attrs {
        write!(f, " {}=\"{}\"", name, escape(value))?;
    }

    match &node.content {
        None => writeln!(f, "/>"),
        Some(NodeContent::Nodes(children)) if children.is_empty() => writeln!(f, "/>"),
        Some(NodeContent::Nodes(children)) => {
            writeln!(f, ">")?;
            for child in children {
                write_node(child, f, depth + 1)?;
            }
            writeln!(f, "{}</{}>", indent, node.tag)
        }
        Some(_) => {
            let text = node.content_string().unwrap_or_default();
            writeln!(f, ">{}</{}>", escape(&text), node.tag)
        }
    }
}

/// XML-like rendering, used by the CLI and debug logs
impl fmt::Display for BinaryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self, f, 0)
    }
}
