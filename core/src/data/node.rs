//! Attributed tree — the generic parse result of a layout document.
//!
//! Text content, comments and processing instructions are ignored; only
//! element tags, their attributes (in document order) and child elements
//! are kept.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LayoutError, Result};


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Node {
        Node {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Node {
        self.set(key, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Node {
        self.children.push(child);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like `get`, but an empty value counts as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Visit this node and every descendant, pre-order.
    pub fn try_for_each_mut<F>(&mut self, f: &mut F) -> Result<()>
    where
        F: FnMut(&mut Node) -> Result<()>,
    {
        f(self)?;
        for child in &mut self.children {
            child.try_for_each_mut(f)?;
        }
        Ok(())
    }

    fn from_start(start: &BytesStart) -> Result<Node> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut node = Node::new(tag);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| LayoutError::Xml(format!("attribute error: {}", e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| LayoutError::Xml(format!("attribute '{}': {}", key, e)))?;
            node.attributes.push((key, value.into_owned()));
        }
        Ok(node)
    }
}


/// Parse an XML document into its root `Node`.
pub fn parse_document(text: &str) -> Result<Node> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(Node::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let node = Node::from_start(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| LayoutError::Xml("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LayoutError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LayoutError::Xml(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| LayoutError::Xml("document has no root element".into()))
}


fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(LayoutError::Xml(format!(
            "multiple root elements (second is <{}>)",
            node.tag
        )));
    }
    *root = Some(node);
    Ok(())
}
