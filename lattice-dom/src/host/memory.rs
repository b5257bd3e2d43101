//! In-memory display tree.
//!
//! Nodes live in an arena and are never freed; detaching a node only clears
//! its parent link, the same way a removed DOM node stays alive while
//! something holds it.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;

use super::Host;
use crate::node::EventHandler;

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        listeners: Vec<(String, EventHandler)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Entry {
    data: NodeData,
    parent: Option<NodeHandle>,
    children: SmallVec<[NodeHandle; 4]>,
}

/// Serializable view of an attached subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSnapshot {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        children: Vec<NodeSnapshot>,
    },
    Text {
        value: String,
    },
}

/// Arena-backed display tree with a single `body` root.
///
/// Memory grows with every node ever created: replaced and removed nodes
/// keep their arena slot, so each re-render adds its replacement nodes for
/// good. Fine for tests, benches and one-shot headless renders; a
/// long-running host should free detached nodes.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: Vec<Entry>,
    body: NodeHandle,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            body: NodeHandle(0),
        };
        document.body = document.insert(NodeData::Element {
            tag: "body".to_string(),
            attributes: IndexMap::new(),
            listeners: Vec::new(),
        });
        document
    }

    fn insert(&mut self, data: NodeData) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Entry {
            data,
            parent: None,
            children: SmallVec::new(),
        });
        handle
    }

    fn entry(&self, handle: NodeHandle) -> Option<&Entry> {
        self.nodes.get(handle.0)
    }

    fn entry_mut(&mut self, handle: NodeHandle) -> Option<&mut Entry> {
        self.nodes.get_mut(handle.0)
    }

    /// The document root. Everything reachable from it is attached.
    pub fn body(&self) -> NodeHandle {
        self.body
    }

    /// Total number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag_name(&self, node: NodeHandle) -> Option<&str> {
        match &self.entry(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attribute(&self, node: NodeHandle, name: &str) -> Option<&str> {
        match &self.entry(node)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    pub fn attributes(&self, node: NodeHandle) -> Option<&IndexMap<String, String>> {
        match &self.entry(node)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeHandle) -> Option<&str> {
        match &self.entry(node)?.data {
            NodeData::Text(value) => Some(value),
            NodeData::Element { .. } => None,
        }
    }

    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.entry(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.entry(node)?.parent
    }

    pub fn is_attached(&self, node: NodeHandle) -> bool {
        self.contains(&self.body, &node)
    }

    /// Concatenated text of every text node under `node`, in tree order.
    pub fn text_content(&self, node: NodeHandle) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeHandle, out: &mut String) {
        if let Some(value) = self.text(node) {
            out.push_str(value);
            return;
        }
        for child in self.children(node) {
            self.collect_text(*child, out);
        }
    }

    /// Attached elements with the given tag, in tree order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeHandle> {
        let mut found = Vec::new();
        let mut stack = vec![self.body];
        while let Some(handle) = stack.pop() {
            if self.tag_name(handle) == Some(tag) {
                found.push(handle);
            }
            stack.extend(self.children(handle).iter().rev().copied());
        }
        found
    }

    pub fn snapshot(&self, node: NodeHandle) -> Option<NodeSnapshot> {
        let entry = self.entry(node)?;
        Some(match &entry.data {
            NodeData::Text(value) => NodeSnapshot::Text {
                value: value.clone(),
            },
            NodeData::Element {
                tag, attributes, ..
            } => NodeSnapshot::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                children: entry
                    .children
                    .iter()
                    .filter_map(|child| self.snapshot(*child))
                    .collect(),
            },
        })
    }

    /// The attached tree as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot(self.body))
    }

    /// Serialize the children of `body` as markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.body) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeHandle, out: &mut String) {
        let Some(entry) = self.entry(node) else {
            return;
        };
        match &entry.data {
            NodeData::Text(value) => out.push_str(&escape(value)),
            NodeData::Element {
                tag, attributes, ..
            } => {
                let _ = write!(out, "<{tag}");
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape(value));
                }
                out.push('>');
                for child in &entry.children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn detach(&mut self, node: NodeHandle) {
        let Some(parent) = self.entry_mut(node).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(entry) = self.entry_mut(parent) {
            entry.children.retain(|child| *child != node);
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Host for MemoryDocument {
    type Handle = NodeHandle;

    fn create_element(&mut self, tag: &str) -> NodeHandle {
        self.insert(NodeData::Element {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            listeners: Vec::new(),
        })
    }

    fn create_text(&mut self, value: &str) -> NodeHandle {
        self.insert(NodeData::Text(value.to_string()))
    }

    fn set_attribute(&mut self, node: &NodeHandle, name: &str, value: &str) {
        if let Some(Entry {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.entry_mut(*node)
        {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn add_event_listener(&mut self, node: &NodeHandle, event: &str, handler: EventHandler) {
        if let Some(Entry {
            data: NodeData::Element { listeners, .. },
            ..
        }) = self.entry_mut(*node)
        {
            listeners.push((event.to_string(), handler));
        }
    }

    fn append_child(&mut self, parent: &NodeHandle, child: &NodeHandle) {
        if self.entry(*parent).is_none() || self.entry(*child).is_none() {
            return;
        }
        self.detach(*child);
        if let Some(entry) = self.entry_mut(*child) {
            entry.parent = Some(*parent);
        }
        if let Some(entry) = self.entry_mut(*parent) {
            entry.children.push(*child);
        }
    }

    fn replace_with(&mut self, old: &NodeHandle, new: &NodeHandle) {
        if old == new || self.entry(*new).is_none() {
            return;
        }
        let Some(parent) = self.parent(*old) else {
            return;
        };
        self.detach(*new);
        let Some(position) = self
            .children(parent)
            .iter()
            .position(|child| child == old)
        else {
            return;
        };
        if let Some(entry) = self.entry_mut(parent) {
            entry.children[position] = *new;
        }
        if let Some(entry) = self.entry_mut(*old) {
            entry.parent = None;
        }
        if let Some(entry) = self.entry_mut(*new) {
            entry.parent = Some(parent);
        }
    }

    fn remove(&mut self, node: &NodeHandle) {
        self.detach(*node);
    }

    fn find_by_attribute(
        &self,
        scope: &NodeHandle,
        name: &str,
        value: &str,
    ) -> Option<NodeHandle> {
        let mut stack = vec![*scope];
        while let Some(handle) = stack.pop() {
            if self.attribute(handle, name) == Some(value) {
                return Some(handle);
            }
            stack.extend(self.children(handle).iter().rev().copied());
        }
        None
    }

    fn contains(&self, scope: &NodeHandle, node: &NodeHandle) -> bool {
        let mut current = Some(*node);
        while let Some(handle) = current {
            if handle == *scope {
                return true;
            }
            current = self.parent(handle);
        }
        false
    }

    fn child_nodes(&self, parent: &NodeHandle) -> Vec<NodeHandle> {
        self.children(*parent).to_vec()
    }

    fn text_value(&self, node: &NodeHandle) -> Option<String> {
        self.text(*node).map(str::to_string)
    }

    fn listeners(&self, node: &NodeHandle, event: &str) -> Vec<EventHandler> {
        match self.entry(*node).map(|e| &e.data) {
            Some(NodeData::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| handler.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}
