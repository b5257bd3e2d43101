//! Node descriptions and the constructor used to build them.

use std::fmt;
use std::sync::Arc;

use super::attr::{AttrValue, Attributes, Event, EventHandler, Style};
use super::identity::Identity;

/// Attribute key holding a text node's content.
pub const NODE_VALUE: &str = "nodeValue";

/// Attribute key that is never applied to a display node.
pub const CHILDREN: &str = "children";

/// Input handed to a component when it is expanded.
#[derive(Debug, Clone, Copy)]
pub struct Props<'a> {
    pub attributes: &'a Attributes,
    pub children: &'a [NodeDescription],
}

impl<'a> Props<'a> {
    pub fn get(&self, key: &str) -> Option<&'a AttrValue> {
        self.attributes.get(key)
    }
}

type RenderFn = dyn Fn(&Props<'_>) -> NodeDescription + Send + Sync;

/// A function-kind node: expands into another description when mounted.
///
/// Two components are the same kind only if they share the same function
/// (reference equality), so keep one `Component` value per component and
/// clone it.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    render: Arc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: &str, render: F) -> Self
    where
        F: Fn(&Props<'_>) -> NodeDescription + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            render: Arc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the component with its input payload.
    pub fn render(&self, props: &Props<'_>) -> NodeDescription {
        (self.render)(props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// What a description renders as.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A platform element with the given tag name.
    Element(String),
    /// A leaf text node; content lives in the `nodeValue` attribute.
    Text,
    /// A component expanded at mount time.
    Component(Component),
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::Element(tag.to_string())
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::Element(tag)
    }
}

impl From<&Component> for NodeKind {
    fn from(component: &Component) -> Self {
        NodeKind::Component(component.clone())
    }
}

impl From<Component> for NodeKind {
    fn from(component: Component) -> Self {
        NodeKind::Component(component)
    }
}

/// One node of a tree snapshot.
#[derive(Debug, Clone)]
pub struct NodeDescription {
    kind: NodeKind,
    identity: Identity,
    attributes: Attributes,
    children: Vec<NodeDescription>,
}

impl NodeDescription {
    /// Create a description with a freshly allocated identity.
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            kind: kind.into(),
            identity: Identity::next(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeKind::Element(tag.into()))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_attr(NODE_VALUE, AttrValue::Text(value.into()))
    }

    pub fn component(component: &Component) -> Self {
        Self::new(component)
    }

    /// Override the allocated identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_style(self, style: Style) -> Self {
        self.with_attr("style", style)
    }

    /// Attach an event handler under `on<Event>`.
    pub fn on<F>(self, event: &str, handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.with_handler(event, EventHandler::new(handler))
    }

    /// Attach an existing handler under `on<Event>`.
    pub fn with_handler(self, event: &str, handler: EventHandler) -> Self {
        let mut key = String::from("on");
        let mut chars = event.chars();
        if let Some(first) = chars.next() {
            key.extend(first.to_uppercase());
            key.push_str(chars.as_str());
        }
        self.with_attr(key, handler)
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(Child::into_node(child.into()));
        self
    }

    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.children
            .extend(children.into_iter().map(|c| Child::into_node(c.into())));
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[NodeDescription] {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    /// Text content of a text node.
    pub fn node_value(&self) -> Option<&str> {
        self.attributes.get(NODE_VALUE).and_then(AttrValue::as_text)
    }

    /// Tag name of an element node.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub(crate) fn props(&self) -> Props<'_> {
        Props {
            attributes: &self.attributes,
            children: &self.children,
        }
    }

    pub(crate) fn set_children(&mut self, children: Vec<NodeDescription>) {
        self.children = children;
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeDescription> {
        std::mem::take(&mut self.children)
    }

    /// Number of nodes in this subtree, including the root.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeDescription::subtree_size)
            .sum::<usize>()
    }
}

/// A child passed to the constructor: a node or a value to render as text.
#[derive(Debug, Clone)]
pub enum Child {
    Node(NodeDescription),
    Text(String),
}

impl Child {
    /// Normalize into a description; non-node children become text nodes.
    pub fn into_node(self) -> NodeDescription {
        match self {
            Child::Node(node) => node,
            Child::Text(value) => NodeDescription::text(value),
        }
    }
}

impl From<NodeDescription> for Child {
    fn from(node: NodeDescription) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

macro_rules! child_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Child {
            fn from(value: $ty) -> Self {
                Child::Text(value.to_string())
            }
        })*
    };
}

child_from_display!(i32, i64, u32, u64, usize, f64, bool);

/// Build a node description.
///
/// `attributes` may be absent. Children are normalized in order: every
/// non-node child becomes a text description.
pub fn create_node(
    kind: impl Into<NodeKind>,
    attributes: Option<Attributes>,
    children: Vec<Child>,
) -> NodeDescription {
    let mut node = NodeDescription::new(kind);
    if let Some(attributes) = attributes {
        node.attributes = attributes;
    }
    node.with_children(children)
}
