//! Attribute values.
//!
//! Attribute values follow strict equality: scalars compare by value, while
//! style maps and event handlers compare by reference. A style map rebuilt
//! with the same entries on the next render is a different value.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Ordered attribute mapping. Insertion order is significant to the diff.
pub type Attributes = IndexMap<String, AttrValue>;

/// Event delivered to a registered listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Lowercase event name, e.g. `click`.
    pub name: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A shared event callback.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&Event) + Send + Sync>);

impl EventHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    /// Invoke the callback.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Reference equality.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0))
    }
}

/// Inline style declarations, shared by reference.
#[derive(Debug, Clone, Default)]
pub struct Style(Arc<IndexMap<String, String>>);

impl Style {
    pub fn new<I, K, V>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(Arc::new(
            declarations
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    pub fn declarations(&self) -> &IndexMap<String, String> {
        &self.0
    }

    /// Flatten into `"prop: value; prop: value"`.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(prop, value)| format!("{prop}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A single attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Style(Style),
    Handler(EventHandler),
}

impl AttrValue {
    /// Strict equality: by value for scalars, by reference otherwise.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Text(a), AttrValue::Text(b)) => a == b,
            (AttrValue::Number(a), AttrValue::Number(b)) => a == b,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Style(a), AttrValue::Style(b)) => a.ptr_eq(b),
            (AttrValue::Handler(a), AttrValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The string written to the display tree for scalar values.
    ///
    /// Style maps and handlers have no literal rendering.
    pub fn as_literal(&self) -> Option<String> {
        match self {
            AttrValue::Text(s) => Some(s.clone()),
            AttrValue::Number(n) => Some(n.to_string()),
            AttrValue::Bool(b) => Some(b.to_string()),
            AttrValue::Style(_) | AttrValue::Handler(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(f64::from(value))
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Style> for AttrValue {
    fn from(value: Style) -> Self {
        AttrValue::Style(value)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(value: EventHandler) -> Self {
        AttrValue::Handler(value)
    }
}
