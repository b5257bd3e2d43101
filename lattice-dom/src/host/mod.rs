//! Display Tree Boundary
//!
//! The [`Host`] trait is the only way the engine touches live display
//! nodes. It mirrors the handful of platform calls the mount engine and the
//! patch applier need: creating nodes, writing attributes, registering
//! listeners, and moving nodes around. Handles are opaque to the engine.
//!
//! Lookups are scoped to a subtree, normally the container a root was
//! mounted into, so several roots can share one display tree. A node that
//! an earlier patch replaced or removed is no longer inside that subtree,
//! and callers treat that as a no-op.
//!
//! [`MemoryDocument`] is an in-memory implementation used by tests, benches,
//! and headless rendering.

mod memory;

use std::fmt::Debug;

use crate::node::EventHandler;

pub use memory::{MemoryDocument, NodeHandle, NodeSnapshot};

/// A mutable display tree.
pub trait Host {
    /// Opaque reference to a display node.
    type Handle: Clone + PartialEq + Debug;

    /// Create a detached element node.
    fn create_element(&mut self, tag: &str) -> Self::Handle;

    /// Create a detached text node.
    fn create_text(&mut self, value: &str) -> Self::Handle;

    fn set_attribute(&mut self, node: &Self::Handle, name: &str, value: &str);

    fn add_event_listener(&mut self, node: &Self::Handle, event: &str, handler: EventHandler);

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it already has a parent.
    fn append_child(&mut self, parent: &Self::Handle, child: &Self::Handle);

    /// Put `new` in `old`'s position and detach `old`.
    fn replace_with(&mut self, old: &Self::Handle, new: &Self::Handle);

    /// Detach `node` from its parent.
    fn remove(&mut self, node: &Self::Handle);

    /// Find the first element under `scope` whose attribute `name` equals
    /// `value`, searching depth-first in tree order.
    fn find_by_attribute(
        &self,
        scope: &Self::Handle,
        name: &str,
        value: &str,
    ) -> Option<Self::Handle>;

    /// Whether `node` is `scope` or one of its descendants.
    fn contains(&self, scope: &Self::Handle, node: &Self::Handle) -> bool;

    fn child_nodes(&self, parent: &Self::Handle) -> Vec<Self::Handle>;

    /// Content of a text node; `None` for elements.
    fn text_value(&self, node: &Self::Handle) -> Option<String>;

    /// Listeners registered on `node` for `event`, in registration order.
    fn listeners(&self, node: &Self::Handle, event: &str) -> Vec<EventHandler>;
}
