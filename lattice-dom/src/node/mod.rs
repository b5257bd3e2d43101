//! Node Descriptions
//!
//! A node description is the immutable, per-render snapshot of one UI node:
//! an element, a text leaf, or a component that expands into another
//! description. Trees of descriptions are what the diff engine compares and
//! what the mount engine turns into display nodes.
//!
//! Every description carries an [`Identity`] assigned at construction. The
//! identity is stamped onto the display element the description produces and
//! is the only key used to find that element again on later renders.

mod attr;
mod description;
mod identity;

pub use attr::{AttrValue, Attributes, Event, EventHandler, Style};
pub use description::{
    create_node, Child, Component, NodeDescription, NodeKind, Props, CHILDREN, NODE_VALUE,
};
pub use identity::Identity;
