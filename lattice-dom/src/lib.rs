//! Lattice DOM
//!
//! This crate provides the rendering core of the Lattice UI framework.
//! It implements:
//!
//! - Node descriptions: immutable per-render snapshots of the UI tree
//! - Initial mount of a description tree into a display tree
//! - Diffing two description trees into an ordered change list
//! - Applying a change list to the live display tree
//! - Hook-style component state with synchronous re-rendering
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `node`: descriptions, attributes, identity tokens and components
//! - `host`: the display tree boundary and an in-memory implementation
//! - `render`: mount, diff and patch
//! - `reactive`: state slots, render scopes and the render driver
//! - `config`: options shared by one mounted root
//!
//! # Example
//!
//! ```rust
//! use lattice_dom::host::MemoryDocument;
//! use lattice_dom::node::{Component, EventHandler, NodeDescription};
//! use lattice_dom::reactive::{use_state, RenderContext};
//!
//! let counter = Component::new("Counter", |_| {
//!     let (count, set_count) = use_state(0);
//!     let (on_click, _) = use_state(EventHandler::new(move |_| set_count.update(|c| c + 1)));
//!     NodeDescription::element("div")
//!         .with_child(NodeDescription::element("p").with_child(format!("Count: {count}")))
//!         .with_child(
//!             NodeDescription::element("button")
//!                 .with_handler("click", on_click)
//!                 .with_child("+"),
//!         )
//! });
//!
//! let ctx = RenderContext::new(MemoryDocument::new(), counter);
//! let body = ctx.with_host(|doc| doc.body());
//! ctx.mount(Some(body))?;
//!
//! let button = ctx.with_host(|doc| doc.elements_by_tag("button")[0]);
//! ctx.dispatch(&button, "click");
//!
//! assert_eq!(ctx.with_host(|doc| doc.text_content(body)), "Count: 1+");
//! # Ok::<(), lattice_dom::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod node;
pub mod reactive;
pub mod render;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use host::{Host, MemoryDocument};
pub use node::{create_node, AttrValue, Child, Component, Identity, NodeDescription, NodeKind};
pub use reactive::{use_state, RenderContext, StateSetter};
pub use render::{apply, diff, mount, Change, ChildPosition, PatchReport};
