//! Component State and Re-rendering
//!
//! This module implements hook-style component state and the render driver
//! that turns state changes into display tree patches.
//!
//! # Concepts
//!
//! ## State Slots
//!
//! A state slot is a value owned by a mounted root. Components declare slots
//! with [`use_state`]; the n-th call of a render pass always addresses slot n,
//! so the same calls in the same order see the same values on every render.
//!
//! ## Setters
//!
//! A [`StateSetter`] writes its slot and synchronously re-renders the root.
//! The re-render has finished by the time `set` returns.
//!
//! ## Render Context
//!
//! A [`RenderContext`] pairs a root component with a display tree. It keeps
//! the previously rendered tree, and each re-render diffs the new tree
//! against it and patches only what changed.
//!
//! # Implementation Notes
//!
//! Hooks find their root through a thread-local render scope, the same way
//! identity allocation does. A hook called with no active scope is a
//! programming error and panics.

mod driver;
mod scope;
mod slots;
mod state;

pub use driver::RenderContext;
pub use scope::RenderScope;
pub use slots::SlotStore;
pub use state::{use_state, use_state_with, StateSetter};
