//! Rendering Pipeline
//!
//! This module holds everything that reads description trees and writes the
//! display tree:
//!
//! - `mount`: first paint, and materializing detached subtrees for patches
//! - `attributes`: how description attributes land on display elements
//! - `diff`: ordered change list between two trees
//! - `patch`: applying a change list
//!
//! Only `mount` and `patch` mutate display nodes.

mod attributes;
mod diff;
mod mount;
mod patch;

pub use attributes::apply_attributes;
pub use diff::{diff, Change, ChildPosition};
pub use mount::{materialize, mount, resolve};
pub use patch::{apply, PatchReport};
