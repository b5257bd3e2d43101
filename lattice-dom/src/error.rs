//! Error types for mounting, patching and rendering.
//!
//! Missing containers and patch targets are not errors: the applier treats
//! them as no-ops because change lists may reference nodes that an earlier
//! change already replaced.

use thiserror::Error;

use crate::node::Identity;

/// Errors raised while materializing or re-rendering a tree.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid element tag '{tag}'")]
    InvalidTag { tag: String },

    #[error("text node {identity} has no nodeValue attribute")]
    MissingNodeValue { identity: Identity },

    #[error("component '{component}' nested deeper than {limit} levels")]
    ComponentDepthExceeded { component: String, limit: usize },

    #[error("hook call count changed between renders: {previous} before, {current} now")]
    HookOrderViolation { previous: usize, current: usize },

    #[error("state slot {slot} does not hold a value of type {expected}")]
    SlotTypeMismatch { slot: usize, expected: &'static str },

    #[error("invalid render configuration: {0}")]
    Config(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
