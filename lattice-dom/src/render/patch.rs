//! Patch application.
//!
//! Applying a change list happens in two phases:
//!
//! 1. Every change's target is looked up in the unpatched display tree,
//!    under the root's container. Elements are found by their stamped
//!    identity. Text nodes carry no stamp and are reached through their
//!    parent's stamp and their index in the old tree.
//! 2. The resolved targets are mutated in list order.
//!
//! Identities restart at every render pass, so a node materialized by one
//! change can carry the stamp an old node had. Resolving first keeps later
//! changes from picking up those fresh nodes.
//!
//! A target that cannot be found, or that an earlier change already took
//! out of the container, is skipped rather than reported as an error.

use tracing::{debug, trace};

use super::diff::{Change, ChildPosition};
use super::mount::materialize;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::host::Host;
use crate::node::{Identity, NodeDescription};

/// Outcome of applying a change list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    /// Changes that mutated the display tree.
    pub applied: usize,
    /// Changes whose target could not be found.
    pub skipped: usize,
}

/// A change bound to the display node it acts on.
enum Step<'a, N> {
    Replace { target: N, node: &'a NodeDescription },
    ReplaceText { target: N, value: &'a str },
    Append { parent: N, node: &'a NodeDescription },
    Remove { target: N },
}

/// Apply `changes` to the subtree under `container`.
///
/// Fails only if a replacement subtree cannot be materialized; changes
/// before the failing one stay applied.
pub fn apply<H: Host>(
    host: &mut H,
    container: &H::Handle,
    changes: &[Change],
    config: &RenderConfig,
) -> Result<PatchReport> {
    let lookup = Lookup {
        host: &*host,
        container,
        config,
    };
    let steps: Vec<_> = changes.iter().map(|change| lookup.resolve(change)).collect();

    let mut report = PatchReport::default();
    for (change, step) in changes.iter().zip(steps) {
        let applied = match step {
            Some(step) => perform(host, container, step, config)?,
            None => false,
        };

        if applied {
            trace!(change = change.label(), "applied change");
            report.applied += 1;
        } else {
            debug!(change = change.label(), "target not found, skipping change");
            report.skipped += 1;
        }
    }

    debug!(applied = report.applied, skipped = report.skipped, "patch complete");
    Ok(report)
}

struct Lookup<'h, H: Host> {
    host: &'h H,
    container: &'h H::Handle,
    config: &'h RenderConfig,
}

impl<'h, H: Host> Lookup<'h, H> {
    fn resolve<'a>(&self, change: &'a Change) -> Option<Step<'a, H::Handle>> {
        match change {
            Change::ReplaceText { position, value } => {
                let target = self.text_for_replace(*position)?;
                Some(Step::ReplaceText {
                    target,
                    value: value.as_str(),
                })
            }
            Change::ReplaceInPlace { position, node } => {
                let target = self
                    .element(node.identity())
                    .or_else(|| self.text_child_at(*position))?;
                Some(Step::Replace { target, node })
            }
            Change::ReplaceIdentity {
                old,
                position,
                node,
            } => {
                let target = self
                    .element(*old)
                    .or_else(|| self.text_child_at(*position))?;
                Some(Step::Replace { target, node })
            }
            Change::Insert { parent, node } => {
                let parent = self.element(*parent)?;
                Some(Step::Append { parent, node })
            }
            Change::Delete { position, node } => {
                let target = if node.is_text() {
                    self.text_child_at(*position)?
                } else {
                    self.element(node.identity())?
                };
                Some(Step::Remove { target })
            }
        }
    }

    fn element(&self, identity: Identity) -> Option<H::Handle> {
        self.host.find_by_attribute(
            self.container,
            &self.config.identity_attribute,
            &identity.to_string(),
        )
    }

    fn is_text(&self, node: &H::Handle) -> bool {
        self.host.text_value(node).is_some()
    }

    /// The text node at `position`, if the node there is text.
    fn text_child_at(&self, position: ChildPosition) -> Option<H::Handle> {
        let parent = self.element(position.parent?)?;
        self.host
            .child_nodes(&parent)
            .into_iter()
            .nth(position.index)
            .filter(|child| self.is_text(child))
    }

    /// The text child at the recorded index, falling back to the first
    /// text child of the parent.
    fn text_for_replace(&self, position: ChildPosition) -> Option<H::Handle> {
        let parent = self.element(position.parent?)?;
        let children = self.host.child_nodes(&parent);
        children
            .get(position.index)
            .filter(|child| self.is_text(child))
            .or_else(|| children.iter().find(|child| self.is_text(child)))
            .cloned()
    }
}

fn perform<H: Host>(
    host: &mut H,
    container: &H::Handle,
    step: Step<'_, H::Handle>,
    config: &RenderConfig,
) -> Result<bool> {
    match step {
        Step::Replace { target, node } => {
            if !host.contains(container, &target) {
                return Ok(false);
            }
            let replacement = materialize(host, node, config)?;
            host.replace_with(&target, &replacement);
        }
        Step::ReplaceText { target, value } => {
            if !host.contains(container, &target) {
                return Ok(false);
            }
            let text = host.create_text(value);
            host.replace_with(&target, &text);
        }
        Step::Append { parent, node } => {
            if !host.contains(container, &parent) {
                return Ok(false);
            }
            let child = materialize(host, node, config)?;
            host.append_child(&parent, &child);
        }
        Step::Remove { target } => {
            if !host.contains(container, &target) {
                return Ok(false);
            }
            host.remove(&target);
        }
    }
    Ok(true)
}
