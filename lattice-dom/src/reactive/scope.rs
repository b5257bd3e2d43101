//! Render Scope
//!
//! The render scope tracks the render pass currently running on this
//! thread. It carries the two counters a pass needs:
//!
//! - the hook cursor, which maps the n-th `use_state` call to slot n
//! - the identity allocator, which numbers descriptions in construction order
//!
//! Both restart at every pass, so a tree built in the same order gets the
//! same slots and the same identities on every render.
//!
//! # Implementation
//!
//! We use a thread-local stack of scopes. The render driver pushes a scope
//! before calling the root component and pops it when the pass completes.
//! A stack rather than a single cell lets one root's pass trigger another
//! root's pass.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::driver::Rerender;
use super::slots::SlotStore;
use crate::error::Error;
use crate::node::Identity;

/// Unique identifier for an entered scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScopeId(u64);

impl ScopeId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

thread_local! {
    static SCOPE_STACK: RefCell<Vec<ScopeEntry>> = const { RefCell::new(Vec::new()) };
}

/// Per-pass state.
struct ScopeEntry {
    id: ScopeId,
    slots: Arc<SlotStore>,
    trigger: Weak<dyn Rerender>,
    /// Index of the next hook call.
    cursor: usize,
    /// Raw value of the next identity.
    next_identity: u64,
    /// First hook failure of this pass.
    error: Option<Error>,
}

/// A slot claimed by one hook call.
pub(crate) struct HookSlot {
    pub index: usize,
    pub slots: Arc<SlotStore>,
    pub trigger: Weak<dyn Rerender>,
}

/// What a finished pass reports back to the driver.
#[derive(Debug)]
pub(crate) struct ScopeSummary {
    pub hooks: usize,
    pub error: Option<Error>,
}

/// Guard for an active render pass.
///
/// Pops the scope when finished or dropped, so the stack stays balanced
/// even if a component panics.
pub struct RenderScope {
    id: ScopeId,
    finished: bool,
}

impl RenderScope {
    /// Enter a new pass for the root owning `slots`.
    pub(crate) fn enter(slots: Arc<SlotStore>, trigger: Weak<dyn Rerender>) -> Self {
        let id = ScopeId::new();
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().push(ScopeEntry {
                id,
                slots,
                trigger,
                cursor: 0,
                next_identity: 1,
                error: None,
            });
        });

        Self {
            id,
            finished: false,
        }
    }

    /// Check if a render pass is running on this thread.
    pub fn is_active() -> bool {
        SCOPE_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Allocate the next identity of the current pass, if any.
    pub(crate) fn next_identity() -> Option<Identity> {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().last_mut().map(|entry| {
                let identity = Identity::from(entry.next_identity);
                entry.next_identity += 1;
                identity
            })
        })
    }

    /// Claim the slot for the next hook call of the current pass.
    pub(crate) fn claim_slot() -> Option<HookSlot> {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().last_mut().map(|entry| {
                let index = entry.cursor;
                entry.cursor += 1;
                HookSlot {
                    index,
                    slots: Arc::clone(&entry.slots),
                    trigger: entry.trigger.clone(),
                }
            })
        })
    }

    /// Record a hook failure; the pass fails with the first one.
    pub(crate) fn record_error(error: Error) {
        SCOPE_STACK.with(|stack| {
            if let Some(entry) = stack.borrow_mut().last_mut() {
                entry.error.get_or_insert(error);
            }
        });
    }

    /// Leave the pass and report its hook count and first error.
    pub(crate) fn finish(mut self) -> ScopeSummary {
        self.finished = true;
        let entry = self.pop();
        ScopeSummary {
            hooks: entry.as_ref().map_or(0, |e| e.cursor),
            error: entry.and_then(|e| e.error),
        }
    }

    fn pop(&self) -> Option<ScopeEntry> {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            if let Some(entry) = &popped {
                debug_assert_eq!(
                    entry.id, self.id,
                    "RenderScope mismatch: expected {:?}, got {:?}",
                    self.id, entry.id
                );
            }
            popped
        })
    }
}

impl Drop for RenderScope {
    fn drop(&mut self) {
        if !self.finished {
            self.pop();
        }
    }
}
