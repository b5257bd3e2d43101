//! State Hooks
//!
//! `use_state` gives a component a value that survives re-renders, plus a
//! setter that writes the value and synchronously re-renders the root.
//!
//! # Call Order
//!
//! Slots are assigned by call order within a render pass: the first
//! `use_state` call of a pass gets slot 0, the next slot 1, and so on. Every
//! pass must therefore make the same calls in the same order. Conditional
//! or looped hook calls break this. The render driver reports a changed
//! call count, and reading a slot as the wrong type fails the pass, but a
//! reordering that keeps types and count intact goes unnoticed.
//!
//! Calling a setter while a render pass is running is not supported: the
//! nested re-render runs to completion first and the ordering of the two
//! passes is unspecified.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use tracing::{debug, error};

use super::driver::Rerender;
use super::scope::RenderScope;
use super::slots::SlotStore;

/// Declare a state slot initialized with `initial`.
///
/// Returns the current value and a setter. `initial` is only stored the
/// first time the slot is read; later passes return the stored value.
///
/// # Panics
///
/// Panics when called outside a render pass.
pub fn use_state<T>(initial: T) -> (T, StateSetter<T>)
where
    T: Clone + Send + Sync + 'static,
{
    use_state_with(move || initial)
}

/// Like [`use_state`], computing the initial value only when the slot is
/// created.
///
/// # Panics
///
/// Panics when called outside a render pass.
pub fn use_state_with<T, F>(init: F) -> (T, StateSetter<T>)
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> T,
{
    let Some(hook) = RenderScope::claim_slot() else {
        panic!("use_state called outside of a render pass");
    };

    let value = match hook.slots.read::<T>(hook.index) {
        Ok(Some(value)) => value,
        Ok(None) => {
            let value = init();
            if let Err(e) = hook.slots.write(hook.index, value.clone()) {
                RenderScope::record_error(e);
            }
            value
        }
        Err(e) => {
            RenderScope::record_error(e);
            init()
        }
    };

    let setter = StateSetter {
        index: hook.index,
        slots: hook.slots,
        trigger: hook.trigger,
        _marker: PhantomData,
    };
    (value, setter)
}

/// Writes one state slot and re-renders its root.
///
/// Setters are stable: every render hands out a setter for the same slot
/// and root, and setters compare equal when they address the same slot.
pub struct StateSetter<T> {
    index: usize,
    slots: Arc<SlotStore>,
    trigger: Weak<dyn Rerender>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateSetter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Replace the value and re-render.
    pub fn set(&self, value: T) {
        if let Err(e) = self.slots.write(self.index, value) {
            error!(slot = self.index, error = %e, "state write failed");
            return;
        }
        self.trigger();
    }

    /// Compute the next value from the previous one and re-render.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let current = match self.slots.read::<T>(self.index) {
            Ok(Some(current)) => current,
            Ok(None) => {
                error!(slot = self.index, "state update on an empty slot");
                return;
            }
            Err(e) => {
                error!(slot = self.index, error = %e, "state read failed");
                return;
            }
        };
        self.set(f(&current));
    }

    /// Read the stored value without rendering.
    pub fn get(&self) -> Option<T> {
        self.slots.read::<T>(self.index).ok().flatten()
    }

    /// Slot index this setter writes.
    pub fn slot(&self) -> usize {
        self.index
    }

    fn trigger(&self) {
        let Some(root) = self.trigger.upgrade() else {
            debug!(slot = self.index, "root dropped, state change not rendered");
            return;
        };
        if let Err(e) = root.rerender() {
            error!(slot = self.index, error = %e, "re-render after state change failed");
        }
    }
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            slots: Arc::clone(&self.slots),
            trigger: self.trigger.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for StateSetter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && Arc::ptr_eq(&self.slots, &other.slots)
    }
}

impl<T> fmt::Debug for StateSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter").field("slot", &self.index).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::sync::atomic::{AtomicI32, Ordering};

    struct CountingRoot {
        renders: AtomicI32,
    }

    impl Rerender for CountingRoot {
        fn rerender(&self) -> Result<()> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pass<R>(root: &Arc<CountingRoot>, slots: &Arc<SlotStore>, body: impl FnOnce() -> R) -> R {
        let weak: Weak<dyn Rerender> = Arc::downgrade(root) as Weak<dyn Rerender>;
        let scope = RenderScope::enter(Arc::clone(slots), weak);
        let out = body();
        scope.finish();
        out
    }

    fn root() -> (Arc<CountingRoot>, Arc<SlotStore>) {
        (
            Arc::new(CountingRoot {
                renders: AtomicI32::new(0),
            }),
            Arc::new(SlotStore::new()),
        )
    }

    #[test]
    fn initial_value_is_stored_once() {
        let (root, slots) = root();

        let (first, _) = pass(&root, &slots, || use_state(1));
        slots.write(0, 7).unwrap();
        let (second, _) = pass(&root, &slots, || use_state(1));

        assert_eq!(first, 1);
        assert_eq!(second, 7);
    }

    #[test]
    fn lazy_initializer_runs_once() {
        let (root, slots) = root();
        let calls = AtomicI32::new(0);
        let init = || {
            calls.fetch_add(1, Ordering::SeqCst);
            String::from("x")
        };

        pass(&root, &slots, || use_state_with(init));
        pass(&root, &slots, || use_state_with(init));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn setter_writes_and_triggers() {
        let (root, slots) = root();
        let (_, set) = pass(&root, &slots, || use_state(0));

        set.set(1);
        set.set(2);

        assert_eq!(set.get(), Some(2));
        assert_eq!(root.renders.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn update_uses_previous_value() {
        let (root, slots) = root();
        let (_, set) = pass(&root, &slots, || use_state(10));

        set.update(|n| n + 5);

        assert_eq!(set.get(), Some(15));
        assert_eq!(root.renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn setters_are_stable_across_passes() {
        let (root, slots) = root();
        let (_, a) = pass(&root, &slots, || use_state(0));
        let (_, b) = pass(&root, &slots, || use_state(0));

        assert_eq!(a, b);
        assert_eq!(a.slot(), 0);
    }

    #[test]
    fn dropped_root_is_not_rendered() {
        let (root, slots) = root();
        let (_, set) = pass(&root, &slots, || use_state(0));
        drop(root);

        set.set(3);

        assert_eq!(set.get(), Some(3));
    }

    #[test]
    fn type_mismatch_is_recorded_on_the_scope() {
        let (root, slots) = root();
        pass(&root, &slots, || use_state(0i32));

        let weak: Weak<dyn Rerender> = Arc::downgrade(&root) as Weak<dyn Rerender>;
        let scope = RenderScope::enter(Arc::clone(&slots), weak);
        let (value, _) = use_state(String::from("fallback"));
        let summary = scope.finish();

        assert_eq!(value, "fallback");
        assert!(summary.error.is_some());
    }

    #[test]
    #[should_panic(expected = "outside of a render pass")]
    fn use_state_outside_render_panics() {
        let _ = use_state(0);
    }
}
