//! Render Driver
//!
//! A [`RenderContext`] owns everything one mounted root needs: the display
//! tree host, the root component, the state slots, and the previous tree.
//!
//! # How It Works
//!
//! 1. `mount` runs a render pass and mounts the resulting tree into the
//!    container. The tree becomes the previous tree.
//!
//! 2. A state setter writes its slot and calls back into the context.
//!
//! 3. The context runs a new render pass, diffs it against the previous
//!    tree, applies the changes, and keeps the new tree as the baseline.
//!
//! A render pass calls the root component inside a fresh render scope and
//! expands every nested component, so the trees that get diffed contain
//! only elements and text, and every component's hooks run on every pass.
//!
//! # Locking
//!
//! No lock is held while components or event handlers run. A handler that
//! calls a setter re-enters the context without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::scope::RenderScope;
use super::slots::SlotStore;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::node::{Component, Event, NodeDescription};
use crate::render;

/// Something a state setter can re-render.
pub(crate) trait Rerender: Send + Sync {
    /// Run a full diff-and-patch cycle.
    fn rerender(&self) -> Result<()>;
}

/// Render state of one mounted root.
///
/// Cloning shares the same root.
pub struct RenderContext<H: Host> {
    inner: Arc<ContextInner<H>>,
}

struct ContextInner<H: Host> {
    this: Weak<ContextInner<H>>,
    host: Mutex<H>,
    root: Component,
    config: RenderConfig,
    slots: Arc<SlotStore>,
    container: Mutex<Option<H::Handle>>,
    previous: Mutex<Option<Arc<NodeDescription>>>,
    /// Hook calls made by the last successful pass.
    hook_count: Mutex<Option<usize>>,
    rerenders: AtomicU64,
}

impl<H> RenderContext<H>
where
    H: Host + Send + 'static,
    H::Handle: Send + 'static,
{
    /// Create a context rendering `root` into `host` with default options.
    pub fn new(host: H, root: Component) -> Self {
        Self::with_config(host, root, RenderConfig::default())
    }

    pub fn with_config(host: H, root: Component, config: RenderConfig) -> Self {
        let inner = Arc::new_cyclic(|this| ContextInner {
            this: this.clone(),
            host: Mutex::new(host),
            root,
            config,
            slots: Arc::new(SlotStore::new()),
            container: Mutex::new(None),
            previous: Mutex::new(None),
            hook_count: Mutex::new(None),
            rerenders: AtomicU64::new(0),
        });
        Self { inner }
    }

    /// First paint into `container`.
    ///
    /// An absent container is a no-op. Mounting an already mounted root
    /// re-renders it instead.
    pub fn mount(&self, container: Option<H::Handle>) -> Result<()> {
        self.inner.mount(container)
    }

    /// Recompute the tree and patch the display tree.
    ///
    /// A no-op before the first mount.
    pub fn rerender(&self) -> Result<()> {
        self.inner.rerender()
    }

    /// Deliver `event` to the listeners registered on `target`.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, target: &H::Handle, event: &str) -> usize {
        let handlers = self.inner.host.lock().listeners(target, event);
        let event = Event::new(event);
        for handler in &handlers {
            handler.call(&event);
        }
        handlers.len()
    }

    /// Read the display tree.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.host.lock())
    }

    /// The tree the next diff will compare against.
    pub fn previous_tree(&self) -> Option<Arc<NodeDescription>> {
        self.inner.previous.lock().clone()
    }

    pub fn container(&self) -> Option<H::Handle> {
        self.inner.container.lock().clone()
    }

    /// Number of completed diff-and-patch cycles.
    pub fn rerender_count(&self) -> u64 {
        self.inner.rerenders.load(Ordering::SeqCst)
    }

    /// Number of state slots created so far.
    pub fn slot_count(&self) -> usize {
        self.inner.slots.len()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.inner.config
    }
}

impl<H: Host> Clone for RenderContext<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Host> std::fmt::Debug for RenderContext<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("root", &self.inner.root)
            .field("slots", &self.inner.slots)
            .field("rerenders", &self.inner.rerenders.load(Ordering::Relaxed))
            .finish()
    }
}

impl<H> ContextInner<H>
where
    H: Host + Send + 'static,
    H::Handle: Send + 'static,
{
    fn mount(&self, container: Option<H::Handle>) -> Result<()> {
        let Some(container) = container else {
            debug!(root = self.root.name(), "no container, skipping mount");
            return Ok(());
        };
        if self.previous.lock().is_some() {
            debug!(root = self.root.name(), "already mounted, re-rendering");
            return self.rerender();
        }

        let tree = self.render_pass()?;
        render::mount(&mut *self.host.lock(), &tree, Some(&container), &self.config)?;

        debug!(root = self.root.name(), nodes = tree.subtree_size(), "mounted root");
        *self.container.lock() = Some(container);
        *self.previous.lock() = Some(Arc::new(tree));
        Ok(())
    }

    /// Call the root inside a fresh scope and expand nested components.
    fn render_pass(&self) -> Result<NodeDescription> {
        let trigger: Weak<dyn Rerender> = self.this.clone();
        let scope = RenderScope::enter(Arc::clone(&self.slots), trigger);
        let resolved = render::resolve(NodeDescription::component(&self.root), &self.config);
        let summary = scope.finish();

        let tree = resolved?;
        if let Some(error) = summary.error {
            return Err(error);
        }
        self.check_hook_count(summary.hooks)?;
        Ok(tree)
    }

    fn check_hook_count(&self, current: usize) -> Result<()> {
        let mut hook_count = self.hook_count.lock();
        match *hook_count {
            Some(previous) if previous != current => {
                if self.config.strict_hook_order {
                    return Err(Error::HookOrderViolation { previous, current });
                }
                warn!(previous, current, "hook call count changed between renders");
            }
            _ => {}
        }
        *hook_count = Some(current);
        Ok(())
    }
}

impl<H> Rerender for ContextInner<H>
where
    H: Host + Send + 'static,
    H::Handle: Send + 'static,
{
    fn rerender(&self) -> Result<()> {
        let mounted = self.previous.lock().clone().zip(self.container.lock().clone());
        let Some((previous, container)) = mounted else {
            debug!(root = self.root.name(), "not mounted, skipping re-render");
            return Ok(());
        };

        let tree = self.render_pass()?;
        let changes = render::diff(&previous, &tree);
        let report = render::apply(&mut *self.host.lock(), &container, &changes, &self.config)?;

        *self.previous.lock() = Some(Arc::new(tree));
        let cycle = self.rerenders.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            root = self.root.name(),
            cycle,
            changes = changes.len(),
            applied = report.applied,
            skipped = report.skipped,
            "re-render complete"
        );
        Ok(())
    }
}
