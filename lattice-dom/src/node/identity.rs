//! Node identity tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::reactive::RenderScope;

/// First identity handed out outside of a render pass.
///
/// Render scopes count up from 1 on every pass, so detached trees built
/// outside a pass draw from a separate range and never collide with them.
const DETACHED_BASE: u64 = 1 << 48;

/// Identity token of a node description.
///
/// Assigned once when the description is constructed and mirrored onto the
/// display element it produces. Two descriptions are the same logical node
/// across renders iff their identities match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(u64);

impl Identity {
    /// Allocate the next identity.
    ///
    /// Inside a render pass this comes from the active scope, which restarts
    /// its count on every pass so identities line up between renders.
    /// Outside a pass it comes from a process-wide counter.
    pub fn next() -> Self {
        RenderScope::next_identity().unwrap_or_else(Self::detached)
    }

    /// Allocate an identity from the process-wide counter.
    pub fn detached() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(DETACHED_BASE);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw token value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Identity {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
