//! Per-attempt context.

use std::fmt::Display;

use tracing::{debug, info};

use crate::relation::RelationName;

/// Context carried through one refresh attempt.
///
/// `announce` decides whether events surface on the operator-visible
/// channel (`info`) or only in the trace (`debug`).
#[derive(Debug, Clone)]
pub struct RefreshContext {
    /// The relation being refreshed.
    pub target: RelationName,
    /// Emit events at `info` rather than `debug`.
    pub announce: bool,
}

impl RefreshContext {
    /// Creates a context for `target` that announces its events.
    #[must_use]
    pub fn new(target: RelationName) -> Self {
        Self {
            target,
            announce: true,
        }
    }

    /// Sets whether events are announced.
    #[must_use]
    pub fn announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// Emits an event about the target.
    pub fn event(&self, message: impl Display) {
        if self.announce {
            info!(relation = %self.target, "{message}");
        } else {
            debug!(relation = %self.target, "{message}");
        }
    }
}
