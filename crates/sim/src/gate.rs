//! Readiness gating for asynchronously loaded node payloads.
//!
//! Asset loading happens outside the core; the simulation only needs the
//! completion signals. A node registered here counts as pending until its
//! payload signals ready, and the simulation refuses to tick while any
//! registered node is still pending.

use std::collections::HashSet;

use orrery_scene::NodeId;

/// Tracks which node payloads are still loading.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    pending: HashSet<NodeId>,
}

impl ReadinessGate {
    /// Create a gate with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node whose payload must signal readiness before the
    /// simulation may tick.
    pub fn require(&mut self, node: NodeId) {
        self.pending.insert(node);
    }

    /// Signal that a node's payload finished loading. Returns `true` if
    /// the node was pending.
    pub fn signal_ready(&mut self, node: NodeId) -> bool {
        self.pending.remove(&node)
    }

    /// Whether every required payload has signalled readiness.
    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }

    /// How many required payloads are still pending.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
