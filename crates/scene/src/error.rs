//! Error types for scene graph operations.

use thiserror::Error;

use crate::graph::NodeId;

/// Error type for scene graph operations.
///
/// All variants are local-precondition violations: they signal a caller
/// logic error, are reported synchronously at the offending call, and are
/// never retried by the core.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching `child` under `parent` would create a cycle, because
    /// `child` is `parent` itself or one of its ancestors.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The node that was going to be re-parented.
        child: NodeId,
        /// The prospective parent.
        parent: NodeId,
    },

    /// The node is not in the graph: it was removed, or the id is stale.
    #[error("node {0:?} is not in the graph (removed or stale id)")]
    Dangling(NodeId),

    /// The node's world transform has a zero scale component and cannot
    /// be inverted for a world-preserving re-parent.
    #[error("world transform of {0:?} is not invertible")]
    NonInvertible(NodeId),
}

/// Result type alias for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;
