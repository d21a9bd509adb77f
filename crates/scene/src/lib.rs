//! Scene graph and transforms.
//!
//! This crate provides the transform hierarchy:
//! - Transform value type (translation, rotation, scale)
//! - Scene graph with parent/child links and world-transform composition
//! - Error types for hierarchy misuse

pub mod error;
pub mod graph;
pub mod transform;

pub use error::{SceneError, SceneResult};
pub use graph::{NodeId, SceneGraph};
pub use transform::Transform;
