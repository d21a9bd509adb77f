//! Error types for the simulation layer.

use orrery_kinematics::KinematicsError;
use orrery_scene::SceneError;
use thiserror::Error;

/// Error type for simulation operations.
///
/// A tick that returns an error indicates a caller logic error (a removed
/// node still referenced, a degenerate direction) or a driver protocol
/// violation (ticking before readiness). The core attempts no recovery;
/// the host decides whether to fail the frame or log and skip.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// A scene graph operation failed.
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Orbital or alignment math received a degenerate input.
    #[error("kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),

    /// The driver ticked before all required node payloads were ready.
    #[error("simulation not ready: {pending} node payload(s) still loading")]
    NotReady {
        /// How many required payloads have not signalled readiness yet.
        pending: usize,
    },
}

/// Result type alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
