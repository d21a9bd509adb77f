//! Error types for kinematics operations.

use thiserror::Error;

/// Error type for orbital and alignment math.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum KinematicsError {
    /// A zero-length (or non-finite) vector was passed where a direction
    /// was required.
    #[error("zero-length vector where a direction was required")]
    DegenerateVector,

    /// An orbital period must be positive to define an angular velocity.
    #[error("orbital period must be positive, got {0}")]
    NonPositivePeriod(f64),
}

/// Result type alias for kinematics operations.
pub type KinematicsResult<T> = Result<T, KinematicsError>;
