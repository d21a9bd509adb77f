//! Rotation alignment: orienting a pointer toward a moving target.
//!
//! The solver extracts an axis and angle from two direction vectors (cross
//! product for the axis, arc-cosine of the dot product for the angle) and
//! packs them into a quaternion. It is a pure function of its inputs,
//! invoked once per tracked target per tick.
//!
//! Both inputs must be expressed in the same coordinate space. The
//! simulation layer re-expresses the world-space offset to the target in
//! the pointer's parent space before calling in here.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use orrery_scene::NodeId;

use crate::error::{KinematicsError, KinematicsResult};

/// Dot-product margin below which two directions count as parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Length below which a vector cannot be normalized into a direction.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Compute the minimal rotation that maps `reference` onto `direction`.
///
/// Inputs need not be unit length; they are normalized here, and a
/// zero-length or non-finite input fails with
/// [`KinematicsError::DegenerateVector`]. The dot product is clamped to
/// `[-1, 1]` before the arc-cosine so near-unit inputs cannot produce NaN.
///
/// Edge cases are handled explicitly:
/// - parallel inputs return the identity rotation (the cross product
///   vanishes, so no axis can be extracted, and none is needed);
/// - anti-parallel inputs return a half-turn about a deterministic axis
///   perpendicular to `reference`.
pub fn rotation_between(reference: DVec3, direction: DVec3) -> KinematicsResult<DQuat> {
    let reference = normalize_direction(reference)?;
    let direction = normalize_direction(direction)?;

    let dot = reference.dot(direction).clamp(-1.0, 1.0);
    if dot >= 1.0 - PARALLEL_EPSILON {
        return Ok(DQuat::IDENTITY);
    }
    if dot <= -1.0 + PARALLEL_EPSILON {
        return Ok(DQuat::from_axis_angle(perpendicular_to(reference), PI));
    }

    let axis = reference.cross(direction).normalize();
    let angle = dot.acos();
    Ok(DQuat::from_axis_angle(axis, angle).normalize())
}

/// A pointer node tracking a target node.
///
/// Holds non-owning references into the scene graph plus the pointer's
/// built-in reference direction (for a cone modelled tip-up, `+Y`).
/// Carries no other state; the orientation is solved fresh each tick.
#[derive(Clone, Copy, Debug)]
pub struct AlignmentTarget {
    /// The node whose local rotation is overwritten each tick.
    pub pointer: NodeId,
    /// The pointer's built-in direction, in its local space.
    pub reference: DVec3,
    /// The node the pointer tracks.
    pub target: NodeId,
}

impl AlignmentTarget {
    /// Create an alignment target.
    pub fn new(pointer: NodeId, reference: DVec3, target: NodeId) -> Self {
        Self {
            pointer,
            reference,
            target,
        }
    }
}

fn normalize_direction(v: DVec3) -> KinematicsResult<DVec3> {
    let length = v.length();
    if !length.is_finite() || length < DEGENERATE_EPSILON {
        return Err(KinematicsError::DegenerateVector);
    }
    Ok(v / length)
}

/// A deterministic unit vector perpendicular to `v` (assumed unit length).
///
/// Crosses `v` with the coordinate axis along its smallest-magnitude
/// component, which can never be parallel to `v`.
fn perpendicular_to(v: DVec3) -> DVec3 {
    let ax = v.x.abs();
    let ay = v.y.abs();
    let az = v.z.abs();
    let helper = if ax <= ay && ax <= az {
        DVec3::X
    } else if ay <= az {
        DVec3::Y
    } else {
        DVec3::Z
    };
    v.cross(helper).normalize()
}
