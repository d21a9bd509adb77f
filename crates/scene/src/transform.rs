//! Transform value type for scene nodes.
//!
//! This module provides the [`Transform`] struct for representing
//! translation, rotation, and scale of scene nodes. A node's placement in
//! the world is obtained by composing its local transform with all of its
//! ancestors' transforms; the composition itself lives here, while the
//! parent/child bookkeeping lives in [`crate::SceneGraph`].
//!
//! # Example
//!
//! ```
//! use orrery_scene::Transform;
//! use glam::DVec3;
//!
//! let parent = Transform::new().with_translation(DVec3::new(1.0, 0.0, 0.0));
//! let child = Transform::new().with_translation(DVec3::new(0.0, 1.0, 0.0));
//!
//! // The child expressed in the parent's space sits at (1, 1, 0).
//! let world = parent.compose(&child);
//! assert_eq!(world.translation, DVec3::new(1.0, 1.0, 0.0));
//! ```

use glam::{DMat4, DQuat, DVec3};

/// A transform representing translation, rotation, and scale.
///
/// Immutable value semantics: operations return new instances. The core
/// runs in `f64`; a GPU-facing consumer converts to `f32` at its own
/// boundary via [`Transform::matrix`].
///
/// Composition follows the TRS convention (scale, then rotate, then
/// translate). Shear arising from rotating a non-uniform scale is not
/// representable; [`Transform::try_inverse`] is exact for rotation-free or
/// uniformly scaled transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent space.
    pub translation: DVec3,
    /// Rotation as a unit quaternion.
    pub rotation: DQuat,
    /// Component-wise scale factor.
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform: no translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Create a new identity transform.
    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Create a transform with the given translation.
    pub fn from_translation(translation: DVec3) -> Self {
        Self::IDENTITY.with_translation(translation)
    }

    /// Create a transform with the given rotation.
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self::IDENTITY.with_rotation(rotation)
    }

    /// Return this transform with the given translation.
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    /// Return this transform with the given rotation.
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Return this transform with the given scale.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Return this transform with a uniform scale factor.
    pub fn with_uniform_scale(self, scale: f64) -> Self {
        self.with_scale(DVec3::splat(scale))
    }

    /// Compose this transform with a child transform.
    ///
    /// `parent.compose(&child)` expresses `child` in the parent's
    /// coordinate space: the parent's scale/rotation/translation apply
    /// first, then the child's in the resulting space. This matches
    /// multiplying the corresponding matrices, `parent * child`.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Compute the inverse transform, if one exists.
    ///
    /// Returns `None` when any scale component is (near) zero. The result
    /// is exact for rotation-free or uniformly scaled transforms; under
    /// the TRS convention a rotated non-uniform scale has no exact TRS
    /// inverse.
    pub fn try_inverse(&self) -> Option<Transform> {
        const EPSILON: f64 = 1e-12;
        if self.scale.abs().min_element() < EPSILON {
            return None;
        }
        let inv_scale = self.scale.recip();
        let inv_rotation = self.rotation.inverse();
        Some(Transform {
            translation: -(inv_scale * (inv_rotation * self.translation)),
            rotation: inv_rotation,
            scale: inv_scale,
        })
    }

    /// Apply this transform to a point (scale, rotate, then translate).
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    /// Apply this transform to a direction vector (no translation).
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.rotation * (self.scale * vector)
    }

    /// Get the equivalent 4x4 column-major matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// Get the right direction vector.
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Get the up direction vector.
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }
}
