//! Time-parametric orbital motion.
//!
//! A body's orbit is expressed in its own parent's space: the translation
//! sweeps a circle in the parent's XZ plane, while the body's own rotation
//! carries a fixed axial tilt plus its integrated spin. Nesting bodies (a
//! moon inside a tilted planet group inside a star's scene) composes
//! through the scene graph, which is what makes the tree model necessary
//! in the first place.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use orrery_scene::NodeId;

use crate::error::{KinematicsError, KinematicsResult};

/// Parameters of a circular orbit in the parent group's plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    /// Orbit radius, in scene units.
    pub radius: f64,
    /// Seconds per full revolution.
    pub period: f64,
    /// Phase offset in radians, added to the swept angle.
    pub phase: f64,
    /// Axial tilt in radians about Z, carried on this node's local
    /// rotation. The node's own orbit is unaffected (its translation is
    /// expressed in the parent's space); what the tilt leans over is the
    /// plane in which this node's *children* orbit and spin, the way a
    /// planet's axial tilt carries its moons' orbital plane along.
    pub tilt: f64,
}

impl OrbitParams {
    /// Create orbit parameters with no phase offset and no tilt.
    pub fn new(radius: f64, period: f64) -> Self {
        Self {
            radius,
            period,
            phase: 0.0,
            tilt: 0.0,
        }
    }

    /// Return these parameters with the given phase offset in radians.
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Return these parameters with the given plane tilt in radians.
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }

    /// Check that the parameters define a usable orbit.
    pub fn validate(&self) -> KinematicsResult<()> {
        if !(self.period > 0.0) {
            return Err(KinematicsError::NonPositivePeriod(self.period));
        }
        Ok(())
    }

    /// The swept angle at simulation time `t` seconds.
    pub fn angle_at(&self, t: f64) -> f64 {
        TAU * t / self.period + self.phase
    }

    /// The body's position in its orbit group at simulation time `t`.
    ///
    /// Deterministic in `t` and the parameters: the position is a pure
    /// function of the angle, not an integration.
    pub fn position_at(&self, t: f64) -> DVec3 {
        let angle = self.angle_at(t);
        DVec3::new(self.radius * angle.cos(), 0.0, self.radius * angle.sin())
    }

    /// The fixed rotation tilting the plane this node provides for its
    /// children. Constant across ticks.
    pub fn plane_rotation(&self) -> DQuat {
        DQuat::from_rotation_z(self.tilt)
    }
}

/// A body on an orbit, with an independent axial spin.
///
/// Holds a non-owning reference to its scene node; the accumulated spin
/// angle is the only cross-tick state.
#[derive(Clone, Copy, Debug)]
pub struct OrbitingBody {
    /// The scene node this body drives.
    pub node: NodeId,
    /// Orbit parameters, fixed for the body's lifetime.
    pub orbit: OrbitParams,
    /// Axial spin rate in radians per second about the body's local Y.
    pub spin_rate: f64,
    spin: f64,
}

impl OrbitingBody {
    /// Create a body with no axial spin.
    pub fn new(node: NodeId, orbit: OrbitParams) -> Self {
        Self {
            node,
            orbit,
            spin_rate: 0.0,
            spin: 0.0,
        }
    }

    /// Return this body with the given spin rate in radians per second.
    pub fn with_spin_rate(mut self, spin_rate: f64) -> Self {
        self.spin_rate = spin_rate;
        self
    }

    /// The accumulated spin angle, always in `[0, TAU)`.
    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Integrate the axial spin over `delta` seconds.
    ///
    /// The angle is wrapped into `[0, TAU)` each step so it never grows
    /// without bound.
    pub fn advance_spin(&mut self, delta: f64) {
        self.spin = (self.spin + self.spin_rate * delta).rem_euclid(TAU);
    }

    /// The body's local rotation from its accumulated spin.
    pub fn spin_rotation(&self) -> DQuat {
        DQuat::from_rotation_y(self.spin)
    }
}
