//! The simulation context: one owned scene, ticked by the host driver.
//!
//! Control flow per tick: orbital kinematics update body-local transforms,
//! then the alignment solver re-orients pointer nodes from the freshly
//! composed world transforms, and finally the (external) renderer reads
//! [`Simulation::world_transform`] for every node it draws. The whole
//! structure is owned and mutated by the single ticking thread; there is
//! no hidden cross-tick state beyond the hierarchy and each body's
//! accumulated spin.

use glam::DQuat;
use tracing::{debug, trace};

use orrery_kinematics::{AlignmentTarget, OrbitingBody, rotation_between};
use orrery_scene::{NodeId, SceneError, SceneGraph, Transform};

use crate::error::{SimError, SimResult};
use crate::gate::ReadinessGate;

/// An owned scene graph plus the bodies and pointers animating it.
///
/// Constructed at scene-build time, mutated every tick, discarded at scene
/// teardown. There is deliberately no ambient or static state: every entry
/// point takes the context explicitly.
#[derive(Debug)]
pub struct Simulation<P> {
    graph: SceneGraph<P>,
    bodies: Vec<OrbitingBody>,
    targets: Vec<AlignmentTarget>,
    gate: ReadinessGate,
}

impl<P> Simulation<P> {
    /// Create a simulation around an existing scene graph.
    pub fn new(graph: SceneGraph<P>) -> Self {
        Self {
            graph,
            bodies: Vec::new(),
            targets: Vec::new(),
            gate: ReadinessGate::new(),
        }
    }

    /// Shared access to the scene graph.
    pub fn graph(&self) -> &SceneGraph<P> {
        &self.graph
    }

    /// Exclusive access to the scene graph, for scene construction and
    /// for asset collaborators inserting loaded models.
    pub fn graph_mut(&mut self) -> &mut SceneGraph<P> {
        &mut self.graph
    }

    /// Register an orbiting body.
    ///
    /// Fails if the orbit parameters are unusable or the referenced node
    /// is not in the graph.
    pub fn add_body(&mut self, body: OrbitingBody) -> SimResult<()> {
        body.orbit.validate()?;
        if !self.graph.contains(body.node) {
            return Err(SceneError::Dangling(body.node).into());
        }
        debug!(node = ?body.node, radius = body.orbit.radius, period = body.orbit.period, "registered orbiting body");
        self.bodies.push(body);
        Ok(())
    }

    /// Register a pointer node that tracks a target node.
    pub fn track(&mut self, target: AlignmentTarget) -> SimResult<()> {
        for node in [target.pointer, target.target] {
            if !self.graph.contains(node) {
                return Err(SceneError::Dangling(node).into());
            }
        }
        debug!(pointer = ?target.pointer, target = ?target.target, "registered alignment target");
        self.targets.push(target);
        Ok(())
    }

    /// Require `node`'s payload to signal readiness before ticking.
    pub fn require_ready(&mut self, node: NodeId) {
        self.gate.require(node);
    }

    /// Signal that `node`'s payload finished loading.
    pub fn signal_ready(&mut self, node: NodeId) {
        if self.gate.signal_ready(node) {
            debug!(?node, pending = self.gate.pending(), "node payload ready");
        }
    }

    /// Whether the driver may start ticking.
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// A node's world transform, for the renderer.
    pub fn world_transform(&self, node: NodeId) -> SimResult<Transform> {
        Ok(self.graph.world_transform(node)?)
    }

    /// Advance the simulation to `time` seconds, `delta` seconds after
    /// the previous tick.
    ///
    /// Updates every orbiting body's local transform, then re-solves every
    /// alignment target. Fails with [`SimError::NotReady`] while required
    /// payloads are still loading, and fails fast on the first dangling
    /// node or degenerate direction; nothing is silently skipped.
    pub fn tick(&mut self, time: f64, delta: f64) -> SimResult<()> {
        if !self.gate.is_ready() {
            return Err(SimError::NotReady {
                pending: self.gate.pending(),
            });
        }

        for body in &mut self.bodies {
            body.advance_spin(delta);
            let local = self.graph.local_transform_mut(body.node)?;
            local.translation = body.orbit.position_at(time);
            // The plane tilt is a build-time constant carried on this
            // node for its children's orbits; only the spin varies.
            local.rotation = body.orbit.plane_rotation() * body.spin_rotation();
        }

        for target in &self.targets {
            let rotation = solve_pointer(&self.graph, target)?;
            self.graph.local_transform_mut(target.pointer)?.rotation = rotation;
        }

        trace!(time, delta, bodies = self.bodies.len(), targets = self.targets.len(), "tick complete");
        Ok(())
    }
}

/// Solve one pointer's local rotation.
///
/// The world-space offset from the pointer to its target is re-expressed
/// in the pointer's parent space, so both solver inputs live in the space
/// the pointer's local rotation acts in.
fn solve_pointer<P>(graph: &SceneGraph<P>, target: &AlignmentTarget) -> SimResult<DQuat> {
    let target_position = graph.world_transform(target.target)?.translation;
    let pointer_position = graph.world_transform(target.pointer)?.translation;
    let offset = target_position - pointer_position;

    let direction = match graph.parent(target.pointer)? {
        Some(parent) => {
            let parent_world = graph.world_transform(parent)?;
            let inverse = parent_world
                .try_inverse()
                .ok_or(SceneError::NonInvertible(parent))?;
            inverse.transform_vector(offset)
        }
        None => offset,
    };

    Ok(rotation_between(target.reference, direction)?)
}
