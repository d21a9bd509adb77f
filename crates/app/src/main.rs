//! Orrery demo - Main Entry Point
//!
//! Builds the classic solar-system scene (a sun, an earth group on a
//! tilted axis, an orbiting moon, and two pointer cones tracking the moon
//! and the sun) and drives it headlessly with a fixed-timestep loop. A
//! renderer would read `world_transform` for every node after each tick;
//! here we log the positions instead.

use anyhow::Result;
use glam::DVec3;
use tracing::{debug, info};

use orrery_core::Timer;
use orrery_kinematics::{AlignmentTarget, OrbitParams, OrbitingBody};
use orrery_scene::{NodeId, SceneGraph, Transform};
use orrery_sim::Simulation;

/// What each node stands for. A real renderer would key its drawables,
/// lights, and cameras off this; the simulation core never looks inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Payload {
    Scene,
    Group,
    Star,
    Planet,
    Moon,
    Pointer,
    Cone,
}

/// Scene constants lifted from the original demo: orbit radii, the
/// earth's axial tilt, and per-frame spin converted to radians per second.
const EARTH_RANGE: f64 = 10.0;
const MOON_RANGE: f64 = 2.75;
const EARTH_ANGULAR_VELOCITY: f64 = 0.5;
const MOON_ANGULAR_VELOCITY: f64 = 1.0;
const EARTH_SPIN_RATE: f64 = 1.2;
const AXIAL_TILT_DEGREES: f64 = -23.4;

const FRAME_DT: f64 = 1.0 / 60.0;
const FRAMES: u32 = 600;

struct SolarSystem {
    sim: Simulation<Payload>,
    earth_group: NodeId,
    earth: NodeId,
    moon: NodeId,
}

fn build_solar_system() -> Result<SolarSystem> {
    let mut graph = SceneGraph::new();
    let root = graph.insert(Payload::Scene, Transform::IDENTITY);
    let sun = graph.insert_child(root, Payload::Star, Transform::new().with_uniform_scale(2.0))?;
    let earth_group = graph.insert_child(root, Payload::Group, Transform::IDENTITY)?;
    let earth = graph.insert_child(earth_group, Payload::Planet, Transform::IDENTITY)?;
    let moon = graph.insert_child(
        earth_group,
        Payload::Moon,
        Transform::new().with_uniform_scale(0.36),
    )?;

    // Each pointer is a group at the earth's center with a cone modelled
    // tip-up, so the cone's +Y is the alignment reference direction.
    let moon_pointer = graph.insert_child(earth_group, Payload::Pointer, Transform::IDENTITY)?;
    graph.insert_child(moon_pointer, Payload::Cone, Transform::from_translation(DVec3::Y))?;
    let sun_pointer = graph.insert_child(earth_group, Payload::Pointer, Transform::IDENTITY)?;
    graph.insert_child(sun_pointer, Payload::Cone, Transform::from_translation(DVec3::Y))?;

    let mut sim = Simulation::new(graph);
    sim.add_body(OrbitingBody::new(
        earth_group,
        OrbitParams::new(EARTH_RANGE, std::f64::consts::TAU / EARTH_ANGULAR_VELOCITY)
            .with_tilt(AXIAL_TILT_DEGREES.to_radians()),
    ))?;
    sim.add_body(
        OrbitingBody::new(earth, OrbitParams::new(0.0, std::f64::consts::TAU))
            .with_spin_rate(EARTH_SPIN_RATE),
    )?;
    sim.add_body(OrbitingBody::new(
        moon,
        OrbitParams::new(MOON_RANGE, std::f64::consts::TAU / MOON_ANGULAR_VELOCITY),
    ))?;
    sim.track(AlignmentTarget::new(moon_pointer, DVec3::Y, moon))?;
    sim.track(AlignmentTarget::new(sun_pointer, DVec3::Y, sun))?;

    Ok(SolarSystem {
        sim,
        earth_group,
        earth,
        moon,
    })
}

fn main() -> Result<()> {
    // Initialize logging
    orrery_core::init_logging();
    info!("Starting orrery demo");

    let mut system = build_solar_system()?;

    // The earth and moon textures load asynchronously in the original
    // demo; the driver may not tick until both signals have fired. Here
    // the "loader" completes immediately.
    system.sim.require_ready(system.earth);
    system.sim.require_ready(system.moon);
    debug!("waiting for payloads");
    system.sim.signal_ready(system.earth);
    system.sim.signal_ready(system.moon);
    info!("all payloads ready, entering main loop");

    let timer = Timer::new();
    for frame in 0..FRAMES {
        let time = f64::from(frame) * FRAME_DT;
        system.sim.tick(time, FRAME_DT)?;

        if frame % 60 == 0 {
            let earth = system.sim.world_transform(system.earth_group)?.translation;
            let moon = system.sim.world_transform(system.moon)?.translation;
            info!(
                time,
                earth = %format_args!("({:.2}, {:.2}, {:.2})", earth.x, earth.y, earth.z),
                moon = %format_args!("({:.2}, {:.2}, {:.2})", moon.x, moon.y, moon.z),
                "orbit state"
            );
        }
    }

    info!(
        frames = FRAMES,
        wall_secs = timer.elapsed_secs(),
        nodes = system.sim.graph().len(),
        "demo complete"
    );
    Ok(())
}
