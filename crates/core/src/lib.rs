//! Core utilities for the orrery simulation.
//!
//! This crate provides foundational types used across the workspace:
//! - Logging initialization
//! - Timer utilities (the simulation's monotonic time source)

mod logging;
mod timer;

pub use logging::init_logging;
pub use timer::Timer;
