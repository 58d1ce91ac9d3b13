//! Rigid-body physics for a submersible vehicle.
//!
//! A single free-floating 6 DOF body in a uniform fluid: gravity,
//! depth-ramped buoyancy with a righting torque, quadratic drag, and a
//! semi-implicit Euler integrator run at a fixed 120 Hz step. There is
//! no collision detection and no constraint solving; the manipulator
//! arm is a set of kinematic joint angles, not simulated links.

// Recommended alias.
extern crate nalgebra as na;

pub mod body;
pub mod stepper;

pub use body::{ArmJoints, RigidBody, RovParams, Wrench};
pub use stepper::advance;

/// Gravitational acceleration, m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Density of the surrounding water, kg/m^3.
pub const WATER_DENSITY: f64 = 1000.0;

/// Height of the water surface in world space. Buoyancy only acts
/// below this.
pub const WATER_LEVEL: f64 = 0.0;

/// Alpha used when rendering the water surface.
pub const WATER_OPACITY: f32 = 0.4;

/// Physics runs at 120 Hz, decoupled from the render rate.
pub const FIXED_PHYSICS_STEP: f64 = 1.0 / 120.0;
