//! Vehicle state and physical parameters.

use bevy::prelude::*;
use na::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Kinematic joint angles for the 3 DOF manipulator arm, radians.
///
/// These are driven directly from input and clamped to the mechanical
/// range; they never enter the rigid-body integration.
#[derive(Debug, Clone, Copy)]
pub struct ArmJoints {
    pub base_yaw: f64,
    pub shoulder_pitch: f64,
    pub elbow_pitch: f64,
}

impl ArmJoints {
    pub const BASE_YAW_RANGE: (f64, f64) = (-1.5, 1.5);
    pub const SHOULDER_RANGE: (f64, f64) = (-1.0, 1.0);
    pub const ELBOW_RANGE: (f64, f64) = (-2.0, 0.0);

    /// Pull every joint back into its mechanical range.
    pub fn clamp(&mut self) {
        self.base_yaw = self
            .base_yaw
            .clamp(Self::BASE_YAW_RANGE.0, Self::BASE_YAW_RANGE.1);
        self.shoulder_pitch = self
            .shoulder_pitch
            .clamp(Self::SHOULDER_RANGE.0, Self::SHOULDER_RANGE.1);
        self.elbow_pitch = self
            .elbow_pitch
            .clamp(Self::ELBOW_RANGE.0, Self::ELBOW_RANGE.1);
    }
}

impl Default for ArmJoints {
    fn default() -> Self {
        ArmJoints {
            base_yaw: 0.0,
            shoulder_pitch: 0.0,
            elbow_pitch: -0.5,
        }
    }
}

/// A force/torque pair in world space.
///
/// The driver builds one of these per render frame from the control
/// input and feeds the same wrench into every physics sub-step that
/// runs within the frame, so control authority does not depend on how
/// many sub-steps a frame needs.
#[derive(Debug, Clone, Copy)]
pub struct Wrench {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Default for Wrench {
    fn default() -> Self {
        Wrench {
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }
}

/// Physical parameters of the vehicle hull.
///
/// All values are SI. Inertia components are used as divisors and must
/// stay strictly positive; that is a construction-time contract, not a
/// runtime check.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct RovParams {
    /// Vehicle mass, kg.
    pub mass: f64,
    /// Displaced volume at full submersion, m^3.
    pub volume: f64,
    /// Diagonal principal moments of inertia, body frame.
    pub inertia: Vector3<f64>,
    /// Per-axis quadratic drag coefficients, body frame.
    pub linear_drag: Vector3<f64>,
    pub angular_drag: Vector3<f64>,
    /// Center of buoyancy offset from the center of mass, body frame.
    /// Positive Y puts the COB above the COM, which rights a tipped
    /// hull.
    pub cob_offset: Vector3<f64>,
}

impl Default for RovParams {
    fn default() -> Self {
        RovParams {
            mass: 30.0,
            volume: 0.035,
            inertia: Vector3::new(5.0, 5.0, 5.0),
            linear_drag: Vector3::new(300.0, 400.0, 300.0),
            angular_drag: Vector3::new(150.0, 150.0, 150.0),
            cob_offset: Vector3::new(0.0, 0.1, 0.0),
        }
    }
}

/// Full 6 DOF state of one vehicle, mutated in place by
/// [`crate::stepper::advance`].
///
/// The force/torque accumulators collect world-space contributions for
/// the *current* sub-step only; `advance` consumes and zeroes them, so
/// they are zero whenever a step is not in flight.
#[derive(Debug, Clone, Component)]
pub struct RigidBody {
    /// World-space center of mass. Y is up; the water surface is at
    /// y = 0.
    pub position: Vector3<f64>,
    /// World-space linear velocity.
    pub velocity: Vector3<f64>,
    /// Derived output, recomputed each step.
    pub acceleration: Vector3<f64>,

    /// Orientation, body -> world. Renormalized after every rotational
    /// update.
    pub orientation: UnitQuaternion<f64>,
    /// World-space angular velocity.
    pub angular_velocity: Vector3<f64>,
    /// Derived output, recomputed each step.
    pub angular_acceleration: Vector3<f64>,

    pub arm: ArmJoints,

    pub force_accum: Vector3<f64>,
    pub torque_accum: Vector3<f64>,
}

impl RigidBody {
    /// A body at rest at `position`, upright, arm in the stowed pose.
    pub fn new(position: Vector3<f64>) -> Self {
        RigidBody {
            position,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            angular_acceleration: Vector3::zeros(),
            arm: ArmJoints::default(),
            force_accum: Vector3::zeros(),
            torque_accum: Vector3::zeros(),
        }
    }

    /// Accumulate a world-space force for the current step.
    pub fn add_force(&mut self, force: Vector3<f64>) {
        self.force_accum += force;
    }

    /// Accumulate a world-space torque for the current step.
    pub fn add_torque(&mut self, torque: Vector3<f64>) {
        self.torque_accum += torque;
    }

    /// Accumulate a whole wrench at once.
    pub fn add_wrench(&mut self, wrench: &Wrench) {
        self.add_force(wrench.force);
        self.add_torque(wrench.torque);
    }

    /// Body forward axis (+Z) in world space.
    pub fn forward(&self) -> Vector3<f64> {
        self.orientation * Vector3::z()
    }

    /// Body right axis (+X) in world space.
    pub fn right(&self) -> Vector3<f64> {
        self.orientation * Vector3::x()
    }

    /// Body up axis (+Y) in world space.
    pub fn up(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Depth below the water surface, meters. Negative above water.
    pub fn depth(&self) -> f64 {
        crate::WATER_LEVEL - self.position.y
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        RigidBody::new(Vector3::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_clamps_hold_after_large_deltas() {
        let mut arm = ArmJoints::default();
        arm.base_yaw += 10.0;
        arm.shoulder_pitch -= 10.0;
        arm.elbow_pitch -= 10.0;
        arm.clamp();
        assert_eq!(arm.base_yaw, 1.5);
        assert_eq!(arm.shoulder_pitch, -1.0);
        assert_eq!(arm.elbow_pitch, -2.0);

        arm.elbow_pitch += 10.0;
        arm.clamp();
        assert_eq!(arm.elbow_pitch, 0.0);
    }

    #[test]
    fn accumulators_sum_contributions() {
        let mut body = RigidBody::default();
        body.add_force(Vector3::new(1.0, 2.0, 3.0));
        body.add_force(Vector3::new(-0.5, 0.0, 1.0));
        body.add_torque(Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(body.force_accum, Vector3::new(0.5, 2.0, 4.0));
        assert_eq!(body.torque_accum, Vector3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn body_axes_follow_orientation() {
        let mut body = RigidBody::default();
        // A positive quarter turn about +Y takes body forward (+Z) to
        // world +X.
        body.orientation =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
        let fwd = body.forward();
        assert!((fwd - Vector3::x()).norm() < 1e-12);
        assert!((body.up() - Vector3::y()).norm() < 1e-12);
    }
}
