//! Environmental forces and the fixed-step integrator.

use na::{Quaternion, UnitQuaternion, Vector3};

use crate::body::{RigidBody, RovParams};
use crate::{GRAVITY, WATER_DENSITY, WATER_LEVEL};

/// Buoyancy ramps in linearly over the first half meter of submersion,
/// modeling the hull gradually going under rather than a step change.
const SUBMERSION_RAMP: f64 = 0.5;

/// Below this angular speed the orientation update is skipped, so
/// numerical noise cannot creep into the quaternion while the vehicle
/// is essentially still.
const SPIN_EPSILON: f64 = 1e-4;

/// Advance the body by exactly one fixed step.
///
/// Gravity, buoyancy, and quadratic fluid drag are accumulated on top
/// of whatever control input the caller already added, then the whole
/// accumulated wrench is integrated with semi-implicit Euler and the
/// accumulators are cleared.
///
/// `dt` must be the same fixed value on every call for the life of the
/// simulation; the scheme does not adapt to a varying step.
pub fn advance(body: &mut RigidBody, params: &RovParams, dt: f64) {
    // Gravity.
    body.add_force(Vector3::new(0.0, -GRAVITY * params.mass, 0.0));

    // Buoyancy, strictly off above the waterline.
    if body.position.y < WATER_LEVEL {
        let depth_percent =
            ((WATER_LEVEL - body.position.y) / SUBMERSION_RAMP).clamp(0.0, 1.0);
        let buoyancy =
            Vector3::new(0.0, WATER_DENSITY * params.volume * GRAVITY * depth_percent, 0.0);
        body.add_force(buoyancy);

        // The center of buoyancy sits above the center of mass, so a
        // tipped hull sees a torque pulling it back upright.
        let cob_world = body.orientation * params.cob_offset;
        body.add_torque(cob_world.cross(&buoyancy));
    }

    // Quadratic drag, componentwise in the body frame. The v * |v|
    // form keeps the force opposed to the motion on each axis.
    let vel_b = body.orientation.inverse_transform_vector(&body.velocity);
    let drag_b = -params
        .linear_drag
        .component_mul(&vel_b)
        .component_mul(&vel_b.abs());
    body.add_force(body.orientation * drag_b);

    let ang_b = body
        .orientation
        .inverse_transform_vector(&body.angular_velocity);
    let ang_drag_b = -params
        .angular_drag
        .component_mul(&ang_b)
        .component_mul(&ang_b.abs());
    body.add_torque(body.orientation * ang_drag_b);

    // Semi-implicit Euler: position advances with the *updated*
    // velocity, which is what keeps stiff drag stable at this step
    // size.
    body.acceleration = body.force_accum / params.mass;
    body.velocity += body.acceleration * dt;
    body.position += body.velocity * dt;

    // Inertia is diagonal in the body frame, so the torque goes to the
    // body frame for the divide and the result comes back to world.
    let torque_b = body.orientation.inverse_transform_vector(&body.torque_accum);
    let alpha_b = torque_b.component_div(&params.inertia);
    body.angular_acceleration = body.orientation * alpha_b;
    body.angular_velocity += body.angular_acceleration * dt;

    // First-order integration of dq/dt = 1/2 omega ⊗ q, renormalized
    // to hold the unit-length invariant.
    if body.angular_velocity.norm() > SPIN_EPSILON {
        let spin = Quaternion::from_parts(0.0, body.angular_velocity * (dt * 0.5));
        let q = body.orientation.into_inner();
        body.orientation = UnitQuaternion::new_normalize(q + spin * q);
    }

    body.force_accum = Vector3::zeros();
    body.torque_accum = Vector3::zeros();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FIXED_PHYSICS_STEP;
    use approx::assert_abs_diff_eq;

    const DT: f64 = FIXED_PHYSICS_STEP;

    fn submerged_body(y: f64) -> RigidBody {
        RigidBody::new(Vector3::new(0.0, y, 0.0))
    }

    /// Depth at which the buoyancy ramp exactly balances gravity for
    /// the given parameters. Only meaningful inside the ramp.
    fn equilibrium_y(params: &RovParams) -> f64 {
        let full = WATER_DENSITY * params.volume;
        -SUBMERSION_RAMP * params.mass / full
    }

    #[test]
    fn holds_equilibrium_at_neutral_depth() {
        let params = RovParams::default();
        let y0 = equilibrium_y(&params);
        let mut body = submerged_body(y0);

        for _ in 0..1200 {
            advance(&mut body, &params, DT);
        }

        // Net force is exactly zero at the equilibrium depth, so the
        // body never starts moving at all.
        assert_abs_diff_eq!(body.position.y, y0, epsilon = 1e-9);
        assert_abs_diff_eq!(body.velocity.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn orientation_stays_unit_under_arbitrary_torques() {
        let params = RovParams::default();
        let mut body = submerged_body(-3.0);

        for i in 0..2000 {
            // Bounded, direction-varying torque.
            let t = i as f64 * DT;
            body.add_torque(Vector3::new(
                250.0 * (3.1 * t).sin(),
                250.0 * (1.7 * t).cos(),
                250.0 * (2.3 * t).sin(),
            ));
            advance(&mut body, &params, DT);
            assert_abs_diff_eq!(body.orientation.into_inner().norm(), 1.0, epsilon = 1e-5);
        }
    }

    /// Linear drag measured for one step with everything else
    /// subtracted out: the body sits above water (no buoyancy) so the
    /// only forces are gravity and drag.
    fn drag_force_z(speed: f64) -> f64 {
        let params = RovParams::default();
        let mut body = RigidBody::new(Vector3::new(0.0, 5.0, 0.0));
        body.velocity = Vector3::new(0.0, 0.0, speed);
        advance(&mut body, &params, DT);
        body.acceleration.z * params.mass
    }

    #[test]
    fn drag_is_quadratic_and_opposes_motion() {
        let slow = drag_force_z(1.0);
        let fast = drag_force_z(2.0);

        // Opposes +Z motion.
        assert!(slow < 0.0);
        assert!(fast < 0.0);
        // Strictly stronger at speed, with the quadratic ratio.
        assert!(fast.abs() > slow.abs());
        assert_abs_diff_eq!(fast / slow, 4.0, epsilon = 1e-9);

        // Reversed velocity reverses the force.
        let backward = drag_force_z(-1.0);
        assert_abs_diff_eq!(backward, -slow, epsilon = 1e-9);
    }

    #[test]
    fn no_buoyancy_at_or_above_the_surface() {
        let params = RovParams::default();

        for y in [0.0, 0.5, 3.0] {
            let mut body = RigidBody::new(Vector3::new(0.0, y, 0.0));
            advance(&mut body, &params, DT);
            // Free fall: gravity is the only force.
            assert_abs_diff_eq!(body.acceleration.y, -GRAVITY, epsilon = 1e-12);
            assert_abs_diff_eq!(body.angular_acceleration.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn accumulators_are_zero_after_every_step() {
        let params = RovParams::default();
        let mut body = submerged_body(-1.0);
        body.add_force(Vector3::new(123.0, -45.0, 6.0));
        body.add_torque(Vector3::new(-7.0, 89.0, 0.1));

        advance(&mut body, &params, DT);

        assert_eq!(body.force_accum, Vector3::zeros());
        assert_eq!(body.torque_accum, Vector3::zeros());
    }

    #[test]
    fn half_submerged_body_sinks() {
        // At a quarter meter down, the ramp grants only half the full
        // buoyancy: 1000 * 0.035 * 9.81 * 0.5 ≈ 171.7 N up against
        // 30 * 9.81 ≈ 294.3 N down.
        let params = RovParams::default();
        let mut body = submerged_body(-0.25);

        advance(&mut body, &params, DT);

        let expected_ay =
            (-GRAVITY * params.mass + WATER_DENSITY * params.volume * GRAVITY * 0.5) / params.mass;
        assert!(expected_ay < 0.0);
        assert_abs_diff_eq!(body.acceleration.y, expected_ay, epsilon = 1e-9);
        assert_abs_diff_eq!(body.velocity.y, expected_ay * DT, epsilon = 1e-12);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn forward_thrust_from_rest() {
        // 1500 N on a 30 kg body: 50 m/s^2, so one step at 1/120 s
        // leaves about 0.4167 m/s of forward speed. Starting from rest
        // there is no drag on this first step.
        let params = RovParams::default();
        let mut body = RigidBody::new(Vector3::new(0.0, 5.0, 0.0));
        body.add_force(Vector3::new(0.0, 0.0, 1500.0));

        advance(&mut body, &params, DT);

        assert_abs_diff_eq!(body.acceleration.z, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(body.velocity.z, 50.0 * DT, epsilon = 1e-12);
    }

    #[test]
    fn buoyancy_ramp_saturates_at_half_meter() {
        let params = RovParams::default();
        let full = WATER_DENSITY * params.volume * GRAVITY;

        // Exactly at the ramp limit.
        let mut body = submerged_body(-0.5);
        advance(&mut body, &params, DT);
        let at_limit = body.acceleration.y;

        // Well past it: no further increase.
        let mut body = submerged_body(-5.0);
        advance(&mut body, &params, DT);
        assert_abs_diff_eq!(body.acceleration.y, at_limit, epsilon = 1e-9);
        assert_abs_diff_eq!(
            body.acceleration.y,
            (full - GRAVITY * params.mass) / params.mass,
            epsilon = 1e-9
        );
    }

    #[test]
    fn tipped_hull_rights_itself() {
        let params = RovParams::default();
        let mut body = submerged_body(-3.0);
        // Rolled 0.5 rad off upright.
        body.orientation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5);

        for _ in 0..4800 {
            advance(&mut body, &params, DT);
        }

        // The righting torque pulls the body-up axis back toward world
        // up; angular drag damps the oscillation out.
        let up_error = (body.up() - Vector3::y()).norm();
        assert!(up_error < 0.05, "still tipped: up error {up_error}");
        assert!(body.angular_velocity.norm() < 0.05);
    }

    #[test]
    fn orientation_update_skips_inside_dead_zone() {
        let params = RovParams::default();
        let mut body = submerged_body(-3.0);
        body.angular_velocity = Vector3::new(0.0, 5e-5, 0.0);

        advance(&mut body, &params, DT);

        // Below the dead-zone the quaternion is untouched.
        assert_eq!(body.orientation, UnitQuaternion::identity());
    }

    #[test]
    fn control_wrench_feeds_one_step_only() {
        let params = RovParams::default();
        let wrench = crate::Wrench {
            force: Vector3::new(0.0, 0.0, 1500.0),
            torque: Vector3::zeros(),
        };

        let mut body = RigidBody::new(Vector3::new(0.0, 5.0, 0.0));
        body.add_wrench(&wrench);
        advance(&mut body, &params, DT);
        let after_one = body.velocity.z;

        // The next step gets no thrust; only drag acts, so the body
        // must slow down rather than keep accelerating.
        advance(&mut body, &params, DT);
        assert!(body.velocity.z < after_one);
        assert!(body.velocity.z > 0.0);
    }
}
