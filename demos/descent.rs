//! Headless exercise of the physics core: release the vehicle at the
//! surface and print the descent until it settles at neutral depth.
//!
//! With the default parameters the hull displaces slightly more than
//! its weight, so it sinks through the buoyancy ramp and comes to rest
//! part-way down it, a few tenths of a meter under.

extern crate nalgebra as na;

use rov_physics::{FIXED_PHYSICS_STEP, RigidBody, RovParams, advance};

fn main() {
    let params = RovParams::default();
    let mut body = RigidBody::new(na::Vector3::zeros());

    let mut time = 0.0;
    let mut next_print = 0.0;
    while time < 10.0 {
        advance(&mut body, &params, FIXED_PHYSICS_STEP);
        time += FIXED_PHYSICS_STEP;

        if time >= next_print {
            println!(
                "t {:5.2} s  depth {:6.3} m  speed {:6.4} m/s",
                time,
                body.depth(),
                body.speed()
            );
            next_print += 0.5;
        }
    }
}
