//! The player vehicle.
//!
//! The actual dynamics live in the `rov-physics` crate. This module is
//! the glue around it: spawning the ROV entity with its hull and arm
//! meshes, turning held keys into a control wrench, driving the fixed
//! physics step, and keeping the render transforms and chase camera in
//! sync with the simulated state.

use bevy::prelude::*;
use na::{UnitQuaternion, Vector3};
use rov_physics::{FIXED_PHYSICS_STEP, RigidBody, RovParams, Wrench, advance};

use crate::GameState;

/// Thrust per translation axis while a key is held, newtons.
const THRUST_FORCE: f64 = 1500.0;

/// Torque per rotation axis while a key is held, newton-meters.
const TORQUE_FORCE: f64 = 300.0;

/// Arm joint slew rate, radians per second.
const ARM_RATE: f64 = 1.0;

#[derive(Component)]
pub struct PlayerRov;

#[derive(Component)]
pub struct ChaseCamera;

#[derive(Component)]
struct ArmBase;

#[derive(Component)]
struct ArmShoulder;

#[derive(Component)]
struct ArmElbow;

/// The control wrench computed from this frame's key states.
///
/// Written once per render frame and applied in full by every physics
/// sub-step that runs within the frame, so controls feel the same no
/// matter how many sub-steps a frame needs.
#[derive(Resource, Debug, Default)]
pub struct ControlInput(pub Wrench);

#[derive(Default)]
pub struct RovPlugin;

impl Plugin for RovPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControlInput>();
        app.add_systems(Startup, setup_rov);
        app.add_systems(
            FixedUpdate,
            step_physics.run_if(in_state(GameState::Dive)),
        );
        app.add_systems(
            Update,
            (
                (keys_to_wrench, arm_keys)
                    .chain()
                    .run_if(in_state(GameState::Dive)),
                (sync_rov_transform, sync_arm, follow_camera).chain(),
            ),
        );
    }
}

fn setup_rov(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let yellow = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(253, 249, 0),
        perceptual_roughness: 0.6,
        ..default()
    });
    let dark_gray = materials.add(Color::srgb_u8(80, 80, 80));
    let gray = materials.add(Color::srgb_u8(130, 130, 130));
    let light_gray = materials.add(Color::srgb_u8(200, 200, 200));
    let red = materials.add(Color::srgb_u8(230, 41, 55));

    let hull = meshes.add(Cuboid::new(0.5, 0.4, 0.8));
    let base_joint = meshes.add(Cylinder {
        radius: 0.05,
        half_height: 0.05,
    });
    let upper_link = meshes.add(Cuboid::new(0.04, 0.04, 0.4));
    let forearm = meshes.add(Cuboid::new(0.03, 0.03, 0.3));
    let gripper = meshes.add(Sphere { radius: 0.03 });

    commands
        .spawn((
            Name::new("ROV"),
            PlayerRov,
            RigidBody::new(Vector3::new(0.0, -2.0, -5.0)),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|rov| {
            rov.spawn((Mesh3d(hull), MeshMaterial3d(yellow)));

            // The arm hangs below the bow: base yaw, then shoulder and
            // elbow pitch, each a child of the previous joint.
            rov.spawn((
                ArmBase,
                Transform::from_xyz(0.0, -0.1, 0.4),
                Visibility::default(),
            ))
            .with_children(|base| {
                base.spawn((Mesh3d(base_joint), MeshMaterial3d(dark_gray)));
                base.spawn((
                    ArmShoulder,
                    Transform::from_xyz(0.0, 0.0, 0.05),
                    Visibility::default(),
                ))
                .with_children(|shoulder| {
                    shoulder.spawn((
                        Mesh3d(upper_link),
                        MeshMaterial3d(gray),
                        Transform::from_xyz(0.0, 0.0, 0.2),
                    ));
                    shoulder
                        .spawn((
                            ArmElbow,
                            Transform::from_xyz(0.0, 0.0, 0.4),
                            Visibility::default(),
                        ))
                        .with_children(|elbow| {
                            elbow.spawn((
                                Mesh3d(forearm),
                                MeshMaterial3d(light_gray),
                                Transform::from_xyz(0.0, 0.0, 0.15),
                            ));
                            elbow.spawn((
                                Mesh3d(gripper),
                                MeshMaterial3d(red),
                                Transform::from_xyz(0.0, 0.0, 0.3),
                            ));
                        });
                });
            });
        });

    // First-person chase camera, repositioned every frame from the
    // physics state.
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 0,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_3,
            ..default()
        }),
        Transform::from_xyz(0.0, -2.0, -5.0).looking_to(Vec3::Z, Vec3::Y),
        ChaseCamera,
        Name::new("Chase Camera"),
    ));
}

/// Map held keys to a world-space wrench along the body axes.
///
/// The axes are sampled at poll time, so a held key keeps pushing
/// along wherever the vehicle is currently pointing.
fn keys_to_wrench(
    kb: Res<ButtonInput<KeyCode>>,
    mut control: ResMut<ControlInput>,
    query: Query<&RigidBody, With<PlayerRov>>,
) {
    let Ok(body) = query.single() else {
        return;
    };
    let forward = body.forward();
    let right = body.right();
    let up = body.up();

    let mut wrench = Wrench::default();

    // Translation: surge, sway, heave.
    if kb.pressed(KeyCode::KeyW) {
        wrench.force += forward * THRUST_FORCE;
    }
    if kb.pressed(KeyCode::KeyS) {
        wrench.force -= forward * THRUST_FORCE;
    }
    if kb.pressed(KeyCode::KeyD) {
        wrench.force += right * THRUST_FORCE;
    }
    if kb.pressed(KeyCode::KeyA) {
        wrench.force -= right * THRUST_FORCE;
    }
    if kb.pressed(KeyCode::ShiftLeft) {
        wrench.force += up * THRUST_FORCE;
    }
    if kb.pressed(KeyCode::ControlLeft) {
        wrench.force -= up * THRUST_FORCE;
    }

    // Rotation: yaw, pitch, roll.
    if kb.pressed(KeyCode::KeyQ) {
        wrench.torque += up * TORQUE_FORCE;
    }
    if kb.pressed(KeyCode::KeyE) {
        wrench.torque -= up * TORQUE_FORCE;
    }
    if kb.pressed(KeyCode::ArrowUp) {
        wrench.torque += right * TORQUE_FORCE;
    }
    if kb.pressed(KeyCode::ArrowDown) {
        wrench.torque -= right * TORQUE_FORCE;
    }
    if kb.pressed(KeyCode::ArrowLeft) {
        wrench.torque += forward * TORQUE_FORCE;
    }
    if kb.pressed(KeyCode::ArrowRight) {
        wrench.torque -= forward * TORQUE_FORCE;
    }

    control.0 = wrench;
}

/// Slew the kinematic arm joints from held keys and re-clamp them.
/// These run on frame time, not the physics clock.
fn arm_keys(
    kb: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut RigidBody, With<PlayerRov>>,
) {
    let Ok(mut body) = query.single_mut() else {
        return;
    };
    let dt = time.delta_secs_f64();

    if kb.pressed(KeyCode::KeyI) {
        body.arm.shoulder_pitch += ARM_RATE * dt;
    }
    if kb.pressed(KeyCode::KeyK) {
        body.arm.shoulder_pitch -= ARM_RATE * dt;
    }
    if kb.pressed(KeyCode::KeyJ) {
        body.arm.base_yaw += ARM_RATE * dt;
    }
    if kb.pressed(KeyCode::KeyL) {
        body.arm.base_yaw -= ARM_RATE * dt;
    }
    if kb.pressed(KeyCode::KeyU) {
        body.arm.elbow_pitch += ARM_RATE * dt;
    }
    if kb.pressed(KeyCode::KeyO) {
        body.arm.elbow_pitch -= ARM_RATE * dt;
    }

    body.arm.clamp();
}

/// One physics sub-step: the frame's control wrench goes into the
/// accumulators, then `advance` adds the environment and integrates.
fn step_physics(
    control: Res<ControlInput>,
    params: Res<RovParams>,
    mut query: Query<&mut RigidBody, With<PlayerRov>>,
) {
    for mut body in query.iter_mut() {
        body.add_wrench(&control.0);
        advance(&mut body, &params, FIXED_PHYSICS_STEP);
    }
}

fn sync_rov_transform(mut query: Query<(&mut Transform, &RigidBody), With<PlayerRov>>) {
    for (mut transform, body) in query.iter_mut() {
        transform.translation = sim_to_bevy(&body.position);
        transform.rotation = sim_quat_to_bevy(&body.orientation);
    }
}

fn sync_arm(
    rov: Query<&RigidBody, With<PlayerRov>>,
    mut base: Query<&mut Transform, (With<ArmBase>, Without<ArmShoulder>, Without<ArmElbow>)>,
    mut shoulder: Query<&mut Transform, (With<ArmShoulder>, Without<ArmBase>, Without<ArmElbow>)>,
    mut elbow: Query<&mut Transform, (With<ArmElbow>, Without<ArmBase>, Without<ArmShoulder>)>,
) {
    let Ok(body) = rov.single() else {
        return;
    };
    if let Ok(mut transform) = base.single_mut() {
        transform.rotation = Quat::from_rotation_y(body.arm.base_yaw as f32);
    }
    if let Ok(mut transform) = shoulder.single_mut() {
        transform.rotation = Quat::from_rotation_x(body.arm.shoulder_pitch as f32);
    }
    if let Ok(mut transform) = elbow.single_mut() {
        transform.rotation = Quat::from_rotation_x(body.arm.elbow_pitch as f32);
    }
}

/// Camera mounted just above the bow, looking along the body forward
/// axis with the body's own up vector.
fn follow_camera(
    rov: Query<&RigidBody, With<PlayerRov>>,
    mut cam: Query<&mut Transform, (With<ChaseCamera>, Without<PlayerRov>)>,
) {
    let Ok(body) = rov.single() else {
        return;
    };
    let Ok(mut transform) = cam.single_mut() else {
        return;
    };

    let eye = body.position + body.orientation * Vector3::new(0.0, 0.2, 0.4);
    *transform = Transform::from_translation(sim_to_bevy(&eye))
        .looking_to(sim_to_bevy(&body.forward()), sim_to_bevy(&body.up()));
}

/// Convert a sim-space vector (f64) to render space (f32). Both sides
/// are Y-up, so the axes map straight across.
pub fn sim_to_bevy(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn sim_quat_to_bevy(q: &UnitQuaternion<f64>) -> Quat {
    Quat::from_xyzw(q.i as f32, q.j as f32, q.k as f32, q.w as f32)
}
