//! Static scenery and cosmetic effects.
//!
//! Nothing here feeds back into the physics: the water plane, seabed,
//! mission props, and marine-snow particles are presentation only.

use bevy::prelude::*;
use rand::Rng;
use rov_physics::{RigidBody, WATER_OPACITY};

use crate::GameState;
use crate::rov::{PlayerRov, sim_to_bevy};

const SEABED_Y: f32 = -10.0;
const PARTICLE_COUNT: usize = 150;

/// A fleck of marine snow drifting with the current.
#[derive(Component)]
struct Particle {
    velocity: Vec3,
    /// Per-particle phase for the sway, also used as a lifetime seed.
    life: f32,
}

/// The profiling float bobs around this depth.
#[derive(Component)]
struct ProfilingFloat;

#[derive(Default)]
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(10, 30, 60)));
        app.add_systems(Startup, setup_scene);
        app.add_systems(
            Update,
            (bob_float, drift_particles).run_if(in_state(GameState::Dive)),
        );
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Water surface: a translucent sheet at y = 0, visible from both
    // sides.
    let water = materials.add(StandardMaterial {
        base_color: Color::srgba(100.0 / 255.0, 150.0 / 255.0, 1.0, WATER_OPACITY),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(water),
        Transform::from_xyz(0.0, 0.0, 0.0),
        Name::new("Water Surface"),
    ));

    // Seabed.
    let seabed = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(35, 55, 65),
        perceptual_roughness: 1.0,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(seabed),
        Transform::from_xyz(0.0, SEABED_Y, 0.0),
        Name::new("Seabed"),
    ));

    spawn_coral_garden(&mut commands, &mut meshes, &mut materials, Vec3::new(-5.0, SEABED_Y, 15.0));
    spawn_profiling_float(&mut commands, &mut meshes, &mut materials, Vec3::new(10.0, -4.0, 10.0));
    for pos in [
        Vec3::new(0.0, 0.0, 12.0),
        Vec3::new(2.0, 0.0, 14.0),
        Vec3::new(-3.0, 0.0, 18.0),
    ] {
        spawn_crab(&mut commands, &mut meshes, &mut materials, pos);
    }

    // Marine snow.
    let fleck_mesh = meshes.add(Sphere { radius: 0.02 });
    let fleck_material = materials.add(StandardMaterial {
        base_color: Color::srgba_u8(200, 255, 255, 180),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let mut rng = rand::rng();
    for _ in 0..PARTICLE_COUNT {
        let position = Vec3::new(
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..0.0),
            rng.random_range(-20.0..20.0),
        );
        let velocity = Vec3::new(
            rng.random_range(-5.0..5.0) * 0.02,
            rng.random_range(-10.0..-1.0) * 0.02,
            rng.random_range(-5.0..5.0) * 0.02,
        );
        commands.spawn((
            Particle {
                velocity,
                life: rng.random_range(0.5..2.0),
            },
            Mesh3d(fleck_mesh.clone()),
            MeshMaterial3d(fleck_material.clone()),
            Transform::from_translation(position),
        ));
    }

    // Light filtering down from the surface, plus a dim ambient fill.
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.2, -1.0, 0.3).normalize(), Vec3::Z),
        Name::new("Surface Light"),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::srgb_u8(120, 160, 210),
        brightness: 300.0,
        ..default()
    });
}

/// A coral stand built from white PVC-pipe cylinders, after the MATE
/// prop drawings.
fn spawn_coral_garden(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    center: Vec3,
) {
    let white = materials.add(Color::WHITE);
    commands
        .spawn((
            Transform::from_translation(center),
            Visibility::default(),
            Name::new("Coral Garden"),
        ))
        .with_children(|garden| {
            for i in 0..15 {
                let x = (i as f32 * 1.5).sin() * 2.0;
                let z = (i as f32 * 2.1).cos() * 2.0;
                let height = 1.0 + (i % 3) as f32 * 0.5;
                garden.spawn((
                    Mesh3d(meshes.add(Cylinder {
                        radius: 0.02,
                        half_height: height / 2.0,
                    })),
                    MeshMaterial3d(white.clone()),
                    Transform::from_xyz(x, height / 2.0, z),
                ));
            }
        });
}

/// Vertical-profiling float: yellow hull with a recovery bolt on top
/// and a tether running down to the seabed.
fn spawn_profiling_float(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
) {
    let yellow = materials.add(Color::srgb_u8(253, 249, 0));
    let dark_gray = materials.add(Color::srgb_u8(80, 80, 80));
    let light_gray = materials.add(Color::srgb_u8(200, 200, 200));

    commands
        .spawn((
            ProfilingFloat,
            Transform::from_translation(position),
            Visibility::default(),
            Name::new("Profiling Float"),
        ))
        .with_children(|float| {
            float.spawn((
                Mesh3d(meshes.add(Cylinder {
                    radius: 0.3,
                    half_height: 0.6,
                })),
                MeshMaterial3d(yellow),
            ));
            // U-bolt stand-in.
            float.spawn((
                Mesh3d(meshes.add(Cylinder {
                    radius: 0.1,
                    half_height: 0.025,
                })),
                MeshMaterial3d(dark_gray),
                Transform::from_xyz(0.0, 0.65, 0.0),
            ));
            // Tether toward the bottom.
            float.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.01, 6.0, 0.01))),
                MeshMaterial3d(light_gray),
                Transform::from_xyz(0.0, -3.6, 0.0),
            ));
        });
}

/// One red crab silhouette resting just above the seabed.
fn spawn_crab(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
) {
    let red = materials.add(Color::srgb_u8(230, 41, 55));
    let maroon = materials.add(Color::srgb_u8(190, 33, 55));
    let body = meshes.add(Cuboid::new(0.4, 0.2, 0.3));
    let leg = meshes.add(Cuboid::new(0.1, 0.3, 0.1));

    commands
        .spawn((
            Transform::from_xyz(position.x, SEABED_Y + 0.1, position.z),
            Visibility::default(),
            Name::new("Crab Map"),
        ))
        .with_children(|crab| {
            crab.spawn((Mesh3d(body), MeshMaterial3d(red)));
            for (x, z) in [(0.3, 0.2), (-0.3, 0.2), (0.3, -0.2), (-0.3, -0.2)] {
                crab.spawn((
                    Mesh3d(leg.clone()),
                    MeshMaterial3d(maroon.clone()),
                    Transform::from_xyz(x, -0.1, z),
                ));
            }
        });
}

fn bob_float(
    time: Res<Time>,
    mut query: Query<&mut Transform, With<ProfilingFloat>>,
) {
    for mut transform in query.iter_mut() {
        transform.translation.y = -4.0 + time.elapsed_secs().sin() * 0.5;
    }
}

/// Drift the snow with a slight sway, and recycle flecks that surface
/// or fall too far behind the vehicle.
fn drift_particles(
    time: Res<Time>,
    rov: Query<&RigidBody, With<PlayerRov>>,
    mut particles: Query<(&mut Transform, &Particle)>,
) {
    let Ok(body) = rov.single() else {
        return;
    };
    let rov_pos = sim_to_bevy(&body.position);
    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    let mut rng = rand::rng();

    for (mut transform, particle) in particles.iter_mut() {
        transform.translation += particle.velocity * dt;
        transform.translation.x += (now + particle.life).sin() * 0.01;

        if transform.translation.y > 0.0 || transform.translation.distance(rov_pos) > 20.0 {
            let mut fresh = rov_pos
                + Vec3::new(
                    rng.random_range(-15.0..15.0),
                    rng.random_range(-15.0..15.0),
                    rng.random_range(5.0..20.0),
                );
            fresh.y = fresh.y.min(-0.1);
            transform.translation = fresh;
        }
    }
}
