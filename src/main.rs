//! An interactive 6 DOF underwater ROV simulator.
//!
//! The rigid-body dynamics live in the `rov-physics` member crate and
//! run on the fixed 120 Hz clock; everything in this binary is
//! presentation glue around them: window, keyboard, scenery, HUD.

// Recommended alias.
extern crate nalgebra as na;

use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;
use rov_physics::{FIXED_PHYSICS_STEP, RovParams};

mod rov;
mod scene;
mod ui;

/// Worst-case wall-clock time folded into physics catch-up after a
/// stall, seconds. Bounds the number of fixed steps one frame can run.
const MAX_FRAME_TIME: f64 = 0.2;

/// Top-level screens.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
enum GameState {
    #[default]
    Menu,
    Dive,
}

fn main() -> anyhow::Result<()> {
    let params = load_params()?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "MATE ROV Simulator - 6 DOF + 3 DOF Arm".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(FIXED_PHYSICS_STEP))
        .insert_resource(params)
        .init_state::<GameState>()
        .add_plugins((
            rov::RovPlugin::default(),
            scene::ScenePlugin::default(),
            ui::UiPlugin::default(),
        ))
        .add_systems(Startup, cap_catch_up)
        .add_systems(Update, menu_keys.run_if(in_state(GameState::Menu)))
        .run();

    Ok(())
}

/// Cap how much elapsed time a single frame may feed into the fixed
/// clock, so a long stall cannot trigger a catch-up spiral.
fn cap_catch_up(mut time: ResMut<Time<Virtual>>) {
    time.set_max_delta(Duration::from_secs_f64(MAX_FRAME_TIME));
}

fn menu_keys(kb: Res<ButtonInput<KeyCode>>, mut next: ResMut<NextState<GameState>>) {
    if kb.just_pressed(KeyCode::Enter) {
        info!("starting dive");
        next.set(GameState::Dive);
    }
}

/// Physical parameters for the vehicle, with optional overrides from a
/// `rov-params.json` in the working directory. A missing file just
/// means defaults; a malformed one is a startup error.
fn load_params() -> anyhow::Result<RovParams> {
    match std::fs::read_to_string("rov-params.json") {
        Ok(text) => serde_json::from_str(&text).context("parsing rov-params.json"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(RovParams::default()),
        Err(err) => Err(err).context("reading rov-params.json"),
    }
}
