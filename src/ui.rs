//! The menu screen and the dive HUD.
//!
//! A dedicated 2D camera overlays text and the reticle on top of the
//! 3D view. The HUD only reads the physics state; it never mutates it.

use bevy::{
    color::palettes::css::{GOLD, GREEN, YELLOW},
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    prelude::*,
};
use std::io::Write;

use rov_physics::RigidBody;

use crate::GameState;
use crate::rov::PlayerRov;

#[derive(Component)]
struct FpsText;

#[derive(Component)]
struct InfoText;

#[derive(Component)]
struct MenuUi;

#[derive(Component)]
struct HudUi;

#[derive(Default)]
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        app.add_systems(Startup, setup_overlay_camera);
        app.add_systems(OnEnter(GameState::Menu), setup_menu);
        app.add_systems(OnExit(GameState::Menu), teardown::<MenuUi>);
        app.add_systems(OnEnter(GameState::Dive), setup_hud);
        app.add_systems(
            Update,
            (update_fps, update_info).run_if(in_state(GameState::Dive)),
        );
    }
}

fn setup_overlay_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
        Name::new("Overlay Camera"),
    ));
}

/// Remove every entity carrying the given screen marker.
fn teardown<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn setup_menu(mut commands: Commands) {
    commands
        .spawn((
            MenuUi,
            Node {
                width: percent(100.0),
                height: percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: px(16.0),
                ..default()
            },
            Name::new("Menu"),
        ))
        .with_children(|menu| {
            menu.spawn((
                Text::new("MATE ROV COMPETITION 2026"),
                TextFont::from_font_size(40.0),
                TextColor(Color::srgb_u8(200, 200, 200)),
            ));
            menu.spawn((
                Text::new("RANGER DIVISION SIMULATOR"),
                TextFont::from_font_size(60.0),
                TextColor(Color::WHITE),
            ));
            menu.spawn((
                Text::new("Press ENTER to Start Dive"),
                TextFont::from_font_size(30.0),
                TextColor(YELLOW.into()),
                Node {
                    margin: UiRect::top(px(120.0)),
                    ..default()
                },
            ));
        });

    commands.spawn((
        MenuUi,
        Text::new("Features 6 DOF Physics, Fixed Timestep, and 2026 Props."),
        TextFont::from_font_size(20.0),
        TextColor(Color::srgb_u8(130, 130, 130)),
        Node {
            position_type: PositionType::Absolute,
            bottom: px(10.0),
            left: px(10.0),
            ..default()
        },
    ));
}

fn setup_hud(mut commands: Commands) {
    // Faint blue wash over the whole view, standing in for a water
    // post-process pass. Kept behind the rest of the HUD.
    commands.spawn((
        HudUi,
        Node {
            position_type: PositionType::Absolute,
            width: percent(100.0),
            height: percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba_u8(10, 50, 120, 40)),
        GlobalZIndex(-1),
        Name::new("Water Tint"),
    ));

    commands.spawn((
        HudUi,
        FpsText,
        Text::new("FPS: --"),
        TextFont::from_font_size(20.0),
        TextColor(GOLD.into()),
        Node {
            position_type: PositionType::Absolute,
            top: px(10.0),
            left: px(10.0),
            ..default()
        },
    ));

    commands.spawn((
        HudUi,
        InfoText,
        Text::new(""),
        TextFont::from_font_size(20.0),
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: px(40.0),
            left: px(10.0),
            ..default()
        },
        Name::new("Info Text"),
    ));

    commands.spawn((
        HudUi,
        Text::new(
            "Controls:\n\
             W/S: Surge | A/D: Sway | LShift/LCtrl: Heave\n\
             Q/E: Yaw | Up/Down: Pitch | L/R Arr: Roll\n\
             I/K, J/L, U/O: Robotic Arm Joints",
        ),
        TextFont::from_font_size(20.0),
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: px(10.0),
            left: px(10.0),
            ..default()
        },
    ));

    spawn_reticle(&mut commands);
}

/// Center dot plus four tick bars, placed with margin offsets so no
/// layout math is needed at runtime.
fn spawn_reticle(commands: &mut Commands) {
    let green: Color = GREEN.into();

    // Dot.
    reticle_piece(commands, green, (4.0, 4.0), (-2.0, -2.0));
    // Left, right, top, bottom ticks.
    reticle_piece(commands, green, (10.0, 2.0), (-20.0, -1.0));
    reticle_piece(commands, green, (10.0, 2.0), (10.0, -1.0));
    reticle_piece(commands, green, (2.0, 10.0), (-1.0, -20.0));
    reticle_piece(commands, green, (2.0, 10.0), (-1.0, 10.0));
}

fn reticle_piece(commands: &mut Commands, color: Color, size: (f32, f32), offset: (f32, f32)) {
    commands.spawn((
        HudUi,
        Node {
            position_type: PositionType::Absolute,
            left: percent(50.0),
            top: percent(50.0),
            width: px(size.0),
            height: px(size.1),
            margin: UiRect {
                left: px(offset.0),
                top: px(offset.1),
                ..default()
            },
            ..default()
        },
        BackgroundColor(color),
    ));
}

fn update_fps(diagnostics: Res<DiagnosticsStore>, mut query: Query<&mut Text, With<FpsText>>) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    if let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    {
        **text = format!("FPS: {fps:.0}");
    }
}

fn update_info(
    mut query: Query<&mut Text, With<InfoText>>,
    rov: Query<&RigidBody, With<PlayerRov>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    let Ok(body) = rov.single() else {
        return;
    };

    let mut message = Vec::new();
    writeln!(message, "Depth: {:.2} m", body.depth()).unwrap();
    writeln!(message, "Speed: {:.2} m/s", body.speed()).unwrap();
    **text = String::from_utf8(message).unwrap();
}
