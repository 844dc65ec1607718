//! Duck Catch - click every duck before the countdown runs out
//!
//! Bevy front-end for the session engine. The engine decides everything;
//! this app draws it, forwards clicks and talks to the achievement gateway.

mod network;
mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;

use duck_catch::game::area::{DEFAULT_AREA_HEIGHT, DEFAULT_AREA_WIDTH};
use duck_catch::Screen;

use game::GamePlugin;
use network::NetworkPlugin;
use ui::UiPlugin;

/// App states, one per engine screen
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Start,
    Playing,
    Win,
    Lose,
    Scores,
}

impl From<Screen> for AppState {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Start => AppState::Start,
            Screen::Playing => AppState::Playing,
            Screen::Win => AppState::Win,
            Screen::Lose => AppState::Lose,
            Screen::Scores => AppState::Scores,
        }
    }
}

fn main() {
    App::new()
        // Window matches the engine play area
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Duck Catch".into(),
                resolution: (DEFAULT_AREA_WIDTH, DEFAULT_AREA_HEIGHT).into(),
                resizable: false,
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))
        // Async runtime for gateway requests
        .add_plugins(bevy_tokio_tasks::TokioTasksPlugin::default())
        .init_state::<AppState>()
        .add_plugins((
            GamePlugin,
            NetworkPlugin,
            UiPlugin,
        ))
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.55, 0.8, 0.95)),
            ..default()
        },
    ));

    info!("Duck Catch v{} initialized", duck_catch::VERSION);
}
