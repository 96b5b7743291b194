use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use std::env;
use std::path::PathBuf;

use pachinko::config::{apply_seed_override, load_game_config};
use pachinko::constants::{CONFIG_PATH, CONFIG_PATH_ENV, SEED_ENV};
use pachinko::graphics::BOARD_CLEAR_COLOR;
use pachinko::input::KeyboardControlsPlugin;
use pachinko::rendering::PresentationPlugin;
use pachinko::simulation::PachinkoPlugin;

fn main() -> AppExit {
    let config_path = env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_PATH));

    // Config errors are fatal and the logger is not up yet, so print directly.
    let (mut config, mut report) = match load_game_config(&config_path) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("[CONFIG] {}: {err}", config_path.display());
            return AppExit::error();
        }
    };
    if let Ok(raw) = env::var(SEED_ENV) {
        report.warnings.extend(apply_seed_override(&mut config, &raw));
    }

    let resolution = WindowResolution::new(
        config.canvas.width.round() as u32,
        config.canvas.height.round() as u32,
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Pachinko".into(),
                resolution,
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(BOARD_CLEAR_COLOR))
        .insert_resource(config)
        .insert_resource(report)
        // One world unit per pixel; gravity and sizes are in board pixels.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins((PachinkoPlugin, KeyboardControlsPlugin, PresentationPlugin))
        .run()
}
