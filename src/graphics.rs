use bevy::prelude::*;

/// Background behind the board.
pub const BOARD_CLEAR_COLOR: Color = Color::srgb(0.06, 0.07, 0.12);

/// Setup camera for 2D rendering.
///
/// World units equal window pixels, so a default `Camera2d` centred on the
/// origin frames the whole board when the window matches the canvas size.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    debug!("Camera spawned");
}
