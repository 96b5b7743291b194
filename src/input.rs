//! Keyboard bindings.
//!
//! Space or Enter drops a ball, R resets, N starts a new session.  Keys only
//! produce request messages; [`crate::round`] decides what they do.

use bevy::prelude::*;

use crate::round::{DropRequest, NewSessionRequest, ResetRequest};
use crate::simulation::PachinkoSet;

pub struct KeyboardControlsPlugin;

impl Plugin for KeyboardControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            keyboard_request_system.before(PachinkoSet::Requests),
        );
    }
}

pub fn keyboard_request_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut drops: MessageWriter<DropRequest>,
    mut resets: MessageWriter<ResetRequest>,
    mut new_sessions: MessageWriter<NewSessionRequest>,
) {
    if keys.any_just_pressed([KeyCode::Space, KeyCode::Enter, KeyCode::NumpadEnter]) {
        drops.write(DropRequest);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        resets.write(ResetRequest);
    }
    if keys.just_pressed(KeyCode::KeyN) {
        new_sessions.write(NewSessionRequest);
    }
}
