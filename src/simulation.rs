//! Simulation plugin: wires the world, the session and the resolver into Bevy.
//!
//! | System                          | Schedule   | Purpose                             |
//! |---------------------------------|------------|-------------------------------------|
//! | `log_config_report`             | Startup    | Log config source and repairs       |
//! | `setup_simulation_world`        | Startup    | Gravity + spawn the board           |
//! | `handle_drop_requests`          | Update     | Pay for and spawn a ball            |
//! | `handle_reset_requests`         | Update     | Forfeit the ball in flight          |
//! | `handle_new_session_requests`   | Update     | Fresh board, starting balance       |
//! | `record_physics_step`           | PostUpdate | Step counter, after writeback       |
//! | `bucket_contact_system`         | PostUpdate | Sensor contact → bucket win         |
//! | `out_of_play_system`            | PostUpdate | Fallen ball → lost                  |
//!
//! The plugin does not add Rapier itself; the binary adds
//! `RapierPhysicsPlugin` and headless tests may leave it out and inject
//! `CollisionEvent`s directly.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::{log_config_report, GameConfig};
use crate::outcome::{bucket_contact_system, out_of_play_system};
use crate::round::{
    handle_drop_requests, handle_new_session_requests, handle_reset_requests, DropRequest,
    NewSessionRequest, ResetRequest, RoundResolved, StatusLine,
};
use crate::session::Session;
use crate::world::{physics_timestep, record_physics_step, setup_simulation_world, GameRng, SimulationWorld};

/// Ordering labels for the game's own systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PachinkoSet {
    /// Player requests, before the physics step.
    Requests,
    /// Outcome detection, after Rapier has written back.
    Resolve,
}

pub struct PachinkoPlugin;

impl Plugin for PachinkoPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::default());
        }
        let timestep = physics_timestep(&app.world().resource::<GameConfig>().physics);

        app.init_resource::<GameRng>()
            .init_resource::<SimulationWorld>()
            .init_resource::<Session>()
            .init_resource::<StatusLine>()
            .insert_resource(timestep)
            .add_message::<DropRequest>()
            .add_message::<ResetRequest>()
            .add_message::<NewSessionRequest>()
            .add_message::<RoundResolved>()
            .add_message::<CollisionEvent>()
            .add_systems(Startup, (log_config_report, setup_simulation_world).chain())
            .add_systems(
                Update,
                (
                    handle_reset_requests,
                    handle_new_session_requests,
                    handle_drop_requests,
                )
                    .chain()
                    .in_set(PachinkoSet::Requests),
            )
            .configure_sets(PostUpdate, PachinkoSet::Resolve.after(PhysicsSet::Writeback))
            .add_systems(
                PostUpdate,
                (record_physics_step, bucket_contact_system, out_of_play_system)
                    .chain()
                    .in_set(PachinkoSet::Resolve),
            );
    }
}
