//! Round orchestration: player requests in, resolutions out.
//!
//! Each [`Session`] transition is paired with the matching change to the
//! [`SimulationWorld`] here, so the two can never drift apart: a paid drop
//! always spawns a ball and a resolution always removes it.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::config::GameConfig;
use crate::error::{report_violation, DropError, InvariantViolation};
use crate::session::{Outcome, RoundResult, Session};
use crate::world::{GameRng, SimulationWorld};

// ── Messages ──────────────────────────────────────────────────────────────────

/// The player asked to drop a ball.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct DropRequest;

/// The player asked to reset: forfeit any ball in flight and clear the status.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ResetRequest;

/// The player asked for a fresh board and the starting balance.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct NewSessionRequest;

/// A round has ended.  Written exactly once per dropped ball.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct RoundResolved(pub RoundResult);

/// The one-line message shown to the player.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine(pub String);

impl StatusLine {
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// ── Round control ─────────────────────────────────────────────────────────────

/// Everything needed to start or finish a round.
#[derive(SystemParam)]
pub struct RoundControl<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub session: ResMut<'w, Session>,
    pub world: ResMut<'w, SimulationWorld>,
    pub status: ResMut<'w, StatusLine>,
    pub resolved: MessageWriter<'w, RoundResolved>,
}

impl RoundControl<'_, '_> {
    /// Pay for a drop and spawn its ball.
    pub fn begin(&mut self, config: &GameConfig, rng: &mut GameRng) -> Result<Entity, DropError> {
        self.session.request_drop()?;
        if let Some(stale) = self.world.current_ball() {
            report_violation(InvariantViolation::StaleBallOnSpawn { ball: stale });
        }
        Ok(self.world.spawn_ball(&mut self.commands, config, &mut rng.0))
    }

    /// Settle the round in flight, remove its ball and announce the result.
    pub fn finish(&mut self, outcome: Outcome) -> Option<RoundResult> {
        let result = match self.session.resolve(outcome) {
            Ok(result) => result,
            Err(_) => {
                report_violation(InvariantViolation::ResolveWhileIdle);
                return None;
            }
        };
        self.world.remove_ball(&mut self.commands);
        self.status.set(result.status_text());
        info!(
            "Round {} resolved: {:?}, balance {}",
            self.session.rounds_played(),
            result.outcome,
            result.new_balance
        );
        self.resolved.write(RoundResolved(result.clone()));
        Some(result)
    }
}

// ── Request handlers ──────────────────────────────────────────────────────────

pub fn handle_drop_requests(
    mut requests: MessageReader<DropRequest>,
    mut round: RoundControl,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
) {
    for _ in requests.read() {
        match round.begin(&config, &mut rng) {
            Ok(_) => round.status.clear(),
            Err(err) => {
                debug!("Drop refused: {err:?}");
                round.status.set(err.to_string());
            }
        }
    }
}

/// Reset forfeits a ball in flight as lost; there is no refund.
pub fn handle_reset_requests(mut requests: MessageReader<ResetRequest>, mut round: RoundControl) {
    if requests.read().count() == 0 {
        return;
    }
    if !round.session.is_idle() {
        info!("Reset: forfeiting ball in flight");
        round.finish(Outcome::Lost);
    }
    round.status.clear();
}

/// Rebuild the board and restore the starting balance.  Refused mid-round.
pub fn handle_new_session_requests(
    mut requests: MessageReader<NewSessionRequest>,
    mut round: RoundControl,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if let Err(err) = round.session.restart() {
        debug!("New session refused: {err}");
        round.status.set(DropError::RoundInProgress.to_string());
        return;
    }

    let RoundControl {
        commands,
        world,
        status,
        ..
    } = &mut round;
    world.teardown(commands);
    for warning in world.initialize(commands, &config, &mut rng.0) {
        warn!("{warning}");
    }
    status.clear();
    info!("New session started");
}
