//! Game-specific error and warning types.
//!
//! Recoverable conditions (a rejected drop, a repaired config value) are
//! ordinary values that callers surface to the player or the log.  Invariant
//! violations go through [`report_violation`], which panics in debug builds
//! and degrades to an `error!` log in release builds so a logic slip never
//! takes the frame loop down in production.

use bevy::prelude::*;
use std::fmt;
use std::path::PathBuf;

// ── Player actions ────────────────────────────────────────────────────────────

/// Why a drop request was refused.  The `Display` text is shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropError {
    /// The balance does not cover the cost of a drop.
    InsufficientFunds {
        /// Balance at the time of the request.
        balance: i64,
        /// Configured cost per drop.
        cost: i64,
    },
    /// A ball is already in flight.
    RoundInProgress,
}

impl fmt::Display for DropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropError::InsufficientFunds { .. } => write!(f, "Not enough money!"),
            DropError::RoundInProgress => write!(f, "Ball already in play!"),
        }
    }
}

impl std::error::Error for DropError {}

/// Errors returned by [`crate::session::Session`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `resolve` was called while no ball was in flight.
    NoRoundInFlight,
    /// A new session was requested while a ball is still in flight.
    RoundInProgress,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoRoundInFlight => write!(f, "no round is in flight"),
            SessionError::RoundInProgress => write!(f, "a round is still in flight"),
        }
    }
}

impl std::error::Error for SessionError {}

// ── Invariant violations ──────────────────────────────────────────────────────

/// A broken internal invariant.  Never caused by player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A round was resolved while the session was idle.
    ResolveWhileIdle,
    /// A ball was spawned for a new round while the previous ball still existed.
    StaleBallOnSpawn {
        /// The ball that should already have been removed.
        ball: Entity,
    },
    /// `SimulationWorld::initialize` ran twice without a teardown.
    WorldAlreadyInitialized,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::ResolveWhileIdle => {
                write!(f, "round resolved while the session was idle")
            }
            InvariantViolation::StaleBallOnSpawn { ball } => write!(
                f,
                "ball {ball:?} still present when a new round spawned its ball"
            ),
            InvariantViolation::WorldAlreadyInitialized => {
                write!(f, "simulation world initialized twice without teardown")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Fatal in debug builds; logged and ignored in release builds.
pub fn report_violation(violation: InvariantViolation) {
    if cfg!(debug_assertions) {
        panic!("invariant violation: {violation}");
    }
    error!("invariant violation: {violation}");
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// A configuration problem that prevents the game from starting.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The reward table does not have one entry per bucket.
    RewardCountMismatch {
        /// Entries in `rules.bucket_rewards`.
        rewards: usize,
        /// Configured `buckets.count`.
        buckets: usize,
    },
    /// A numeric value is outside its legal range.
    InvalidValue {
        /// Dotted config key, e.g. `"canvas.width"`.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the legal range.
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RewardCountMismatch { rewards, buckets } => write!(
                f,
                "bucket reward count ({rewards}) doesn't match bucket count ({buckets}); \
                 fix rules.bucket_rewards"
            ),
            ConfigError::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "config value '{name}' = {value} must be {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A non-fatal configuration problem that was repaired or worked around.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The message list was padded or truncated to the bucket count.
    MessageCountAdjusted {
        /// Entries found in the file.
        found: usize,
        /// Entries after adjustment (the bucket count).
        adjusted_to: usize,
    },
    /// The config file exists but could not be read or parsed; defaults were used.
    Unreadable {
        /// File that was attempted.
        path: PathBuf,
        /// Reader or parser error text.
        reason: String,
    },
    /// The seed environment override was not a valid `u64`.
    InvalidSeedOverride {
        /// Raw environment value.
        raw: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::MessageCountAdjusted { found, adjusted_to } => write!(
                f,
                "bucket message count ({found}) doesn't match bucket count ({adjusted_to}); \
                 messages adjusted"
            ),
            ConfigWarning::Unreadable { path, reason } => write!(
                f,
                "failed to load {}: {reason}; using defaults",
                path.display()
            ),
            ConfigWarning::InvalidSeedOverride { raw } => {
                write!(f, "ignoring seed override '{raw}': not a u64")
            }
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// The generated board could not honour a clearance constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryWarning {
    /// The starter pin lies outside the legal pin band, i.e. the playfield is
    /// narrower than two wall gaps.
    NarrowPlayfield {
        /// Configured playfield width.
        width: f32,
        /// Required distance from each wall to a pin centre.
        required_gap: f32,
        /// X of the starter pin.
        starter_x: f32,
    },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::NarrowPlayfield {
                width,
                required_gap,
                starter_x,
            } => write!(
                f,
                "playfield width ({width}) might be too narrow: starter pin (centre {starter_x:.1}) \
                 requires a gap of {required_gap:.1} from each wall"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_errors_render_player_facing_text() {
        let funds = DropError::InsufficientFunds {
            balance: 0,
            cost: 1,
        };
        assert_eq!(funds.to_string(), "Not enough money!");
        assert_eq!(DropError::RoundInProgress.to_string(), "Ball already in play!");
    }

    #[test]
    fn reward_mismatch_names_both_counts() {
        let text = ConfigError::RewardCountMismatch {
            rewards: 6,
            buckets: 7,
        }
        .to_string();
        assert!(text.contains('6') && text.contains('7'), "got: {text}");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invariant violation")]
    fn violations_panic_in_debug_builds() {
        report_violation(InvariantViolation::ResolveWhileIdle);
    }
}
