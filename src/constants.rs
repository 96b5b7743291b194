//! Centralised board, physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig::default`] is built from these values; a
//! `assets/pachinko.toml` file may override any subset at startup.
//!
//! ## Units
//!
//! Lengths are board units (one unit = one pixel of the default 500×650
//! window).  Board space has its origin at the top-left corner of the
//! playfield with +Y pointing **down**; see [`crate::geometry::BoardFrame`]
//! for the conversion to Bevy world space.

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Playfield width (board units).
pub const CANVAS_WIDTH: f32 = 500.0;

/// Playfield height (board units).  The bucket floor sits on this line.
pub const CANVAS_HEIGHT: f32 = 650.0;

// ── Physics ───────────────────────────────────────────────────────────────────

/// Downward gravitational acceleration (board units / s²).
///
/// 980 gives a drop time of roughly 1.1 s from spawn to bucket floor.  Above
/// ~2000 the ball can tunnel through the thin bucket sensors without CCD, which
/// is enabled on the ball.
pub const GRAVITY: f32 = 980.0;

/// Ball restitution.  Pins use `RESTITUTION * PIN_RESTITUTION_SCALE`.
pub const RESTITUTION: f32 = 0.4;

/// Ball surface friction.
pub const FRICTION: f32 = 0.01;

/// Pin surface friction.
pub const PIN_FRICTION: f32 = 0.2;

/// Pins bounce slightly less than the ball's own coefficient.
pub const PIN_RESTITUTION_SCALE: f32 = 0.8;

/// Restitution of the boundary walls and the divider bodies.
pub const WALL_RESTITUTION: f32 = 0.1;

/// Friction of the boundary walls and the divider bodies.
pub const WALL_FRICTION: f32 = 0.5;

/// Restitution of the rounded divider caps.
pub const DIVIDER_CAP_RESTITUTION: f32 = 0.2;

/// Friction of the rounded divider caps.
pub const DIVIDER_CAP_FRICTION: f32 = 0.1;

/// Ball collider density.  With a 10-unit radius this gives a mass of ~1.6.
pub const BALL_DENSITY: f32 = 0.005;

/// Fixed physics step (seconds).  One step is performed per frame.
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 60.0;

/// Solver substeps per physics step.
pub const PHYSICS_SUBSTEPS: usize = 1;

/// Thickness of the invisible left/right/ground boundary walls.
pub const BOUNDARY_THICKNESS: f32 = 50.0;

// ── Ball ──────────────────────────────────────────────────────────────────────

/// Ball radius (board units).
pub const BALL_RADIUS: f32 = 10.0;

/// Spawn height of a fresh ball, measured down from the top edge.
pub const BALL_SPAWN_Y: f32 = 30.0;

/// Full width of the uniform spawn jitter; the offset lies in ±half of this.
pub const BALL_SPAWN_X_RANDOMNESS: f32 = 10.0;

// ── Pins ──────────────────────────────────────────────────────────────────────

/// Pin radius (board units).
pub const PIN_RADIUS: f32 = 7.0;

/// Number of staggered pin rows beneath the starter pin.
pub const PIN_ROWS: u32 = 12;

/// Horizontal spacing between pin centres in a row.
pub const PIN_COL_SPACING: f32 = 50.0;

/// Vertical spacing between pin rows.
pub const PIN_ROW_SPACING: f32 = 40.0;

/// Y of the starter pin; the first grid row sits one row spacing below it.
pub const PIN_OFFSET_TOP: f32 = 80.0;

/// Amplitude of the uniform per-axis jitter applied to every grid pin.
pub const PIN_POSITION_RANDOMNESS: f32 = 5.0;

/// Extra clearance kept between a wall-side pin and the wall, on top of one
/// ball diameter plus the pin radius.
pub const PIN_SAFETY_BUFFER: f32 = 3.0;

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Number of reward buckets across the floor.
pub const BUCKET_COUNT: usize = 7;

/// Height of the bucket dividers.
pub const BUCKET_HEIGHT: f32 = 50.0;

/// Divider thickness; also the sensor height and the tolerance-band inset.
pub const BUCKET_WALL_THICKNESS: f32 = 6.0;

/// Per-bucket display messages, left to right.
pub const BUCKET_MESSAGES: [&str; BUCKET_COUNT] = [
    "So Close!",
    "Nice Try!",
    "Good Hit!",
    "** JACKPOT! **",
    "Good Hit!",
    "Nice Try!",
    "So Close!",
];

/// Message used to pad a short message list that has no entries at all.
pub const DEFAULT_BUCKET_MESSAGE: &str = "Default Message";

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Starting balance of a new session.
pub const INITIAL_MONEY: i64 = 10;

/// Amount debited for every drop.
pub const COST_PER_DROP: i64 = 1;

/// Per-bucket reward, left to right.  Must have exactly `BUCKET_COUNT` entries.
pub const BUCKET_REWARDS: [i64; BUCKET_COUNT] = [0, 1, 2, 25, 2, 1, 0];

/// How far below the floor the ball may fall before the round counts as lost.
pub const OUT_OF_PLAY_MARGIN: f32 = 50.0;

/// Status text for a lost ball.
pub const LOST_MESSAGE: &str = "Ball lost!";

/// Currency suffix used on the HUD and in status messages.
pub const CURRENCY: &str = "€";

// ── Files & environment ───────────────────────────────────────────────────────

/// Default configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/pachinko.toml";

/// Environment variable overriding [`CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "PACHINKO_CONFIG";

/// Environment variable overriding the RNG seed (decimal `u64`).
pub const SEED_ENV: &str = "PACHINKO_SEED";

// ── Rendering ─────────────────────────────────────────────────────────────────

/// HUD font size.
pub const HUD_FONT_SIZE: f32 = 18.0;

/// Font size of the prize labels inside each bucket.
pub const PRIZE_FONT_SIZE: f32 = 16.0;

/// Seconds a winning bucket stays highlighted after a resolution.
pub const BUCKET_HIGHLIGHT_SECS: f32 = 1.2;
