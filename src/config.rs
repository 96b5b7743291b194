//! Runtime game configuration loaded from `assets/pachinko.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  [`load_game_config`] reads the TOML file before the
//! app is built, overwrites the defaults with any values present, and then
//! runs [`GameConfig::validate`].  Missing keys fall back to the compile-time
//! defaults, so a minimal TOML can override just the values you care about:
//!
//! ```toml
//! seed = 42
//!
//! [pins]
//! rows = 8
//!
//! [rules]
//! initial_money = 50
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{ConfigError, ConfigWarning};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime-tunable board, physics and rule configuration.
#[derive(Resource, Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub canvas: CanvasConfig,
    pub physics: PhysicsConfig,
    pub ball: BallConfig,
    pub pins: PinConfig,
    pub buckets: BucketConfig,
    pub rules: GameRules,
    /// Fixed RNG seed.  `None` seeds from OS entropy (a new board every run).
    pub seed: Option<u64>,
}

/// Playfield dimensions.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

/// Gravity, materials and stepping.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    pub pin_friction: f32,
    pub wall_restitution: f32,
    pub wall_friction: f32,
    pub divider_cap_restitution: f32,
    pub divider_cap_friction: f32,
    pub ball_density: f32,
    pub timestep: f32,
    pub substeps: usize,
}

/// Ball size and spawn placement.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    /// Nominal spawn X; `None` means the horizontal centre of the playfield.
    pub spawn_x: Option<f32>,
    pub spawn_y: f32,
    pub spawn_x_randomness: f32,
}

/// Pin lattice layout.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PinConfig {
    pub radius: f32,
    pub rows: u32,
    pub col_spacing: f32,
    pub row_spacing: f32,
    pub offset_top: f32,
    pub position_randomness: f32,
    pub safety_buffer: f32,
}

/// Bucket row along the floor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BucketConfig {
    pub count: usize,
    pub height: f32,
    pub wall_thickness: f32,
    pub messages: Vec<String>,
}

/// Money rules.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameRules {
    pub initial_money: i64,
    pub cost_per_drop: i64,
    pub bucket_rewards: Vec<i64>,
    pub out_of_play_margin: f32,
    pub lost_message: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: RESTITUTION,
            friction: FRICTION,
            pin_friction: PIN_FRICTION,
            wall_restitution: WALL_RESTITUTION,
            wall_friction: WALL_FRICTION,
            divider_cap_restitution: DIVIDER_CAP_RESTITUTION,
            divider_cap_friction: DIVIDER_CAP_FRICTION,
            ball_density: BALL_DENSITY,
            timestep: PHYSICS_TIMESTEP,
            substeps: PHYSICS_SUBSTEPS,
        }
    }
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            spawn_x: None,
            spawn_y: BALL_SPAWN_Y,
            spawn_x_randomness: BALL_SPAWN_X_RANDOMNESS,
        }
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            radius: PIN_RADIUS,
            rows: PIN_ROWS,
            col_spacing: PIN_COL_SPACING,
            row_spacing: PIN_ROW_SPACING,
            offset_top: PIN_OFFSET_TOP,
            position_randomness: PIN_POSITION_RANDOMNESS,
            safety_buffer: PIN_SAFETY_BUFFER,
        }
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            count: BUCKET_COUNT,
            height: BUCKET_HEIGHT,
            wall_thickness: BUCKET_WALL_THICKNESS,
            messages: BUCKET_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            initial_money: INITIAL_MONEY,
            cost_per_drop: COST_PER_DROP,
            bucket_rewards: BUCKET_REWARDS.to_vec(),
            out_of_play_margin: OUT_OF_PLAY_MARGIN,
            lost_message: LOST_MESSAGE.to_string(),
        }
    }
}

impl BallConfig {
    /// Nominal spawn X for a playfield of the given width.
    pub fn spawn_center(&self, width: f32) -> f32 {
        self.spawn_x.unwrap_or(width / 2.0)
    }
}

impl GameConfig {
    /// Check cross-field invariants, repairing what can be repaired.
    ///
    /// A message list of the wrong length is padded (repeating its last entry)
    /// or truncated and reported as a warning.  A reward table of the wrong
    /// length, or any non-positive dimension, is fatal.
    pub fn validate(&mut self) -> Result<Vec<ConfigWarning>, ConfigError> {
        let mut warnings = Vec::new();

        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("ball.radius", self.ball.radius)?;
        positive("pins.radius", self.pins.radius)?;
        positive("pins.col_spacing", self.pins.col_spacing)?;
        positive("physics.timestep", self.physics.timestep)?;
        if self.buckets.count == 0 {
            return Err(ConfigError::InvalidValue {
                name: "buckets.count",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if self.physics.substeps == 0 {
            return Err(ConfigError::InvalidValue {
                name: "physics.substeps",
                value: 0.0,
                expected: "at least 1",
            });
        }
        let slot_width = self.canvas.width / self.buckets.count as f32;
        if self.buckets.wall_thickness < 0.0 || self.buckets.wall_thickness >= slot_width {
            return Err(ConfigError::InvalidValue {
                name: "buckets.wall_thickness",
                value: self.buckets.wall_thickness as f64,
                expected: "non-negative and narrower than one bucket slot",
            });
        }
        // A ball resting against an outer wall must still reach its bucket band.
        if self.buckets.wall_thickness / 2.0 >= self.ball.radius {
            return Err(ConfigError::InvalidValue {
                name: "buckets.wall_thickness",
                value: self.buckets.wall_thickness as f64,
                expected: "less than twice ball.radius",
            });
        }

        let count = self.buckets.count;
        let found = self.buckets.messages.len();
        if found != count {
            let messages = &mut self.buckets.messages;
            if found < count {
                let filler = messages
                    .last()
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_BUCKET_MESSAGE.to_string());
                messages.resize(count, filler);
            } else {
                messages.truncate(count);
            }
            warnings.push(ConfigWarning::MessageCountAdjusted {
                found,
                adjusted_to: count,
            });
        }

        if self.rules.bucket_rewards.len() != count {
            return Err(ConfigError::RewardCountMismatch {
                rewards: self.rules.bucket_rewards.len(),
                buckets: count,
            });
        }

        Ok(warnings)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            value: value as f64,
            expected: "positive and finite",
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Parsed from this file.
    File(PathBuf),
    /// Compiled defaults (no file, or the file was unusable).
    Defaults,
}

/// Outcome of [`load_game_config`], kept as a resource so the startup log can
/// report it once Bevy's logger is running.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReport {
    pub source: ConfigSource,
    pub warnings: Vec<ConfigWarning>,
}

/// Read and validate the configuration at `path`.
///
/// A missing file means compiled defaults.  An unreadable or unparsable file
/// also falls back to defaults but is reported as a warning.  Validation
/// errors are returned and must stop the game from starting.
pub fn load_game_config(path: &Path) -> Result<(GameConfig, ConfigReport), ConfigError> {
    let mut warnings = Vec::new();
    let (mut config, source) = match std::fs::read_to_string(path) {
        Ok(contents) => match parse_game_config(&contents) {
            Ok(loaded) => (loaded, ConfigSource::File(path.to_path_buf())),
            Err(reason) => {
                warnings.push(ConfigWarning::Unreadable {
                    path: path.to_path_buf(),
                    reason,
                });
                (GameConfig::default(), ConfigSource::Defaults)
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            (GameConfig::default(), ConfigSource::Defaults)
        }
        Err(err) => {
            warnings.push(ConfigWarning::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            (GameConfig::default(), ConfigSource::Defaults)
        }
    };

    warnings.extend(config.validate()?);
    Ok((config, ConfigReport { source, warnings }))
}

/// Parse a TOML document into a (not yet validated) [`GameConfig`].
pub fn parse_game_config(contents: &str) -> Result<GameConfig, String> {
    toml::from_str::<GameConfig>(contents).map_err(|err| err.to_string())
}

/// Apply a raw seed override (from the environment) to `config`.
pub fn apply_seed_override(config: &mut GameConfig, raw: &str) -> Option<ConfigWarning> {
    match raw.trim().parse::<u64>() {
        Ok(seed) => {
            config.seed = Some(seed);
            None
        }
        Err(_) => Some(ConfigWarning::InvalidSeedOverride {
            raw: raw.to_string(),
        }),
    }
}

/// Startup system: log where the configuration came from and any repairs.
pub fn log_config_report(report: Option<Res<ConfigReport>>, config: Res<GameConfig>) {
    let Some(report) = report else {
        return;
    };
    match &report.source {
        ConfigSource::File(path) => info!("Loaded game config from {}", path.display()),
        ConfigSource::Defaults => info!("No usable config file; using compiled defaults"),
    }
    for warning in &report.warnings {
        warn!("{warning}");
    }
    info!(
        "{} buckets, {} pin rows, {}{} per drop, seed {:?}",
        config.buckets.count, config.pins.rows, config.rules.cost_per_drop, CURRENCY, config.seed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let mut config = GameConfig::default();
        let warnings = config.validate().expect("defaults must validate");
        assert!(warnings.is_empty());
        assert_eq!(config.buckets.messages.len(), config.buckets.count);
        assert_eq!(config.rules.bucket_rewards.len(), config.buckets.count);
    }

    #[test]
    fn short_message_list_is_padded_with_last_entry() {
        let mut config = GameConfig::default();
        config.buckets.messages = vec!["a".into(), "b".into()];
        let warnings = config.validate().unwrap();
        assert_eq!(
            warnings,
            vec![ConfigWarning::MessageCountAdjusted {
                found: 2,
                adjusted_to: 7
            }]
        );
        assert_eq!(config.buckets.messages.len(), 7);
        assert!(config.buckets.messages[2..].iter().all(|m| m == "b"));
    }

    #[test]
    fn empty_message_list_is_padded_with_default_text() {
        let mut config = GameConfig::default();
        config.buckets.messages.clear();
        config.validate().unwrap();
        assert!(config
            .buckets
            .messages
            .iter()
            .all(|m| m == DEFAULT_BUCKET_MESSAGE));
    }

    #[test]
    fn long_message_list_is_truncated() {
        let mut config = GameConfig::default();
        config.buckets.messages.push("extra".into());
        config.validate().unwrap();
        assert_eq!(config.buckets.messages.len(), 7);
        assert_eq!(config.buckets.messages[6], "So Close!");
    }

    #[test]
    fn reward_count_mismatch_is_fatal() {
        let mut config = GameConfig::default();
        config.rules.bucket_rewards.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::RewardCountMismatch {
                rewards: 6,
                buckets: 7
            })
        );
    }

    #[test]
    fn zero_buckets_is_rejected() {
        let mut config = GameConfig::default();
        config.buckets.count = 0;
        config.rules.bucket_rewards.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "buckets.count",
                ..
            })
        ));
    }

    #[test]
    fn dividers_too_thick_for_the_ball_are_rejected() {
        let mut config = GameConfig::default();
        config.buckets.wall_thickness = 30.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                name: "buckets.wall_thickness",
                ..
            })
        ));

        let mut config = GameConfig::default();
        config.buckets.wall_thickness = 2.0 * config.ball.radius - 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = parse_game_config(
            r#"
            seed = 7

            [pins]
            rows = 4

            [rules]
            initial_money = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pins.rows, 4);
        assert_eq!(config.pins.radius, PIN_RADIUS);
        assert_eq!(config.rules.initial_money, 50);
        assert_eq!(config.rules.cost_per_drop, COST_PER_DROP);
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let mut shipped = parse_game_config(include_str!("../assets/pachinko.toml")).unwrap();
        assert!(shipped.validate().unwrap().is_empty());
        let defaults = GameConfig::default();
        assert_eq!(shipped.canvas, defaults.canvas);
        assert_eq!(shipped.pins, defaults.pins);
        assert_eq!(shipped.buckets, defaults.buckets);
        assert_eq!(shipped.rules, defaults.rules);
        assert_eq!(shipped.seed, None);
    }

    #[test]
    fn malformed_toml_reports_an_error() {
        assert!(parse_game_config("[pins\nrows = ").is_err());
    }

    #[test]
    fn missing_file_loads_defaults_without_warnings() {
        let (config, report) =
            load_game_config(Path::new("definitely/not/here/pachinko.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(report.source, ConfigSource::Defaults);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn seed_override_parses_or_warns() {
        let mut config = GameConfig::default();
        assert!(apply_seed_override(&mut config, " 99 ").is_none());
        assert_eq!(config.seed, Some(99));
        assert!(matches!(
            apply_seed_override(&mut config, "abc"),
            Some(ConfigWarning::InvalidSeedOverride { .. })
        ));
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn spawn_center_defaults_to_middle() {
        let ball = BallConfig::default();
        assert_eq!(ball.spawn_center(500.0), 250.0);
        let pinned = BallConfig {
            spawn_x: Some(120.0),
            ..BallConfig::default()
        };
        assert_eq!(pinned.spawn_center(500.0), 120.0);
    }
}
