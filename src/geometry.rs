//! Procedural board layout: boundary walls, the pin field, bucket dividers and
//! bucket sensors.
//!
//! Everything here is pure: given a [`GameConfig`] and an RNG it returns plain
//! [`BodySpec`]s in board space, which [`crate::world::SimulationWorld`] then
//! spawns.  Pin jitter is **clamped**, not resampled: a pin that would crowd a
//! side wall is pulled to the nearest legal X.  Near the walls this can line
//! several pins up in a column; that is an accepted approximation.

use bevy::prelude::*;
use rand::Rng;

use crate::body::{BodyKind, BodyMaterial, BodyShape, BodySpec};
use crate::bucket::BucketTable;
use crate::config::GameConfig;
use crate::constants::{BOUNDARY_THICKNESS, PIN_RESTITUTION_SCALE};
use crate::error::GeometryWarning;

// ── Coordinate frame ──────────────────────────────────────────────────────────

/// Converts between board space (origin top-left, +Y down) and Bevy world
/// space (origin at the playfield centre, +Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardFrame {
    pub width: f32,
    pub height: f32,
}

impl BoardFrame {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.canvas.width, config.canvas.height)
    }

    #[inline]
    pub fn to_world(&self, board: Vec2) -> Vec2 {
        Vec2::new(board.x - self.width / 2.0, self.height / 2.0 - board.y)
    }

    #[inline]
    pub fn to_board(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.width / 2.0, self.height / 2.0 - world.y)
    }
}

// ── Pin clearance ─────────────────────────────────────────────────────────────

/// Legal horizontal band for pin centres.
///
/// `min_x` leaves room for a full ball diameter between the wall and the pin
/// surface, plus a small buffer, so no pin can wedge the ball against a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinClearance {
    pub min_x: f32,
    pub max_x: f32,
}

impl PinClearance {
    pub fn from_config(config: &GameConfig) -> Self {
        let gap = 2.0 * config.ball.radius + config.pins.radius + config.pins.safety_buffer;
        Self {
            min_x: gap,
            max_x: config.canvas.width - gap,
        }
    }

    /// Distance from each wall to the nearest legal pin centre.
    #[inline]
    pub fn required_gap(&self) -> f32 {
        self.min_x
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }

    /// Pull `x` into the band.  When the band is empty (playfield too narrow)
    /// the result is `min_x`.
    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        x.min(self.max_x).max(self.min_x)
    }
}

// ── Pin field ─────────────────────────────────────────────────────────────────

/// Pin centres in board space.  The first entry is the starter pin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinField {
    positions: Vec<Vec2>,
}

impl PinField {
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn starter(&self) -> Option<Vec2> {
        self.positions.first().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Number of pins in grid row `row` for the given width and spacing.
///
/// Even rows are inset by one spacing on the left and carry one pin fewer,
/// producing the staggered lattice.
pub fn pins_in_row(row: u32, width: f32, col_spacing: f32) -> u32 {
    let full = (width / col_spacing).floor().max(0.0) as u32;
    if row % 2 == 0 {
        full.saturating_sub(1)
    } else {
        full
    }
}

/// Uniform sample in `±amplitude`.
#[inline]
fn jitter(rng: &mut impl Rng, amplitude: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * amplitude * 2.0
}

/// Place the starter pin and the staggered, jittered grid beneath it.
///
/// Returns a warning when the starter pin itself violates wall clearance; the
/// field is still produced.
pub fn generate_pins(
    config: &GameConfig,
    rng: &mut impl Rng,
) -> (PinField, Option<GeometryWarning>) {
    let pins = &config.pins;
    let width = config.canvas.width;
    let clearance = PinClearance::from_config(config);

    let starter = Vec2::new(width / 2.0, pins.offset_top);
    let warning = (!clearance.contains(starter.x)).then_some(GeometryWarning::NarrowPlayfield {
        width,
        required_gap: clearance.required_gap(),
        starter_x: starter.x,
    });

    let mut positions = vec![starter];
    let grid_start_y = pins.offset_top + pins.row_spacing;
    for row in 0..pins.rows {
        let y = grid_start_y + row as f32 * pins.row_spacing;
        let x_offset = if row % 2 == 0 {
            pins.col_spacing
        } else {
            pins.col_spacing / 2.0
        };
        for col in 0..pins_in_row(row, width, pins.col_spacing) {
            let base_x = x_offset + col as f32 * pins.col_spacing;
            let x = base_x + jitter(rng, pins.position_randomness);
            let y = y + jitter(rng, pins.position_randomness);
            positions.push(Vec2::new(clearance.clamp(x), y));
        }
    }

    (PinField { positions }, warning)
}

// ── Static bodies ─────────────────────────────────────────────────────────────

/// Left, right and ground walls just outside the playfield.
pub fn boundary_walls(config: &GameConfig) -> Vec<BodySpec> {
    let w = config.canvas.width;
    let h = config.canvas.height;
    let t = BOUNDARY_THICKNESS;
    let material = BodyMaterial::new(config.physics.wall_restitution, config.physics.wall_friction);
    let wall = |position: Vec2, width: f32, height: f32| {
        BodySpec::fixed(BodyKind::Wall, BodyShape::Rect { width, height }, position, material)
    };
    vec![
        wall(Vec2::new(w / 2.0, h + t / 2.0), w, t),
        wall(Vec2::new(-t / 2.0, h / 2.0), t, h),
        wall(Vec2::new(w + t / 2.0, h / 2.0), t, h),
    ]
}

/// Circle bodies for every pin in the field.
pub fn pin_bodies(config: &GameConfig, field: &PinField) -> Vec<BodySpec> {
    let material = BodyMaterial::new(
        config.physics.restitution * PIN_RESTITUTION_SCALE,
        config.physics.pin_friction,
    );
    let shape = BodyShape::Circle {
        radius: config.pins.radius,
    };
    field
        .positions()
        .iter()
        .map(|&position| BodySpec::fixed(BodyKind::Pin, shape, position, material))
        .collect()
}

/// A wall plus a rounded cap at every *internal* slot boundary.
pub fn divider_bodies(config: &GameConfig, buckets: &BucketTable) -> Vec<BodySpec> {
    let h = config.canvas.height;
    let b = &config.buckets;
    let wall_material =
        BodyMaterial::new(config.physics.wall_restitution, config.physics.wall_friction);
    let cap_material = BodyMaterial::new(
        config.physics.divider_cap_restitution,
        config.physics.divider_cap_friction,
    );

    buckets
        .iter()
        .skip(1)
        .flat_map(|bucket| {
            let x = bucket.x_min;
            [
                BodySpec::fixed(
                    BodyKind::BucketDivider,
                    BodyShape::Rect {
                        width: b.wall_thickness,
                        height: b.height,
                    },
                    Vec2::new(x, h - b.height / 2.0),
                    wall_material,
                ),
                BodySpec::fixed(
                    BodyKind::BucketDivider,
                    BodyShape::Circle {
                        radius: b.wall_thickness / 2.0,
                    },
                    Vec2::new(x, h - b.height),
                    cap_material,
                ),
            ]
        })
        .collect()
}

/// One sensor per bucket, a divider's thickness tall, resting on the floor and
/// inset by half a divider on each side.
pub fn sensor_bodies(config: &GameConfig, buckets: &BucketTable) -> Vec<BodySpec> {
    let h = config.canvas.height;
    let t = config.buckets.wall_thickness;
    buckets
        .iter()
        .map(|bucket| {
            BodySpec::fixed(
                BodyKind::BucketSensor(bucket.index),
                BodyShape::Rect {
                    width: bucket.width() - t,
                    height: t,
                },
                Vec2::new(bucket.center(), h - t / 2.0),
                BodyMaterial::new(0.0, 0.0),
            )
            .sensor()
        })
        .collect()
}

// ── Full layout ───────────────────────────────────────────────────────────────

/// Every static body on the board plus any generation warnings.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub pins: PinField,
    pub walls: Vec<BodySpec>,
    pub pin_bodies: Vec<BodySpec>,
    pub dividers: Vec<BodySpec>,
    pub sensors: Vec<BodySpec>,
    pub warnings: Vec<GeometryWarning>,
}

impl FieldLayout {
    pub fn generate(config: &GameConfig, buckets: &BucketTable, rng: &mut impl Rng) -> Self {
        let (pins, warning) = generate_pins(config, rng);
        Self {
            walls: boundary_walls(config),
            pin_bodies: pin_bodies(config, &pins),
            dividers: divider_bodies(config, buckets),
            sensors: sensor_bodies(config, buckets),
            pins,
            warnings: warning.into_iter().collect(),
        }
    }

    /// All bodies, sensors last.
    pub fn static_bodies(&self) -> impl Iterator<Item = &BodySpec> {
        self.walls
            .iter()
            .chain(&self.pin_bodies)
            .chain(&self.dividers)
            .chain(&self.sensors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(config: &GameConfig, seed: u64) -> FieldLayout {
        let buckets = BucketTable::from_config(config);
        FieldLayout::generate(config, &buckets, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn frame_round_trips_and_flips_y() {
        let frame = BoardFrame::new(500.0, 650.0);
        assert_eq!(frame.to_world(Vec2::new(250.0, 325.0)), Vec2::ZERO);
        assert_eq!(frame.to_world(Vec2::new(0.0, 0.0)), Vec2::new(-250.0, 325.0));
        let p = Vec2::new(12.5, 600.0);
        assert_eq!(frame.to_board(frame.to_world(p)), p);
    }

    #[test]
    fn clearance_matches_ball_diameter_plus_pin_radius() {
        let clearance = PinClearance::from_config(&GameConfig::default());
        assert_eq!(clearance.min_x, 2.0 * 10.0 + 7.0 + 3.0);
        assert_eq!(clearance.max_x, 500.0 - 30.0);
    }

    #[test]
    fn every_pin_respects_wall_clearance() {
        let mut config = GameConfig::default();
        // Exaggerated jitter so the clamp is exercised on most rows.
        config.pins.position_randomness = 40.0;
        let clearance = PinClearance::from_config(&config);
        for seed in 0..20 {
            let field = layout(&config, seed).pins;
            for pin in field.positions() {
                assert!(
                    clearance.contains(pin.x),
                    "seed {seed}: pin at x={} outside [{}, {}]",
                    pin.x,
                    clearance.min_x,
                    clearance.max_x
                );
            }
        }
    }

    #[test]
    fn starter_pin_is_fixed_at_top_centre() {
        let config = GameConfig::default();
        let a = layout(&config, 1).pins;
        let b = layout(&config, 2).pins;
        assert_eq!(a.starter(), Some(Vec2::new(250.0, 80.0)));
        assert_eq!(a.starter(), b.starter());
    }

    #[test]
    fn rows_alternate_column_counts() {
        assert_eq!(pins_in_row(0, 500.0, 50.0), 9);
        assert_eq!(pins_in_row(1, 500.0, 50.0), 10);
        assert_eq!(pins_in_row(2, 500.0, 50.0), 9);
        let field = layout(&GameConfig::default(), 3).pins;
        // starter + 6 rows of 9 + 6 rows of 10
        assert_eq!(field.len(), 1 + 6 * 9 + 6 * 10);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let mut config = GameConfig::default();
        config.pins.rows = 2;
        let clearance = PinClearance::from_config(&config);
        let field = layout(&config, 9).pins;
        // Row 1 (odd) starts at col_spacing / 2, two row spacings below the starter.
        let row_one = &field.positions()[1 + 9..];
        assert_eq!(row_one.len(), 10);
        for (col, pin) in row_one.iter().enumerate() {
            let nominal_x = clearance.clamp(25.0 + col as f32 * 50.0);
            assert!((pin.x - nominal_x).abs() <= 5.0 + 1e-4);
            assert!((pin.y - 160.0).abs() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn same_seed_same_board() {
        let config = GameConfig::default();
        assert_eq!(layout(&config, 42).pins, layout(&config, 42).pins);
        assert_ne!(layout(&config, 42).pins, layout(&config, 43).pins);
    }

    #[test]
    fn zero_randomness_gives_nominal_lattice() {
        let mut config = GameConfig::default();
        config.pins.position_randomness = 0.0;
        let field = layout(&config, 0).pins;
        assert_eq!(field.positions()[1], Vec2::new(50.0, 120.0));
        assert_eq!(field.positions()[10], Vec2::new(30.0, 160.0));
    }

    #[test]
    fn narrow_playfield_warns_but_still_builds() {
        let mut config = GameConfig::default();
        config.canvas.width = 50.0;
        config.buckets.count = 1;
        config.buckets.messages.truncate(1);
        config.rules.bucket_rewards.truncate(1);
        let field = layout(&config, 0);
        assert_eq!(field.warnings.len(), 1);
        assert!(matches!(
            field.warnings[0],
            GeometryWarning::NarrowPlayfield { .. }
        ));
        assert!(!field.pins.is_empty());
    }

    #[test]
    fn default_board_has_no_warnings() {
        assert!(layout(&GameConfig::default(), 0).warnings.is_empty());
    }

    #[test]
    fn dividers_only_at_internal_boundaries() {
        let config = GameConfig::default();
        let buckets = BucketTable::from_config(&config);
        let dividers = divider_bodies(&config, &buckets);
        // wall + cap per internal boundary
        assert_eq!(dividers.len(), 2 * 6);
        for spec in &dividers {
            assert_eq!(spec.kind, BodyKind::BucketDivider);
            assert!(spec.position.x > 0.0 && spec.position.x < config.canvas.width);
        }
        let caps: Vec<_> = dividers
            .iter()
            .filter(|s| matches!(s.shape, BodyShape::Circle { .. }))
            .collect();
        assert_eq!(caps.len(), 6);
        assert!(caps.iter().all(|c| c.position.y == 650.0 - 50.0));
    }

    #[test]
    fn sensors_sit_inside_their_slot() {
        let config = GameConfig::default();
        let buckets = BucketTable::from_config(&config);
        let sensors = sensor_bodies(&config, &buckets);
        assert_eq!(sensors.len(), buckets.len());
        for (spec, bucket) in sensors.iter().zip(buckets.iter()) {
            assert_eq!(spec.kind, BodyKind::BucketSensor(bucket.index));
            assert!(spec.is_sensor);
            let BodyShape::Rect { width, height } = spec.shape else {
                panic!("sensor must be a rectangle");
            };
            assert!(spec.position.x - width / 2.0 > bucket.x_min);
            assert!(spec.position.x + width / 2.0 < bucket.x_max);
            assert_eq!(height, 6.0);
            assert_eq!(spec.position.y, 647.0);
        }
    }

    #[test]
    fn boundary_walls_sit_outside_the_playfield() {
        let config = GameConfig::default();
        let walls = boundary_walls(&config);
        assert_eq!(walls.len(), 3);
        assert!(walls.iter().all(|w| w.kind == BodyKind::Wall && w.is_static && !w.is_sensor));
        assert!(walls[0].position.y > config.canvas.height);
        assert!(walls[1].position.x < 0.0);
        assert!(walls[2].position.x > config.canvas.width);
    }

    #[test]
    fn pins_are_static_solid_bodies() {
        let config = GameConfig::default();
        let layout = layout(&config, 5);
        assert_eq!(layout.pin_bodies.len(), layout.pins.len());
        assert!(layout
            .pin_bodies
            .iter()
            .all(|p| p.is_static && !p.is_sensor && p.kind == BodyKind::Pin));
        let total = layout.static_bodies().count();
        assert_eq!(total, 3 + layout.pins.len() + 12 + 7);
    }
}
