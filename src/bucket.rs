//! Reward buckets along the floor.
//!
//! The playfield width is split into `count` equal slots.  Each [`Bucket`]
//! knows its slot span, its payout, and the narrower tolerance band its ball
//! centre must fall in for a sensor contact to count.

use crate::config::GameConfig;

/// One reward slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub index: usize,
    /// Left edge of the slot (inclusive).
    pub x_min: f32,
    /// Right edge of the slot (exclusive).
    pub x_max: f32,
    pub reward: i64,
    pub message: String,
    /// Half-width of the tolerance band around the slot centre.
    band_half_width: f32,
}

impl Bucket {
    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn center(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    /// Tolerance band as `(min, max)`, both exclusive.
    pub fn band(&self) -> (f32, f32) {
        let c = self.center();
        (c - self.band_half_width, c + self.band_half_width)
    }

    /// True when a ball centred at `x` is genuinely inside this bucket rather
    /// than grazing a divider.
    #[inline]
    pub fn confirms(&self, x: f32) -> bool {
        (x - self.center()).abs() < self.band_half_width
    }
}

/// Ordered buckets that tile `[0, width)` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTable {
    buckets: Vec<Bucket>,
}

impl BucketTable {
    /// Build the table from a validated config.
    ///
    /// Messages and rewards are read positionally; a validated config has
    /// exactly one of each per bucket.
    pub fn from_config(config: &GameConfig) -> Self {
        let width = config.canvas.width;
        let count = config.buckets.count;
        let thickness = config.buckets.wall_thickness;
        let edge = |i: usize| {
            if i == count {
                width
            } else {
                i as f32 * width / count as f32
            }
        };

        let buckets = (0..count)
            .map(|index| {
                let x_min = edge(index);
                let x_max = edge(index + 1);
                Bucket {
                    index,
                    x_min,
                    x_max,
                    reward: config.rules.bucket_rewards.get(index).copied().unwrap_or(0),
                    message: config
                        .buckets
                        .messages
                        .get(index)
                        .cloned()
                        .unwrap_or_default(),
                    band_half_width: ((x_max - x_min) - thickness).max(0.0) / 2.0,
                }
            })
            .collect();

        Self { buckets }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    /// The bucket whose slot contains `x`, if any.
    pub fn slot_at(&self, x: f32) -> Option<&Bucket> {
        self.buckets.iter().find(|b| x >= b.x_min && x < b.x_max)
    }
}
