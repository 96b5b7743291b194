//! Presentation: gizmo drawing of the board, prize labels and the HUD.
//!
//! Nothing here mutates game state.  Bodies are drawn from
//! [`SimulationWorld::snapshot_bodies`] every frame; the HUD reacts to changes
//! in [`Session`] and [`StatusLine`].
//!
//! | System                        | Schedule | Purpose                                |
//! |-------------------------------|----------|----------------------------------------|
//! | `setup_camera`                | Startup  | 2-D camera                             |
//! | `setup_hud`                   | Startup  | Balance, cost hint and status nodes    |
//! | `setup_prize_labels`          | Startup  | One `Text2d` label above each bucket   |
//! | `hud_balance_display_system`  | Update   | Refresh balance text                   |
//! | `status_display_system`       | Update   | Refresh status line                    |
//! | `bucket_highlight_system`     | Update   | Start/fade the winning-bucket flash    |
//! | `gizmo_rendering_system`      | Update   | Draw ball, pins, dividers, highlight   |

use bevy::math::{Isometry2d, Rot2};
use bevy::prelude::*;

use crate::body::{BodyKind, BodyShape};
use crate::config::GameConfig;
use crate::constants::{BUCKET_HIGHLIGHT_SECS, CURRENCY, HUD_FONT_SIZE, PRIZE_FONT_SIZE};
use crate::graphics::setup_camera;
use crate::round::{RoundResolved, StatusLine};
use crate::session::Session;
use crate::simulation::PachinkoSet;
use crate::world::SimulationWorld;

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BucketHighlight>()
            .add_systems(Startup, (setup_camera, setup_hud, setup_prize_labels))
            .add_systems(
                Update,
                (
                    hud_balance_display_system,
                    status_display_system,
                    bucket_highlight_system,
                    gizmo_rendering_system,
                )
                    .after(PachinkoSet::Requests),
            );
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root of the balance line.
#[derive(Component)]
pub struct HudBalanceDisplay;

/// Root of the status line.
#[derive(Component)]
pub struct HudStatusDisplay;

/// Prize label for one bucket.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeLabel(pub usize);

// ── Highlight ─────────────────────────────────────────────────────────────────

/// Briefly flashes the bucket that just paid out.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct BucketHighlight {
    pub index: Option<usize>,
    pub remaining: f32,
}

impl BucketHighlight {
    pub fn start(&mut self, index: usize) {
        self.index = Some(index);
        self.remaining = BUCKET_HIGHLIGHT_SECS;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.index.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.index = None;
            self.remaining = 0.0;
        }
    }

    /// Flash strength in `[0, 1]`, fading out over the highlight duration.
    pub fn alpha(&self) -> f32 {
        match self.index {
            Some(_) => (self.remaining / BUCKET_HIGHLIGHT_SECS).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

// ── Colours ───────────────────────────────────────────────────────────────────

/// Draw colour per body kind; `None` for bodies that are never drawn.
pub fn body_color(kind: BodyKind) -> Option<Color> {
    match kind {
        BodyKind::Ball => Some(Color::srgb(1.0, 0.84, 0.0)),
        BodyKind::Pin => Some(Color::srgb(0.78, 0.78, 0.82)),
        BodyKind::BucketDivider => Some(Color::srgb(0.55, 0.55, 0.6)),
        BodyKind::Wall | BodyKind::BucketSensor(_) => None,
    }
}

fn prize_color(reward: i64) -> Color {
    if reward > 2 {
        Color::srgb(1.0, 0.35, 0.35)
    } else if reward > 0 {
        Color::srgb(0.45, 0.9, 0.5)
    } else {
        Color::srgb(0.6, 0.6, 0.6)
    }
}

pub fn balance_text(session: &Session) -> String {
    format!("Money: {}{CURRENCY}", session.balance())
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Spawn the top-left HUD: balance, drop cost and key hints, status line.
pub fn setup_hud(mut commands: Commands, session: Res<Session>) {
    let line = |top: f32| Node {
        position_type: PositionType::Absolute,
        left: Val::Px(10.0),
        top: Val::Px(top),
        ..default()
    };

    commands
        .spawn((line(10.0), HudBalanceDisplay))
        .with_children(|parent| {
            parent.spawn((
                Text::new(balance_text(&session)),
                TextFont {
                    font_size: HUD_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.88, 0.45)),
            ));
        });

    commands.spawn((
        line(10.0 + HUD_FONT_SIZE + 6.0),
        Text::new(format!(
            "{}{CURRENCY} per drop  [Space] drop  [R] reset  [N] new game",
            session.cost_per_drop()
        )),
        TextFont {
            font_size: HUD_FONT_SIZE * 0.7,
            ..default()
        },
        TextColor(Color::srgb(0.6, 0.6, 0.65)),
    ));

    commands
        .spawn((line(10.0 + 2.0 * (HUD_FONT_SIZE + 6.0)), HudStatusDisplay))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: HUD_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Board-space height of the prize labels, inside the bucket row.
pub fn prize_label_y(config: &GameConfig) -> f32 {
    config.canvas.height - config.buckets.height / 2.5
}

/// Place a prize label inside each bucket.
pub fn setup_prize_labels(
    mut commands: Commands,
    session: Res<Session>,
    world: Res<SimulationWorld>,
    config: Res<GameConfig>,
) {
    let frame = world.frame();
    let y = prize_label_y(&config);
    for bucket in session.buckets().iter() {
        let pos = frame.to_world(Vec2::new(bucket.center(), y));
        commands.spawn((
            Text2d::new(format!("{}{CURRENCY}", bucket.reward)),
            TextFont {
                font_size: PRIZE_FONT_SIZE,
                ..default()
            },
            TextColor(prize_color(bucket.reward)),
            Transform::from_translation(pos.extend(1.0)),
            PrizeLabel(bucket.index),
        ));
    }
}

// ── Update: HUD ───────────────────────────────────────────────────────────────

pub fn hud_balance_display_system(
    session: Res<Session>,
    parent_query: Query<&Children, With<HudBalanceDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !session.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(balance_text(&session));
            }
        }
    }
}

pub fn status_display_system(
    status: Res<StatusLine>,
    parent_query: Query<&Children, With<HudStatusDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !status.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(status.0.clone());
            }
        }
    }
}

pub fn bucket_highlight_system(
    time: Res<Time>,
    mut resolved: MessageReader<RoundResolved>,
    mut highlight: ResMut<BucketHighlight>,
) {
    highlight.tick(time.delta_secs());
    for RoundResolved(result) in resolved.read() {
        if let Some(index) = result.outcome.bucket_index() {
            highlight.start(index);
        }
    }
}

// ── Update: gizmos ────────────────────────────────────────────────────────────

pub fn gizmo_rendering_system(
    mut gizmos: Gizmos,
    world: Res<SimulationWorld>,
    session: Res<Session>,
    highlight: Res<BucketHighlight>,
    config: Res<GameConfig>,
    bodies: Query<(Entity, &BodyKind, &BodyShape, &Transform)>,
) {
    let frame = world.frame();

    if let Some(bucket) = highlight.index.and_then(|i| session.buckets().get(i)) {
        let height = config.buckets.height;
        let centre = Vec2::new(bucket.center(), config.canvas.height - height / 2.0);
        gizmos.rect_2d(
            Isometry2d::from_translation(frame.to_world(centre)),
            Vec2::new(bucket.width(), height),
            Color::srgba(1.0, 0.84, 0.0, highlight.alpha()),
        );
    }

    for snapshot in world.snapshot_bodies(&bodies) {
        let Some(color) = body_color(snapshot.kind) else {
            continue;
        };
        let pos = frame.to_world(snapshot.position);
        match snapshot.shape {
            BodyShape::Circle { radius } => {
                gizmos.circle_2d(pos, radius, color);
            }
            BodyShape::Rect { width, height } => {
                gizmos.rect_2d(
                    Isometry2d::new(pos, Rot2::radians(-snapshot.rotation)),
                    Vec2::new(width, height),
                    color,
                );
            }
        }
    }
}
