//! The simulation world: owner of every body on the board.
//!
//! [`SimulationWorld`] is a resource holding the entity handles of the static
//! layout and of the (at most one) ball.  Stepping is Rapier's job; the world
//! configures it through [`physics_timestep`] and gravity, and keeps a step
//! counter in sync via [`record_physics_step`].

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::{BodyKind, BodyMaterial, BodyShape, BodySnapshot, BodySpec};
use crate::bucket::BucketTable;
use crate::config::{GameConfig, PhysicsConfig};
use crate::error::{report_violation, GeometryWarning, InvariantViolation};
use crate::geometry::{BoardFrame, FieldLayout, PinField};

// ── Randomness ────────────────────────────────────────────────────────────────

/// The game's single source of randomness (pin jitter and spawn offsets).
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl FromWorld for GameRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.get_resource::<GameConfig>().and_then(|c| c.seed);
        GameRng::new(seed)
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Where the last ball was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnInfo {
    /// Random offset applied to the nominal spawn X.
    pub offset: f32,
    /// Final board X after clamping.
    pub x: f32,
}

/// Authoritative set of bodies on the board.
#[derive(Resource, Debug)]
pub struct SimulationWorld {
    frame: BoardFrame,
    static_bodies: Vec<Entity>,
    pins: PinField,
    current_ball: Option<Entity>,
    initialized: bool,
    steps: u64,
    last_spawn: Option<SpawnInfo>,
}

impl FromWorld for SimulationWorld {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        SimulationWorld::new(BoardFrame::from_config(&config))
    }
}

impl SimulationWorld {
    pub fn new(frame: BoardFrame) -> Self {
        Self {
            frame,
            static_bodies: Vec::new(),
            pins: PinField::default(),
            current_ball: None,
            initialized: false,
            steps: 0,
            last_spawn: None,
        }
    }

    pub fn frame(&self) -> BoardFrame {
        self.frame
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn pins(&self) -> &PinField {
        &self.pins
    }

    pub fn static_bodies(&self) -> &[Entity] {
        &self.static_bodies
    }

    pub fn current_ball(&self) -> Option<Entity> {
        self.current_ball
    }

    pub fn last_spawn(&self) -> Option<SpawnInfo> {
        self.last_spawn
    }

    /// Physics steps taken since startup.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Generate the board and spawn every static body.
    ///
    /// Returns the generator's warnings for the caller to log.
    pub fn initialize(
        &mut self,
        commands: &mut Commands,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Vec<GeometryWarning> {
        if self.initialized {
            report_violation(InvariantViolation::WorldAlreadyInitialized);
            return Vec::new();
        }

        self.frame = BoardFrame::from_config(config);
        let buckets = BucketTable::from_config(config);
        let layout = FieldLayout::generate(config, &buckets, rng);
        self.static_bodies = layout
            .static_bodies()
            .map(|spec| spec.spawn(commands, &self.frame))
            .collect();
        self.pins = layout.pins;
        self.initialized = true;

        info!(
            "Board ready: {} pins, {} static bodies",
            self.pins.len(),
            self.static_bodies.len()
        );
        layout.warnings
    }

    /// Despawn every body this world owns, ball included.
    pub fn teardown(&mut self, commands: &mut Commands) {
        self.remove_ball(commands);
        for entity in self.static_bodies.drain(..) {
            commands.entity(entity).try_despawn();
        }
        self.pins = PinField::default();
        self.last_spawn = None;
        self.initialized = false;
    }

    /// Drop a fresh ball near the top of the board, replacing any existing one.
    pub fn spawn_ball(
        &mut self,
        commands: &mut Commands,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Entity {
        self.remove_ball(commands);

        let ball = &config.ball;
        let width = self.frame.width;
        let offset = (rng.gen::<f32>() - 0.5) * ball.spawn_x_randomness;
        let x = (ball.spawn_center(width) + offset)
            .min(width - ball.radius - 1.0)
            .max(ball.radius + 1.0);

        let spec = BodySpec {
            is_static: false,
            ..BodySpec::fixed(
                BodyKind::Ball,
                BodyShape::Circle {
                    radius: ball.radius,
                },
                Vec2::new(x, ball.spawn_y),
                BodyMaterial::new(config.physics.restitution, config.physics.friction)
                    .with_density(config.physics.ball_density),
            )
        };
        let entity = spec.spawn(commands, &self.frame);

        self.current_ball = Some(entity);
        self.last_spawn = Some(SpawnInfo { offset, x });
        info!("Ball spawned at x={x:.1} (offset {offset:+.2})");
        entity
    }

    /// Despawn the current ball, if any, and forget it.
    pub fn remove_ball(&mut self, commands: &mut Commands) -> Option<Entity> {
        let ball = self.current_ball.take()?;
        commands.entity(ball).try_despawn();
        Some(ball)
    }

    /// Board-space view of every body, for rendering.
    pub fn snapshot_bodies(
        &self,
        bodies: &Query<(Entity, &BodyKind, &BodyShape, &Transform)>,
    ) -> Vec<BodySnapshot> {
        bodies
            .iter()
            .map(|(entity, kind, shape, transform)| self.snapshot(entity, *kind, *shape, transform))
            .collect()
    }

    pub fn ball_snapshot(
        &self,
        bodies: &Query<(Entity, &BodyKind, &BodyShape, &Transform)>,
    ) -> Option<BodySnapshot> {
        let ball = self.current_ball?;
        let (entity, kind, shape, transform) = bodies.get(ball).ok()?;
        Some(self.snapshot(entity, *kind, *shape, transform))
    }

    fn snapshot(
        &self,
        entity: Entity,
        kind: BodyKind,
        shape: BodyShape,
        transform: &Transform,
    ) -> BodySnapshot {
        let (_, _, angle) = transform.rotation.to_euler(EulerRot::XYZ);
        BodySnapshot {
            entity,
            kind,
            shape,
            position: self.frame.to_board(transform.translation.truncate()),
            rotation: -angle,
        }
    }
}

// ── Physics wiring ────────────────────────────────────────────────────────────

/// Fixed Rapier stepping built from the physics config.
pub fn physics_timestep(physics: &PhysicsConfig) -> TimestepMode {
    TimestepMode::Fixed {
        dt: physics.timestep,
        substeps: physics.substeps,
    }
}

/// Startup system: point gravity down the board and build the layout.
pub fn setup_simulation_world(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut world: ResMut<SimulationWorld>,
    mut rapier_configs: Query<&mut RapierConfiguration>,
) {
    for mut rapier in &mut rapier_configs {
        rapier.gravity = Vec2::new(0.0, -config.physics.gravity);
    }
    for warning in world.initialize(&mut commands, &config, &mut rng.0) {
        warn!("{warning}");
    }
}

/// Count one step per frame once Rapier has written back.
pub fn record_physics_step(mut world: ResMut<SimulationWorld>) {
    if world.initialized {
        world.steps += 1;
    }
}
