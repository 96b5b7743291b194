//! Body vocabulary shared by the generator, the world and the presentation.
//!
//! A [`BodySpec`] is plain data produced by [`crate::geometry`]; the
//! simulation world turns each spec into an entity carrying a [`BodyKind`],
//! a [`BodyShape`] and the matching Rapier components.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::geometry::BoardFrame;

/// What role a body plays on the board.
///
/// Bucket sensors carry their bucket index directly, so the resolver never
/// has to derive it from a name.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Ball,
    Pin,
    Wall,
    BucketDivider,
    BucketSensor(usize),
}

impl BodyKind {
    /// Bucket index when this is a bucket sensor.
    #[inline]
    pub fn bucket_index(self) -> Option<usize> {
        match self {
            BodyKind::BucketSensor(index) => Some(index),
            _ => None,
        }
    }
}

/// Collision shape in board units.  Mirrors the Rapier collider so the
/// presentation can draw a body without inspecting Rapier internals.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

impl BodyShape {
    /// Matching Rapier collider.
    pub fn collider(self) -> Collider {
        match self {
            BodyShape::Circle { radius } => Collider::ball(radius),
            BodyShape::Rect { width, height } => Collider::cuboid(width / 2.0, height / 2.0),
        }
    }
}

/// Surface response of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// `None` keeps Rapier's default density.
    pub density: Option<f32>,
}

impl BodyMaterial {
    pub fn new(restitution: f32, friction: f32) -> Self {
        Self {
            restitution,
            friction,
            density: None,
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }
}

/// Plain-data description of one body, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub kind: BodyKind,
    pub shape: BodyShape,
    /// Centre in board space (origin top-left, +Y down).
    pub position: Vec2,
    /// Clockwise rotation in board space (radians).
    pub rotation: f32,
    pub material: BodyMaterial,
    pub is_static: bool,
    /// Sensors only generate events; they never push the ball.
    pub is_sensor: bool,
}

impl BodySpec {
    /// A static, colliding body.
    pub fn fixed(kind: BodyKind, shape: BodyShape, position: Vec2, material: BodyMaterial) -> Self {
        Self {
            kind,
            shape,
            position,
            rotation: 0.0,
            material,
            is_static: true,
            is_sensor: false,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Spawn this body as an entity with all Rapier components attached.
    pub fn spawn(&self, commands: &mut Commands, frame: &BoardFrame) -> Entity {
        let world_pos = frame.to_world(self.position);
        let mut entity = commands.spawn((
            self.kind,
            self.shape,
            Transform::from_translation(world_pos.extend(0.0))
                .with_rotation(Quat::from_rotation_z(-self.rotation)),
            if self.is_static {
                RigidBody::Fixed
            } else {
                RigidBody::Dynamic
            },
            self.shape.collider(),
            Restitution::coefficient(self.material.restitution),
            Friction::coefficient(self.material.friction),
        ));
        if let Some(density) = self.material.density {
            entity.insert(ColliderMassProperties::Density(density));
        }
        if self.is_sensor {
            entity.insert((Sensor, ActiveEvents::COLLISION_EVENTS));
        }
        if !self.is_static {
            entity.insert((Velocity::zero(), Ccd::enabled(), ActiveEvents::COLLISION_EVENTS));
        }
        entity.id()
    }
}

/// Read-only view of a body for rendering, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub entity: Entity,
    pub kind: BodyKind,
    pub shape: BodyShape,
    pub position: Vec2,
    pub rotation: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sensors_expose_a_bucket_index() {
        assert_eq!(BodyKind::BucketSensor(4).bucket_index(), Some(4));
        assert_eq!(BodyKind::Ball.bucket_index(), None);
        assert_eq!(BodyKind::BucketDivider.bucket_index(), None);
    }

    #[test]
    fn sensor_builder_keeps_the_body_static() {
        let spec = BodySpec::fixed(
            BodyKind::BucketSensor(0),
            BodyShape::Rect {
                width: 10.0,
                height: 2.0,
            },
            Vec2::ZERO,
            BodyMaterial::new(0.0, 0.0),
        )
        .sensor();
        assert!(spec.is_sensor);
        assert!(spec.is_static);
    }

    #[test]
    fn spawned_sensor_carries_kind_and_sensor_marker() {
        let mut world = World::new();
        let frame = BoardFrame::new(100.0, 100.0);
        let spec = BodySpec::fixed(
            BodyKind::BucketSensor(2),
            BodyShape::Rect {
                width: 10.0,
                height: 2.0,
            },
            Vec2::new(25.0, 90.0),
            BodyMaterial::new(0.0, 0.0),
        )
        .sensor();

        let entity = {
            let mut commands = world.commands();
            spec.spawn(&mut commands, &frame)
        };
        world.flush();

        let entity_ref = world.entity(entity);
        assert_eq!(entity_ref.get::<BodyKind>(), Some(&BodyKind::BucketSensor(2)));
        assert!(entity_ref.contains::<Sensor>());
        let translation = entity_ref.get::<Transform>().unwrap().translation;
        assert_eq!(translation.truncate(), Vec2::new(-25.0, -40.0));
    }
}
