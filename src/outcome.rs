//! Deciding where the ball ended up.
//!
//! Two systems run after Rapier's writeback each frame:
//! [`bucket_contact_system`] turns a ball/sensor contact into a bucket win,
//! and [`out_of_play_system`] declares the ball lost once it falls below the
//! board.  Both go through [`RoundControl::finish`], which clears the world's
//! current ball, so any later event for the same ball is discarded as stale.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::body::{BodyKind, BodyShape};
use crate::config::GameConfig;
use crate::round::RoundControl;
use crate::session::Outcome;

/// A ball touching a bucket sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorContact {
    pub ball: Entity,
    pub bucket: usize,
}

/// Recognise a ball/bucket-sensor pair in either order.
pub fn classify_contact(
    a: (Entity, Option<BodyKind>),
    b: (Entity, Option<BodyKind>),
) -> Option<SensorContact> {
    match (a, b) {
        ((ball, Some(BodyKind::Ball)), (_, Some(BodyKind::BucketSensor(bucket))))
        | ((_, Some(BodyKind::BucketSensor(bucket))), (ball, Some(BodyKind::Ball))) => {
            Some(SensorContact { ball, bucket })
        }
        _ => None,
    }
}

pub fn bucket_contact_system(
    mut collisions: MessageReader<CollisionEvent>,
    kinds: Query<&BodyKind>,
    bodies: Query<(Entity, &BodyKind, &BodyShape, &Transform)>,
    mut round: RoundControl,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(e1, e2, _) = *event else {
            continue;
        };
        let Some(contact) = classify_contact(
            (e1, kinds.get(e1).ok().copied()),
            (e2, kinds.get(e2).ok().copied()),
        ) else {
            continue;
        };

        if round.world.current_ball() != Some(contact.ball) || round.session.is_idle() {
            debug!("Ignoring contact from stale ball {:?}", contact.ball);
            continue;
        }
        let Some(ball) = round.world.ball_snapshot(&bodies) else {
            continue;
        };
        let x = ball.position.x;

        let buckets = round.session.buckets();
        let confirmed = buckets
            .get(contact.bucket)
            .map_or(true, |bucket| bucket.confirms(x));
        if confirmed {
            round.finish(Outcome::Bucket(contact.bucket));
        } else {
            debug!(
                "Ball grazed bucket {} sensor at x={x:.1} (slot {:?}); outside tolerance band",
                contact.bucket,
                buckets.slot_at(x).map(|bucket| bucket.index)
            );
        }
    }
}

/// Lose the ball once its centre is more than the configured margin below the
/// playfield.
pub fn out_of_play_system(
    config: Res<GameConfig>,
    bodies: Query<(Entity, &BodyKind, &BodyShape, &Transform)>,
    mut round: RoundControl,
) {
    if round.session.is_idle() {
        return;
    }
    let Some(ball) = round.world.ball_snapshot(&bodies) else {
        return;
    };
    let y = ball.position.y;
    if y > config.canvas.height + config.rules.out_of_play_margin {
        info!("Ball {:?} left the board at y={y:.1}", ball.entity);
        round.finish(Outcome::Lost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn contact_is_symmetric() {
        let (ball, sensor) = entities();
        let expected = Some(SensorContact { ball, bucket: 3 });
        assert_eq!(
            classify_contact(
                (ball, Some(BodyKind::Ball)),
                (sensor, Some(BodyKind::BucketSensor(3)))
            ),
            expected
        );
        assert_eq!(
            classify_contact(
                (sensor, Some(BodyKind::BucketSensor(3))),
                (ball, Some(BodyKind::Ball))
            ),
            expected
        );
    }

    #[test]
    fn other_pairs_are_ignored() {
        let (a, b) = entities();
        assert_eq!(
            classify_contact((a, Some(BodyKind::Ball)), (b, Some(BodyKind::Pin))),
            None
        );
        assert_eq!(
            classify_contact(
                (a, Some(BodyKind::BucketDivider)),
                (b, Some(BodyKind::BucketSensor(1)))
            ),
            None
        );
        assert_eq!(
            classify_contact(
                (a, Some(BodyKind::BucketSensor(0))),
                (b, Some(BodyKind::BucketSensor(1)))
            ),
            None
        );
        assert_eq!(classify_contact((a, None), (b, Some(BodyKind::Ball))), None);
    }
}
