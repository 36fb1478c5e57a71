use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut, Single},
};
use glam::Vec2;
use tracing::debug;

use crate::constants::{self, collision, mechanics, player};
use crate::events::GameEvent;
use crate::systems::audio::AudioEvent;
use crate::systems::components::{
    Collectible, CollectibleCollider, Extent, GameClock, ItemsCollected, Obstacle, ObstacleCollider, PlayerControlled, Position,
    StumbleState,
};

/// Axis-aligned box in canvas space, used for all gameplay collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Shrinks the box by `amount` on every side.
    pub fn inset(&self, amount: Vec2) -> Self {
        Self {
            pos: self.pos + amount,
            size: self.size - amount * 2.0,
        }
    }

    /// Grows the box by `amount` on every side.
    pub fn outset(&self, amount: f32) -> Self {
        self.inset(Vec2::splat(-amount))
    }

    /// Strict overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Collision pass, run after all movement for the frame.
///
/// The player's box is inset from the sprite, obstacle boxes shrink by
/// their per-kind padding, and collectible boxes grow by a fixed outset and
/// follow the drawn (bobbed) position. Multiple pickups can land in one
/// frame; an obstacle hit opens the stumble window, during which further
/// obstacle contact is ignored.
pub fn collision_system(
    mut commands: Commands,
    clock: Res<GameClock>,
    mut items: ResMut<ItemsCollected>,
    player: Single<(&Position, &Extent, &mut StumbleState), With<PlayerControlled>>,
    obstacles: Query<(&Position, &Extent, &Obstacle), With<ObstacleCollider>>,
    collectibles: Query<(Entity, &Position, &Extent, &Collectible), With<CollectibleCollider>>,
    mut events: EventWriter<GameEvent>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    let (position, extent, mut stumble) = player.into_inner();
    let player_box = Aabb::new(position.0, extent.0).inset(player::HITBOX_INSET);

    if !stumble.active {
        for (obs_position, obs_extent, obstacle) in obstacles.iter() {
            let obstacle_box = Aabb::new(obs_position.0, obs_extent.0).inset(Vec2::splat(obstacle.kind.hitbox_padding()));

            if player_box.intersects(&obstacle_box) {
                stumble.active = true;
                stumble.until_ms = clock.elapsed_ms + mechanics::STUMBLE_DURATION_MS;
                events.write(GameEvent::Stumbled(obstacle.kind));
                audio_events.write(AudioEvent::Stumble);
                debug!(kind = ?obstacle.kind, until_ms = stumble.until_ms as u64, "Stumbled");
                break;
            }
        }
    }

    let before = items.0;
    for (entity, col_position, col_extent, collectible) in collectibles.iter() {
        let drawn_pos = col_position.0 + Vec2::new(0.0, collectible.bob_y());
        let pickup_box = Aabb::new(drawn_pos, col_extent.0).outset(collision::COLLECTIBLE_OUTSET);

        if player_box.intersects(&pickup_box) {
            commands.entity(entity).despawn();
            items.0 += collectible.points;

            events.write(GameEvent::Collected {
                kind: collectible.kind,
                points: collectible.points,
            });
            audio_events.write(if collectible.kind.is_special() {
                AudioEvent::BigCollect
            } else {
                AudioEvent::Collect
            });
        }
    }

    // The win lands in the same frame the goal is crossed.
    if before < constants::ITEMS_TO_WIN && items.0 >= constants::ITEMS_TO_WIN {
        events.write(GameEvent::Won);
    }
}
