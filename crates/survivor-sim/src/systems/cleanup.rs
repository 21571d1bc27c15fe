//! Cleanup system: resolves enemy deaths and removes spent entities.

use hecs::{Entity, World};

use survivor_core::components::{Enemy, Projectile};
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

use crate::world_setup;

/// Drop orbs for dead enemies, then despawn them and every spent projectile.
/// Uses a pre-allocated buffer to avoid per-step allocation.
pub fn run(
    world: &mut World,
    deaths: &mut Vec<Entity>,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<PresentationEvent>,
) {
    despawn_buffer.clear();

    for entity in deaths.drain(..) {
        if despawn_buffer.contains(&entity) {
            continue;
        }
        let dropped = match world.query_one::<(&Enemy, &Position)>(entity) {
            Ok(mut query) => query
                .get()
                .map(|(enemy, pos)| (enemy.archetype, enemy.experience, *pos)),
            Err(_) => continue,
        };
        if let Some((archetype, experience, position)) = dropped {
            world_setup::spawn_orb(world, position, experience);
            events.push(PresentationEvent::EnemyKilled {
                entity: entity.to_bits().get(),
                archetype,
                position,
                experience,
            });
        }
        despawn_buffer.push(entity);
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.lifetime_secs <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
