//! Projectile hit evaluation: sweeps each projectile along the path it
//! travelled this step and ages it toward self-destruct.

use hecs::{Entity, World};

use survivor_core::components::Projectile;
use survivor_core::events::PresentationEvent;
use survivor_core::types::{Position, Velocity};

use crate::spatial::{HostileIndex, SpatialQuery};
use crate::systems::combat::damage_entity;

/// Age every projectile by `dt` and resolve first hits.
/// Spent projectiles are left with zero lifetime for cleanup to remove.
///
/// Runs after movement, so a projectile's travelled path this step ends at
/// its current position. Projectiles fired this step have not moved yet and
/// are only checked where they stand.
pub fn run(
    world: &mut World,
    dt: f64,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    let mut hits: Vec<(Entity, i32)> = Vec::new();

    {
        let index = HostileIndex::build(world);
        for (_entity, (projectile, pos, vel)) in
            world.query_mut::<(&mut Projectile, &Position, &Velocity)>()
        {
            let start = if projectile.in_flight {
                projectile.lifetime_secs -= dt;
                if projectile.lifetime_secs <= 0.0 {
                    continue;
                }
                Position(pos.0 - vel.0 * dt)
            } else {
                projectile.in_flight = true;
                *pos
            };

            if let Some(&target) = index.sweep(&start, pos, projectile.radius).first() {
                hits.push((target, projectile.damage));
                projectile.lifetime_secs = 0.0;
            }
        }
    }

    for (target, damage) in hits {
        damage_entity(world, target, damage, events, deaths);
    }
}
