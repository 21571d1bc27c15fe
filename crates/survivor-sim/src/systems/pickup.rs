//! Experience orb pickup.

use hecs::{Entity, World};

use survivor_core::components::ExperienceOrb;
use survivor_core::types::Position;

/// Orbs within `radius` of the player, nearest first, with their values.
pub fn orbs_in_reach(world: &World, player_pos: Position, radius: f64) -> Vec<(Entity, u32)> {
    let mut reach: Vec<(f64, Entity, u32)> = world
        .query::<(&ExperienceOrb, &Position)>()
        .iter()
        .filter_map(|(entity, (orb, pos))| {
            let distance = player_pos.range_to(pos);
            (distance <= radius).then_some((distance, entity, orb.value))
        })
        .collect();
    reach.sort_by(|a, b| a.0.total_cmp(&b.0));
    reach.into_iter().map(|(_, e, v)| (e, v)).collect()
}
