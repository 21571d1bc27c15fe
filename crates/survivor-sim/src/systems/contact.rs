//! Contact damage: hostiles touching the player hurt it, then back off.
//! Each hit knocks the player and the striker apart on the ground plane.

use glam::DVec3;
use hecs::{Entity, World};

use survivor_core::components::{
    ContactCooldown, Enemy, EnemyMotion, Health, Hostile, KnockbackBody,
};
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

use crate::collaborators::Mover;
use crate::config::PlayerTuning;
use crate::systems::combat::{damage_entity, DamageOutcome};

/// Resolve contact hits on the player. Returns true if the player died.
pub fn run(
    world: &mut World,
    player: Entity,
    tuning: &PlayerTuning,
    dt: f64,
    events: &mut Vec<PresentationEvent>,
) -> bool {
    let Ok(player_pos) = world.get::<&Position>(player).map(|p| *p) else {
        return false;
    };

    {
        let Ok(mut cooldown) = world.get::<&mut ContactCooldown>(player) else {
            return false;
        };
        cooldown.remaining_secs = (cooldown.remaining_secs - dt).max(0.0);
        if cooldown.remaining_secs > 0.0 {
            return false;
        }
    }

    let striker = world
        .query::<(&Hostile, &Enemy, &Position, &Health)>()
        .iter()
        .find(|(_, (_, _, pos, health))| {
            health.current > 0 && player_pos.range_to(pos) <= tuning.contact_range
        })
        .map(|(entity, (_, enemy, pos, _))| (entity, enemy.contact_damage, *pos));
    let Some((striker, damage, striker_pos)) = striker else {
        return false;
    };

    if let Ok(mut cooldown) = world.get::<&mut ContactCooldown>(player) {
        cooldown.remaining_secs = tuning.damage_cooldown_secs;
    }
    if let Ok(mut motion) = world.get::<&mut EnemyMotion>(striker) {
        motion.struck_target = true;
    }
    knock_apart(world, player, player_pos, striker, striker_pos, tuning);

    // Player deaths are handled by the engine, not the cleanup pass.
    let mut player_deaths = Vec::new();
    let outcome = damage_entity(world, player, damage, events, &mut player_deaths);
    tracing::debug!(damage, ?outcome, "player hit");
    outcome == DamageOutcome::Killed
}

/// Push the player away from the striker and the striker the other way.
fn knock_apart(
    world: &mut World,
    player: Entity,
    player_pos: Position,
    striker: Entity,
    striker_pos: Position,
    tuning: &PlayerTuning,
) {
    let away = DVec3::new(
        player_pos.0.x - striker_pos.0.x,
        0.0,
        player_pos.0.z - striker_pos.0.z,
    )
    .normalize_or_zero();

    if let Ok(mut body) = world.get::<&mut KnockbackBody>(player) {
        body.apply_impulse(away * tuning.contact_knockback);
    }
    if let Ok(mut body) = world.get::<&mut KnockbackBody>(striker) {
        body.apply_impulse(-away * tuning.enemy_contact_knockback);
    }
}
