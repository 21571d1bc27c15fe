//! Damage intake and death bookkeeping for combatants.

use glam::DVec3;
use hecs::{Entity, World};

use survivor_core::components::Health;
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

/// Height above a combatant where damage numbers appear.
const DAMAGE_NUMBER_OFFSET: f64 = 1.0;

/// What a damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still alive with `remaining` health.
    Damaged { remaining: i32 },
    /// This hit took health to zero.
    Killed,
    /// Health was already zero. Nothing changed.
    AlreadyDead,
    /// The entity has no health (or no longer exists).
    Missing,
}

/// Reduce health by `amount`, clamped at zero. Reports `Killed` only on the
/// hit that crosses zero, so a death fires exactly once.
pub fn take_damage(health: &mut Health, amount: i32) -> DamageOutcome {
    if health.current <= 0 {
        health.current = 0;
        return DamageOutcome::AlreadyDead;
    }

    health.current = (health.current - amount.max(0)).clamp(0, health.max);
    if health.current == 0 {
        DamageOutcome::Killed
    } else {
        DamageOutcome::Damaged {
            remaining: health.current,
        }
    }
}

/// Damage an entity, emit its damage number and hit flash, and record a death.
pub fn damage_entity(
    world: &mut World,
    entity: Entity,
    amount: i32,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) -> DamageOutcome {
    let outcome = match world.get::<&mut Health>(entity) {
        Ok(mut health) => take_damage(&mut health, amount),
        Err(_) => return DamageOutcome::Missing,
    };
    if outcome == DamageOutcome::AlreadyDead {
        return outcome;
    }

    let position = world
        .get::<&Position>(entity)
        .map(|p| *p)
        .unwrap_or_default();
    events.push(PresentationEvent::DamageNumber {
        position: Position(position.0 + DVec3::Y * DAMAGE_NUMBER_OFFSET),
        amount,
    });
    events.push(PresentationEvent::Flash {
        entity: entity.to_bits().get(),
    });

    if outcome == DamageOutcome::Killed {
        deaths.push(entity);
    }
    outcome
}
