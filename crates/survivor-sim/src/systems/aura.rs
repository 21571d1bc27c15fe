//! Garlic aura: a damage field around the player on its own tick timer.
//!
//! Hostiles entering the field get knocked back once; hostiles that stay
//! inside keep taking damage without further knockback until they leave.

use std::collections::HashSet;

use hecs::{Entity, World};

use survivor_core::components::KnockbackBody;
use survivor_core::enums::WeaponKind;
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

use crate::arsenal::Arsenal;
use crate::collaborators::Mover;
use crate::config::AuraTuning;
use crate::progression::Progression;
use crate::spatial::{HostileIndex, SpatialQuery};
use crate::systems::combat::damage_entity;

/// Live aura state. Exists only while the aura slot is held.
#[derive(Debug, Clone)]
pub struct AuraState {
    pub radius: f64,
    pub tick_damage: i32,
    /// Seconds until the next damage pulse.
    pub tick_remaining_secs: f64,
    /// Hostiles inside the field on the last pulse.
    pub occupants: HashSet<Entity>,
}

impl AuraState {
    /// Fresh aura. The first pulse lands on the next step.
    pub fn new(level: u32, progression: &Progression, tuning: &AuraTuning) -> Self {
        let mut aura = Self {
            radius: 0.0,
            tick_damage: 0,
            tick_remaining_secs: 0.0,
            occupants: HashSet::new(),
        };
        aura.refresh(level, progression, tuning);
        aura
    }

    /// Recompute radius and damage from the slot level and current multipliers.
    pub fn refresh(&mut self, level: u32, progression: &Progression, tuning: &AuraTuning) {
        self.radius = aura_radius(level, tuning);
        self.tick_damage = aura_tick_damage(level, progression, tuning);
    }
}

pub fn aura_radius(level: u32, tuning: &AuraTuning) -> f64 {
    tuning.base_radius + level.saturating_sub(1) as f64 * tuning.radius_per_level
}

/// `round(base_tick * damage_multiplier) * level`
pub fn aura_tick_damage(level: u32, progression: &Progression, tuning: &AuraTuning) -> i32 {
    progression.scaled_damage(tuning.base_tick_damage, 1.0) * level as i32
}

/// Advance the aura by `dt`, creating or releasing it to follow the arsenal.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    player: Entity,
    arsenal: &Arsenal,
    progression: &Progression,
    tuning: &AuraTuning,
    aura: &mut Option<AuraState>,
    dt: f64,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    let Some(level) = arsenal.level(WeaponKind::GarlicAura) else {
        if aura.take().is_some() {
            tracing::debug!("aura released");
            events.push(PresentationEvent::AuraReleased);
        }
        return;
    };

    let state = aura.get_or_insert_with(|| {
        tracing::debug!(level, "aura attached");
        AuraState::new(level, progression, tuning)
    });
    state.refresh(level, progression, tuning);

    state.tick_remaining_secs -= dt;
    if state.tick_remaining_secs > 0.0 {
        return;
    }
    state.tick_remaining_secs = tuning.tick_interval_secs;

    let Ok(center) = world.get::<&Position>(player).map(|p| *p) else {
        return;
    };
    pulse(world, state, center, tuning, events, deaths);
}

/// One damage pulse centred on `center`.
pub fn pulse(
    world: &mut World,
    state: &mut AuraState,
    center: Position,
    tuning: &AuraTuning,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    let index = HostileIndex::build(world);
    let inside = index.query_radius(&center, state.radius);

    for &entity in &inside {
        damage_entity(world, entity, state.tick_damage, events, deaths);

        if state.occupants.contains(&entity) {
            continue;
        }
        let Ok(pos) = world.get::<&Position>(entity).map(|p| *p) else {
            continue;
        };
        // Hostiles without a body ignore knockback.
        if let Ok(mut body) = world.get::<&mut KnockbackBody>(entity) {
            body.apply_impulse(center.ground_direction_to(&pos) * tuning.knockback_force);
            body.clamp_speed(tuning.knockback_max_speed);
        }
    }

    state.occupants = inside.into_iter().collect();
    events.push(PresentationEvent::AuraPulse {
        center,
        radius: state.radius,
    });
}
