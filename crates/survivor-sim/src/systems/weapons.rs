//! Standard weapon volley. Every held weapon except the aura fires from one
//! shared cooldown at the nearest hostile.

use glam::{DQuat, DVec3};
use hecs::{Entity, World};

use survivor_core::components::SwordHolder;
use survivor_core::constants::*;
use survivor_core::enums::WeaponKind;
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

use crate::arsenal::Arsenal;
use crate::config::WeaponTuning;
use crate::progression::Progression;
use crate::spatial::{HostileIndex, SpatialQuery};
use crate::systems::combat::damage_entity;
use crate::world_setup;

/// Shared cooldown for the standard volley.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackClock {
    /// Clock time at which the next volley may fire.
    pub next_attack_secs: f64,
}

/// Per-volley inputs shared by every weapon resolution.
pub struct Volley<'a> {
    pub shooter: Entity,
    pub origin: Position,
    pub tuning: &'a WeaponTuning,
    pub progression: &'a Progression,
}

/// Fire the standard volley if the cooldown has elapsed.
///
/// Returns the number of weapons that fired.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    player: Entity,
    arsenal: &Arsenal,
    progression: &Progression,
    tuning: &WeaponTuning,
    clock: &mut AttackClock,
    now: f64,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) -> usize {
    if now < clock.next_attack_secs {
        return 0;
    }

    let standard: Vec<(WeaponKind, u32)> = arsenal.standard().collect();
    if standard.is_empty() {
        // Only the aura is held and it runs on its own timer.
        clock.next_attack_secs = now + AURA_ONLY_POLL_SECS;
        return 0;
    }

    let origin = match world.get::<&Position>(player) {
        Ok(p) => *p,
        Err(_) => return 0,
    };
    let volley = Volley {
        shooter: player,
        origin,
        tuning,
        progression,
    };

    let mut fired = 0;
    for (kind, level) in standard {
        // Fresh snapshot per weapon so earlier kills are not re-targeted.
        let index = HostileIndex::build(world);
        let Some((_, target)) = index.nearest(&origin) else {
            continue;
        };
        fire(world, &index, &volley, kind, level, target, events, deaths);
        fired += 1;
    }

    clock.next_attack_secs = if fired > 0 {
        now + progression.attack_interval(tuning.attack_rate_secs)
    } else {
        now + NO_TARGET_RETRY_SECS
    };
    fired
}

/// Resolve one weapon's effect against `target`.
#[allow(clippy::too_many_arguments)]
pub fn fire(
    world: &mut World,
    index: &impl SpatialQuery,
    volley: &Volley,
    kind: WeaponKind,
    level: u32,
    target: Position,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    match kind {
        WeaponKind::BasicBullet => fire_basic_bullet(world, volley, level, target),
        WeaponKind::SpreadShot => fire_spread_shot(world, volley, level, target),
        WeaponKind::Laser => fire_laser(world, index, volley, level, target, events, deaths),
        WeaponKind::Sword => fire_sword(world, index, volley, level, target, events, deaths),
        WeaponKind::GarlicAura => {
            tracing::debug!("aura skipped by the standard volley");
        }
    }
}

/// Damage of one basic bullet.
pub fn basic_bullet_damage(progression: &Progression, base_damage: i32, level: u32) -> i32 {
    progression.scaled_damage(base_damage, 1.0) * level as i32
}

/// Number of projectiles in a spread shot volley.
pub fn spread_shot_count(level: u32) -> u32 {
    (3 + level).min(SPREAD_MAX_PROJECTILES)
}

/// Damage of each spread shot projectile.
pub fn spread_shot_damage(progression: &Progression, base_damage: i32) -> i32 {
    progression.scaled_damage(base_damage, SPREAD_DAMAGE_FACTOR)
}

/// Damage dealt by the laser to every hostile on the ray.
pub fn laser_damage(progression: &Progression, base_damage: i32, level: u32) -> i32 {
    progression.scaled_damage(base_damage, LASER_DAMAGE_FACTOR) * level as i32
}

pub fn sword_radius(level: u32) -> f64 {
    SWORD_BASE_RADIUS + level.saturating_sub(1) as f64 * SWORD_RADIUS_PER_LEVEL
}

pub fn sword_damage(progression: &Progression, base_damage: i32, level: u32) -> i32 {
    progression.scaled_damage(base_damage, 1.0) * level as i32
}

/// Directions of a symmetric fan of `count` rays, `step_deg` apart, around `aim`.
pub fn fan_directions(aim: DVec3, count: u32, step_deg: f64) -> Vec<DVec3> {
    let half = (count as f64 - 1.0) / 2.0;
    (0..count)
        .map(|i| {
            let angle = ((i as f64 - half) * step_deg).to_radians();
            DQuat::from_rotation_y(angle) * aim
        })
        .collect()
}

fn fire_basic_bullet(world: &mut World, volley: &Volley, level: u32, target: Position) {
    let damage = basic_bullet_damage(volley.progression, volley.tuning.base_damage, level);
    world_setup::spawn_projectile(
        world,
        WeaponKind::BasicBullet,
        volley.origin,
        volley.origin.direction_to(&target),
        volley.tuning.projectile_speed,
        damage,
        volley.tuning.projectile_lifetime_secs,
    );
}

fn fire_spread_shot(world: &mut World, volley: &Volley, level: u32, target: Position) {
    let damage = spread_shot_damage(volley.progression, volley.tuning.base_damage);
    let aim = volley.origin.direction_to(&target);
    for direction in fan_directions(aim, spread_shot_count(level), SPREAD_STEP_DEG) {
        world_setup::spawn_projectile(
            world,
            WeaponKind::SpreadShot,
            volley.origin,
            direction,
            volley.tuning.projectile_speed,
            damage,
            volley.tuning.projectile_lifetime_secs,
        );
    }
}

fn fire_laser(
    world: &mut World,
    index: &impl SpatialQuery,
    volley: &Volley,
    level: u32,
    target: Position,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    let direction = volley.origin.direction_to(&target);
    let range = volley.tuning.laser_range;
    let damage = laser_damage(volley.progression, volley.tuning.base_damage, level);

    for hit in index.raycast(&volley.origin, direction, range) {
        damage_entity(world, hit.entity, damage, events, deaths);
    }

    events.push(PresentationEvent::LineSegment {
        from: volley.origin,
        to: Position(volley.origin.0 + direction * range),
        duration_secs: LASER_DISPLAY_SECS,
    });
}

fn fire_sword(
    world: &mut World,
    index: &impl SpatialQuery,
    volley: &Volley,
    level: u32,
    target: Position,
    events: &mut Vec<PresentationEvent>,
    deaths: &mut Vec<Entity>,
) {
    let has_holder = world.get::<&SwordHolder>(volley.shooter).is_ok();
    if !has_holder && world.insert_one(volley.shooter, SwordHolder::default()).is_err() {
        tracing::warn!("sword holder has no owner, swing skipped");
        return;
    }

    let radius = sword_radius(level);
    let damage = sword_damage(volley.progression, volley.tuning.base_damage, level);
    for entity in index.query_radius(&volley.origin, radius) {
        damage_entity(world, entity, damage, events, deaths);
    }

    let yaw = volley.origin.yaw_to(&target);
    if let Ok(mut holder) = world.get::<&mut SwordHolder>(volley.shooter) {
        holder.yaw = yaw;
    }
    events.push(PresentationEvent::SwordSwing { yaw, radius });
}
