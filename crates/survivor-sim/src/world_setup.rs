//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, enemies, projectiles, and experience orbs with
//! appropriate component bundles.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use survivor_core::components::*;
use survivor_core::constants::*;
use survivor_core::enums::{EnemyArchetype, WeaponKind};
use survivor_core::types::{Position, Velocity};

use survivor_ai::profiles::get_profile;

use crate::config::PlayerTuning;

/// Spawn the player at the origin.
pub fn spawn_player(world: &mut World, tuning: &PlayerTuning) -> Entity {
    world.spawn((
        Player,
        Position::default(),
        Velocity::default(),
        Health {
            current: tuning.max_health,
            max: tuning.max_health,
        },
        ContactCooldown::default(),
        KnockbackBody::default(),
    ))
}

/// Spawn an enemy of the given archetype at `position`.
/// Enemies carry a `KnockbackBody`, so every spawned hostile reacts to knockback.
pub fn spawn_enemy(world: &mut World, archetype: EnemyArchetype, position: Position) -> Entity {
    let profile = get_profile(archetype);
    world.spawn((
        Hostile,
        position,
        Velocity::default(),
        Health {
            current: profile.max_health,
            max: profile.max_health,
        },
        Collider {
            radius: ENEMY_RADIUS,
        },
        Enemy {
            archetype,
            speed: profile.speed,
            contact_damage: profile.contact_damage,
            experience: profile.experience,
        },
        EnemyMotion::default(),
        KnockbackBody::default(),
    ))
}

/// Spawn a hostile with no mover capability (knockback is a no-op on it).
#[cfg(test)]
pub fn spawn_immovable_hostile(world: &mut World, position: Position, health: i32) -> Entity {
    world.spawn((
        Hostile,
        position,
        Health {
            current: health,
            max: health,
        },
        Collider {
            radius: ENEMY_RADIUS,
        },
    ))
}

/// Point on a circle of `radius` around `center` at a uniformly random angle.
pub fn random_ring_position(rng: &mut ChaCha8Rng, center: Position, radius: f64) -> Position {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    Position(center.0 + DVec3::new(angle.cos(), 0.0, angle.sin()) * radius)
}

/// Spawn a projectile flying along `direction`.
pub fn spawn_projectile(
    world: &mut World,
    source: WeaponKind,
    origin: Position,
    direction: DVec3,
    speed: f64,
    damage: i32,
    lifetime_secs: f64,
) -> Entity {
    world.spawn((
        Projectile {
            source,
            damage,
            lifetime_secs,
            radius: PROJECTILE_RADIUS,
            in_flight: false,
        },
        origin,
        Velocity(direction.normalize_or_zero() * speed),
    ))
}

/// Drop an experience orb.
pub fn spawn_orb(world: &mut World, position: Position, value: u32) -> Entity {
    world.spawn((ExperienceOrb { value }, position))
}
