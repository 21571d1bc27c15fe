//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Velocity;

/// Marks the player character.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Marks an entity as a hostile (eligible weapon target).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hostile;

/// Hit points of a combatant. `0 <= current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

/// Round collision body used by spatial queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f64,
}

/// Per-enemy stats copied from the archetype profile at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
    /// Seek speed (units/s).
    pub speed: f64,
    pub contact_damage: i32,
    /// Experience carried by the orb dropped on death.
    pub experience: u32,
}

/// Seek/pause movement state of an enemy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnemyMotion {
    pub state: MoveState,
    /// Remaining pause time (seconds, only meaningful while paused).
    pub pause_remaining_secs: f64,
    /// Set by the contact system when this enemy hit the player.
    pub struck_target: bool,
}

/// Velocity-capable body. Entities carrying one react to knockback;
/// entities without one ignore it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KnockbackBody {
    pub velocity: Velocity,
}

/// In-flight projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Weapon that fired this projectile.
    pub source: WeaponKind,
    pub damage: i32,
    /// Seconds left before self-destruct.
    pub lifetime_secs: f64,
    pub radius: f64,
    /// False on the step the projectile was fired. It neither ages nor
    /// sweeps until it has moved once.
    pub in_flight: bool,
}

/// Experience dropped by a defeated enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub value: u32,
}

/// Player-side timers for contact damage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ContactCooldown {
    /// Seconds until the player can be hit again.
    pub remaining_secs: f64,
}

/// Sword holder attached to the player on first sword activation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SwordHolder {
    /// Facing in radians (0 = +z, clockwise toward +x).
    pub yaw: f64,
}
