//! Archetype-specific enemy profiles.
//!
//! Consolidates per-archetype parameters for spawning and the movement FSM.

use survivor_core::enums::EnemyArchetype;

/// Stat profile for an enemy archetype.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    /// Seek speed (units/s).
    pub speed: f64,
    pub max_health: i32,
    /// Damage dealt to the player on contact.
    pub contact_damage: i32,
    /// Experience dropped on death.
    pub experience: u32,
    /// How long the enemy stands still after hitting the player (seconds).
    pub pause_secs: f64,
}

/// Get the profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyProfile {
    use survivor_core::constants::*;

    match archetype {
        EnemyArchetype::Grunt => EnemyProfile {
            speed: GRUNT_SPEED,
            max_health: GRUNT_HEALTH,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            experience: GRUNT_EXPERIENCE,
            pause_secs: ENEMY_PAUSE_SECS,
        },
        EnemyArchetype::Runner => EnemyProfile {
            speed: RUNNER_SPEED,
            max_health: RUNNER_HEALTH,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            experience: RUNNER_EXPERIENCE,
            pause_secs: ENEMY_PAUSE_SECS,
        },
        EnemyArchetype::Brute => EnemyProfile {
            speed: BRUTE_SPEED,
            max_health: BRUTE_HEALTH,
            contact_damage: ENEMY_CONTACT_DAMAGE,
            experience: BRUTE_EXPERIENCE,
            pause_secs: ENEMY_PAUSE_SECS,
        },
    }
}
