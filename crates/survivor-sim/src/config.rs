//! Simulation configuration and tuning.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs to name the values it overrides. Defaults mirror
//! `survivor_core::constants`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use survivor_core::constants::*;

/// Errors raised while loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same run.
    pub seed: u64,
    /// Time scale applied to every `step` (1.0 = normal).
    pub time_scale: f64,
    pub player: PlayerTuning,
    pub weapons: WeaponTuning,
    pub progression: ProgressionTuning,
    pub spawner: SpawnTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            player: PlayerTuning::default(),
            weapons: WeaponTuning::default(),
            progression: ProgressionTuning::default(),
            spawner: SpawnTuning::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    pub speed: f64,
    pub damage_cooldown_secs: f64,
    pub contact_range: f64,
    pub pickup_radius: f64,
    /// Impulse on the player per contact hit.
    pub contact_knockback: f64,
    /// Impulse on the striking hostile per contact hit.
    pub enemy_contact_knockback: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            damage_cooldown_secs: PLAYER_DAMAGE_COOLDOWN_SECS,
            contact_range: CONTACT_RANGE,
            pickup_radius: ORB_PICKUP_RADIUS,
            contact_knockback: PLAYER_CONTACT_KNOCKBACK,
            enemy_contact_knockback: ENEMY_CONTACT_KNOCKBACK,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub base_damage: i32,
    /// Base volley interval (seconds) before the attack rate multiplier.
    pub attack_rate_secs: f64,
    pub max_active_weapons: usize,
    pub projectile_speed: f64,
    pub projectile_lifetime_secs: f64,
    pub laser_range: f64,
    pub aura: AuraTuning,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            base_damage: BASE_DAMAGE,
            attack_rate_secs: ATTACK_RATE_SECS,
            max_active_weapons: MAX_ACTIVE_WEAPONS,
            projectile_speed: PROJECTILE_SPEED,
            projectile_lifetime_secs: PROJECTILE_LIFETIME_SECS,
            laser_range: LASER_RANGE,
            aura: AuraTuning::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraTuning {
    pub base_radius: f64,
    pub radius_per_level: f64,
    pub base_tick_damage: i32,
    pub tick_interval_secs: f64,
    pub knockback_force: f64,
    pub knockback_max_speed: f64,
}

impl Default for AuraTuning {
    fn default() -> Self {
        Self {
            base_radius: AURA_BASE_RADIUS,
            radius_per_level: AURA_RADIUS_PER_LEVEL,
            base_tick_damage: AURA_BASE_TICK_DAMAGE,
            tick_interval_secs: AURA_TICK_INTERVAL_SECS,
            knockback_force: AURA_KNOCKBACK_FORCE,
            knockback_max_speed: AURA_KNOCKBACK_MAX_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub initial_experience_to_level: u32,
    pub growth_factor: f64,
    pub offer_slots: usize,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            initial_experience_to_level: INITIAL_EXPERIENCE_TO_LEVEL,
            growth_factor: EXPERIENCE_GROWTH_FACTOR,
            offer_slots: UPGRADE_OFFER_SLOTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub spawn_rate_base_secs: f64,
    pub base_spawn_count: u32,
    pub wave_interval_secs: f64,
    pub wave_duration_secs: f64,
    pub spawn_radius: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            spawn_rate_base_secs: SPAWN_RATE_BASE_SECS,
            base_spawn_count: BASE_SPAWN_COUNT,
            wave_interval_secs: WAVE_INTERVAL_SECS,
            wave_duration_secs: WAVE_DURATION_SECS,
            spawn_radius: SPAWN_RADIUS,
        }
    }
}

impl SimConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f64, field: &'static str) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "time_scale",
                reason: "must be zero or positive",
            });
        }
        if self.player.max_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "player.max_health",
                reason: "must be at least 1",
            });
        }
        positive(self.weapons.attack_rate_secs, "weapons.attack_rate_secs")?;
        positive(self.weapons.projectile_speed, "weapons.projectile_speed")?;
        positive(
            self.weapons.projectile_lifetime_secs,
            "weapons.projectile_lifetime_secs",
        )?;
        positive(self.weapons.laser_range, "weapons.laser_range")?;
        positive(
            self.weapons.aura.tick_interval_secs,
            "weapons.aura.tick_interval_secs",
        )?;
        positive(self.weapons.aura.base_radius, "weapons.aura.base_radius")?;
        if self.weapons.max_active_weapons == 0 {
            return Err(ConfigError::Invalid {
                field: "weapons.max_active_weapons",
                reason: "must be at least 1",
            });
        }
        if self.progression.initial_experience_to_level == 0 {
            return Err(ConfigError::Invalid {
                field: "progression.initial_experience_to_level",
                reason: "must be at least 1",
            });
        }
        if self.progression.growth_factor < 1.0 {
            return Err(ConfigError::Invalid {
                field: "progression.growth_factor",
                reason: "must not shrink the threshold",
            });
        }
        positive(
            self.spawner.spawn_rate_base_secs,
            "spawner.spawn_rate_base_secs",
        )?;
        positive(self.spawner.wave_interval_secs, "spawner.wave_interval_secs")?;
        positive(self.spawner.wave_duration_secs, "spawner.wave_duration_secs")?;
        Ok(())
    }
}
