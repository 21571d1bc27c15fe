//! Simulation constants and tuning defaults.

/// Nominal step rate (Hz) used by fixed-rate drivers.
pub const TICK_RATE: u32 = 60;

/// Seconds per nominal step.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Largest `dt` accepted by a single step. Longer frames are clamped.
pub const MAX_STEP_SECS: f64 = 0.25;

// --- Player ---

pub const PLAYER_MAX_HEALTH: i32 = 100;

/// Player ground speed (units/s).
pub const PLAYER_SPEED: f64 = 5.0;

/// Minimum time between two contact hits on the player (seconds).
pub const PLAYER_DAMAGE_COOLDOWN_SECS: f64 = 1.0;

/// Distance at which a hostile touches the player.
pub const CONTACT_RANGE: f64 = 0.9;

/// Impulse pushing the player away from a hostile that hits it.
pub const PLAYER_CONTACT_KNOCKBACK: f64 = 5.0;

/// Impulse pushing the striking hostile back from the player.
pub const ENEMY_CONTACT_KNOCKBACK: f64 = 3.0;

/// Distance at which the player collects an experience orb.
pub const ORB_PICKUP_RADIUS: f64 = 1.5;

// --- Weapons ---

/// Maximum number of distinct weapon kinds held at once.
pub const MAX_ACTIVE_WEAPONS: usize = 5;

/// Base damage before multipliers and levels.
pub const BASE_DAMAGE: i32 = 1;

/// Base interval between standard weapon volleys (seconds).
pub const ATTACK_RATE_SECS: f64 = 1.0;

/// Floor for the effective attack interval (seconds).
pub const MIN_ATTACK_INTERVAL_SECS: f64 = 0.1;

/// Retry delay when standard weapons found nothing to shoot (seconds).
pub const NO_TARGET_RETRY_SECS: f64 = 0.1;

/// Poll interval when only the aura is held (seconds).
pub const AURA_ONLY_POLL_SECS: f64 = 1.0;

/// Projectile travel speed (units/s).
pub const PROJECTILE_SPEED: f64 = 10.0;

/// Projectile lifetime before self-destruct (seconds).
pub const PROJECTILE_LIFETIME_SECS: f64 = 2.0;

/// Projectile collision radius.
pub const PROJECTILE_RADIUS: f64 = 0.1;

/// Angular step between spread shot projectiles (degrees).
pub const SPREAD_STEP_DEG: f64 = 20.0;

/// Most projectiles a spread shot volley can contain.
pub const SPREAD_MAX_PROJECTILES: u32 = 5;

/// Spread shot damage factor applied to the modified base damage.
pub const SPREAD_DAMAGE_FACTOR: f64 = 0.8;

/// Laser ray length.
pub const LASER_RANGE: f64 = 10.0;

/// Laser damage factor applied to the modified base damage.
pub const LASER_DAMAGE_FACTOR: f64 = 1.5;

/// How long the laser line stays on screen (seconds).
pub const LASER_DISPLAY_SECS: f64 = 0.2;

/// Sword reach at level 1.
pub const SWORD_BASE_RADIUS: f64 = 2.0;

/// Sword reach gained per level above 1.
pub const SWORD_RADIUS_PER_LEVEL: f64 = 0.5;

// --- Garlic aura ---

pub const AURA_BASE_RADIUS: f64 = 2.0;
pub const AURA_RADIUS_PER_LEVEL: f64 = 0.5;
pub const AURA_BASE_TICK_DAMAGE: i32 = 1;
pub const AURA_TICK_INTERVAL_SECS: f64 = 0.5;
pub const AURA_KNOCKBACK_FORCE: f64 = 5.0;

/// Speed cap after an aura knockback impulse (units/s).
pub const AURA_KNOCKBACK_MAX_SPEED: f64 = 10.0;

// --- Progression ---

pub const INITIAL_EXPERIENCE_TO_LEVEL: u32 = 20;

/// Threshold growth factor applied on every level-up.
pub const EXPERIENCE_GROWTH_FACTOR: f64 = 1.5;

/// Number of buttons on the upgrade panel.
pub const UPGRADE_OFFER_SLOTS: usize = 3;

/// Damage multiplier gained per damage upgrade (additive).
pub const DAMAGE_UPGRADE_STEP: f64 = 0.1;

/// Attack interval reduction per attack-speed upgrade (multiplicative).
pub const ATTACK_SPEED_UPGRADE_STEP: f64 = 0.1;

/// Floor for the attack rate multiplier.
pub const MIN_ATTACK_RATE_MULTIPLIER: f64 = 0.1;

/// Max health gained per health upgrade.
pub const MAX_HEALTH_UPGRADE: i32 = 20;

// --- Spawning ---

/// Seconds between spawn events outside a wave.
pub const SPAWN_RATE_BASE_SECS: f64 = 2.0;

/// Enemies per spawn event outside a wave.
pub const BASE_SPAWN_COUNT: u32 = 5;

/// Seconds from run start (or from the end of a wave) to the next wave.
pub const WAVE_INTERVAL_SECS: f64 = 30.0;

/// Wave length (seconds).
pub const WAVE_DURATION_SECS: f64 = 10.0;

/// Spawn interval factor while a wave is active. Multiplying by 0.2 makes
/// waves 5x denser; dividing by it would make them sparser instead.
pub const WAVE_SPAWN_INTERVAL_FACTOR: f64 = 0.2;

/// Spawn count multiplier while a wave is active.
pub const WAVE_SPAWN_COUNT_MULTIPLIER: u32 = 3;

/// Distance from the player at which enemies appear.
pub const SPAWN_RADIUS: f64 = 15.0;

// --- Enemies ---

/// Collision radius of a hostile body.
pub const ENEMY_RADIUS: f64 = 0.5;

/// How long an enemy stands still after hitting the player (seconds).
pub const ENEMY_PAUSE_SECS: f64 = 0.5;

/// Contact damage dealt by any hostile.
pub const ENEMY_CONTACT_DAMAGE: i32 = 10;

/// Rate at which knockback velocity bleeds off (per second).
pub const KNOCKBACK_DAMPING: f64 = 10.0;

pub const GRUNT_SPEED: f64 = 2.0;
pub const GRUNT_HEALTH: i32 = 3;
pub const GRUNT_EXPERIENCE: u32 = 5;

pub const RUNNER_SPEED: f64 = 3.5;
pub const RUNNER_HEALTH: i32 = 2;
pub const RUNNER_EXPERIENCE: u32 = 5;

pub const BRUTE_SPEED: f64 = 1.2;
pub const BRUTE_HEALTH: i32 = 8;
pub const BRUTE_EXPERIENCE: u32 = 10;
