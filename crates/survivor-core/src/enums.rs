//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Overall run phase. Every phase other than `Active` freezes the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    /// Paused by the player.
    Paused,
    /// An upgrade offer is pending.
    LevelUp,
    /// The player died.
    GameOver,
}

/// Weapon kinds the player can hold. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    BasicBullet,
    SpreadShot,
    Laser,
    Sword,
    GarlicAura,
}

impl WeaponKind {
    pub const COUNT: usize = 5;

    pub const ALL: [WeaponKind; Self::COUNT] = [
        WeaponKind::BasicBullet,
        WeaponKind::SpreadShot,
        WeaponKind::Laser,
        WeaponKind::Sword,
        WeaponKind::GarlicAura,
    ];

    /// Position of this kind in enum-indexed tables.
    pub fn index(self) -> usize {
        match self {
            WeaponKind::BasicBullet => 0,
            WeaponKind::SpreadShot => 1,
            WeaponKind::Laser => 2,
            WeaponKind::Sword => 3,
            WeaponKind::GarlicAura => 4,
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            WeaponKind::BasicBullet => 5,
            WeaponKind::SpreadShot => 3,
            WeaponKind::Laser => 3,
            WeaponKind::Sword => 3,
            WeaponKind::GarlicAura => 5,
        }
    }

    /// Whether this kind fires from the shared cooldown loop.
    /// The aura runs on its own timer instead.
    pub fn is_standard(self) -> bool {
        !matches!(self, WeaponKind::GarlicAura)
    }

    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::BasicBullet => "Basic Bullet",
            WeaponKind::SpreadShot => "Spread Shot",
            WeaponKind::Laser => "Laser",
            WeaponKind::Sword => "Sword",
            WeaponKind::GarlicAura => "Garlic Aura",
        }
    }
}

/// Permanent stat upgrades offered on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatUpgrade {
    /// Attack interval -10%.
    AttackSpeed,
    /// Damage multiplier +0.1.
    Damage,
    /// Max health +20.
    MaxHealth,
}

impl StatUpgrade {
    pub const ALL: [StatUpgrade; 3] = [
        StatUpgrade::AttackSpeed,
        StatUpgrade::Damage,
        StatUpgrade::MaxHealth,
    ];
}

/// A single option on the upgrade panel. Doubles as the option identifier
/// the UI sends back with `ApplyUpgrade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpgradeOption {
    Stat { stat: StatUpgrade },
    AddWeapon { kind: WeaponKind },
    UpgradeWeapon { kind: WeaponKind },
}

impl UpgradeOption {
    /// Button text for this option.
    pub fn label(&self) -> String {
        match self {
            UpgradeOption::Stat {
                stat: StatUpgrade::AttackSpeed,
            } => "Attack Speed +10%".to_string(),
            UpgradeOption::Stat {
                stat: StatUpgrade::Damage,
            } => "Damage +10%".to_string(),
            UpgradeOption::Stat {
                stat: StatUpgrade::MaxHealth,
            } => "Max Health +20".to_string(),
            UpgradeOption::AddWeapon { kind } => format!("New Weapon: {}", kind.label()),
            UpgradeOption::UpgradeWeapon { kind } => format!("Upgrade {}", kind.label()),
        }
    }
}

/// Spawn director phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    #[default]
    Idle,
    WaveActive,
}

/// Enemy roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Baseline walker.
    Grunt,
    /// Fast and fragile.
    Runner,
    /// Slow and tough.
    Brute,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 3] = [
        EnemyArchetype::Grunt,
        EnemyArchetype::Runner,
        EnemyArchetype::Brute,
    ];
}

/// Enemy movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveState {
    /// Walking straight at the player.
    #[default]
    Seeking,
    /// Standing still after landing a hit.
    Paused,
}
