//! Run state snapshot: the complete visible state handed to the frontend each step.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::UpgradeOffer;
use crate::types::{EntityId, Position, SimTime};

/// Complete run state produced after each step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub progression: ProgressionView,
    pub weapons: Vec<WeaponView>,
    pub aura: Option<AuraView>,
    pub wave: WaveView,
    pub hostiles: Vec<HostileView>,
    pub projectiles: Vec<ProjectileView>,
    pub orbs: Vec<OrbView>,
    /// Pending upgrade offer (only in `LevelUp`).
    pub offer: Option<UpgradeOffer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionView {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    /// Damage bonus over base, in whole percent.
    pub damage_bonus_pct: i32,
    /// Attack speed bonus over base, in whole percent.
    pub attack_speed_bonus_pct: i32,
}

/// A held weapon, in acquisition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub level: u32,
    pub max_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraView {
    pub radius: f64,
    pub tick_damage: i32,
    pub occupants: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub phase: WavePhase,
    /// Clock time of the next wave start (Idle) or current wave end (WaveActive).
    pub next_transition_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileView {
    pub entity: EntityId,
    pub archetype: EnemyArchetype,
    pub position: Position,
    pub health: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub source: WeaponKind,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbView {
    pub position: Position,
    pub value: u32,
}
