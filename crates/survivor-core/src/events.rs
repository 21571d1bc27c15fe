//! Events emitted by the simulation for presentation and UI feedback.
//!
//! All events are fire-and-forget: nothing the presentation layer does with
//! them flows back into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// One button on the upgrade panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferEntry {
    pub option: UpgradeOption,
    pub label: String,
}

/// The set of upgrade options presented at a level-up.
/// Holds at most `slots` entries; missing entries are hidden buttons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOffer {
    pub entries: Vec<OfferEntry>,
    pub slots: usize,
}

impl UpgradeOffer {
    pub fn contains(&self, option: UpgradeOption) -> bool {
        self.entries.iter().any(|e| e.option == option)
    }

    pub fn options(&self) -> impl Iterator<Item = UpgradeOption> + '_ {
        self.entries.iter().map(|e| e.option)
    }
}

/// Display requests for the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// Floating damage number.
    DamageNumber { position: Position, amount: i32 },
    /// Hit flash / tint on an entity.
    Flash { entity: EntityId },
    /// Line segment drawn for a fixed duration (laser).
    LineSegment {
        from: Position,
        to: Position,
        duration_secs: f64,
    },
    /// Sword swing animation, holder facing `yaw`.
    SwordSwing { yaw: f64, radius: f64 },
    /// Aura damage pulse.
    AuraPulse { center: Position, radius: f64 },
    /// The aura visual was released (owning slot no longer held).
    AuraReleased,
    /// A weapon was added or levelled.
    WeaponChanged { kind: WeaponKind, level: u32 },
    /// An enemy died and dropped experience.
    EnemyKilled {
        entity: EntityId,
        archetype: EnemyArchetype,
        position: Position,
        experience: u32,
    },
    /// Experience bar changed.
    ExperienceChanged { experience: u32, to_next_level: u32 },
    /// The player reached a new level.
    LevelReached { level: u32 },
    UpgradePanelOpened { offer: UpgradeOffer },
    UpgradePanelClosed,
    PausePanelOpened,
    PausePanelClosed,
    WaveStarted { ends_at_secs: f64 },
    WaveEnded { next_wave_secs: f64 },
    /// The player died. Times in seconds of survived run time.
    RunOver {
        survived_secs: f64,
        best_secs: f64,
        new_record: bool,
    },
}
