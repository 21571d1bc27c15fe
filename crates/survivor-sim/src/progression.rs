//! Experience ledger, level-ups, and upgrade offers.

use rand::seq::SliceRandom;
use rand::Rng;

use survivor_core::components::Health;
use survivor_core::constants::*;
use survivor_core::enums::{StatUpgrade, UpgradeOption, WeaponKind};
use survivor_core::events::{OfferEntry, UpgradeOffer};

use crate::arsenal::{Arsenal, ArsenalChange};
use crate::config::ProgressionTuning;

/// Player level, experience, and global combat multipliers.
#[derive(Debug, Clone)]
pub struct Progression {
    level: u32,
    experience: u32,
    experience_to_next_level: u32,
    growth_factor: f64,
    damage_multiplier: f64,
    attack_rate_multiplier: f64,
}

impl Progression {
    pub fn new(tuning: &ProgressionTuning) -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next_level: tuning.initial_experience_to_level.max(1),
            growth_factor: tuning.growth_factor,
            damage_multiplier: 1.0,
            attack_rate_multiplier: 1.0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn experience_to_next_level(&self) -> u32 {
        self.experience_to_next_level
    }

    pub fn damage_multiplier(&self) -> f64 {
        self.damage_multiplier
    }

    pub fn attack_rate_multiplier(&self) -> f64 {
        self.attack_rate_multiplier
    }

    /// Add experience. Returns the new level if this grant levelled up.
    ///
    /// At most one level-up fires per call, even when the grant covers more
    /// than one threshold; the surplus stays in the ledger.
    pub fn add_experience(&mut self, amount: i32) -> Option<u32> {
        if amount < 0 {
            tracing::warn!(amount, "negative experience grant clamped to zero");
        }
        self.experience = self.experience.saturating_add(amount.max(0) as u32);

        if self.experience >= self.experience_to_next_level {
            self.level_up();
            Some(self.level)
        } else {
            None
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.experience = self.experience.saturating_sub(self.experience_to_next_level);
        self.experience_to_next_level =
            ((self.experience_to_next_level as f64 * self.growth_factor).round() as u32).max(1);
        tracing::info!(
            level = self.level,
            experience = self.experience,
            to_next = self.experience_to_next_level,
            "level up"
        );
    }

    /// `round(base * damage_multiplier * factor)`, never negative.
    pub fn scaled_damage(&self, base: i32, factor: f64) -> i32 {
        ((base as f64 * self.damage_multiplier * factor).round() as i32).max(0)
    }

    /// Effective volley interval for a base attack rate.
    pub fn attack_interval(&self, attack_rate_secs: f64) -> f64 {
        (attack_rate_secs * self.attack_rate_multiplier).max(MIN_ATTACK_INTERVAL_SECS)
    }

    /// Damage bonus over base in whole percent.
    pub fn damage_bonus_pct(&self) -> i32 {
        ((self.damage_multiplier - 1.0) * 100.0).round() as i32
    }

    /// Attack speed bonus over base in whole percent.
    pub fn attack_speed_bonus_pct(&self) -> i32 {
        ((1.0 - self.attack_rate_multiplier) * 100.0).round() as i32
    }

    /// Apply a stat upgrade. Max health also heals by the same amount.
    pub fn apply_stat(&mut self, stat: StatUpgrade, health: &mut Health) {
        match stat {
            StatUpgrade::Damage => {
                self.damage_multiplier += DAMAGE_UPGRADE_STEP;
                tracing::debug!(multiplier = self.damage_multiplier, "damage upgraded");
            }
            StatUpgrade::AttackSpeed => {
                self.attack_rate_multiplier = (self.attack_rate_multiplier
                    * (1.0 - ATTACK_SPEED_UPGRADE_STEP))
                    .max(MIN_ATTACK_RATE_MULTIPLIER);
                tracing::debug!(
                    multiplier = self.attack_rate_multiplier,
                    "attack speed upgraded"
                );
            }
            StatUpgrade::MaxHealth => {
                health.max += MAX_HEALTH_UPGRADE;
                health.current = (health.current + MAX_HEALTH_UPGRADE).clamp(0, health.max);
                tracing::debug!(max = health.max, "max health upgraded");
            }
        }
    }
}

/// Every option currently valid for the player.
pub fn offer_candidates(arsenal: &Arsenal) -> Vec<UpgradeOption> {
    let mut candidates: Vec<UpgradeOption> = StatUpgrade::ALL
        .iter()
        .map(|&stat| UpgradeOption::Stat { stat })
        .collect();

    for kind in WeaponKind::ALL {
        if arsenal.holds(kind) {
            if !arsenal.is_maxed(kind) {
                candidates.push(UpgradeOption::UpgradeWeapon { kind });
            }
        } else if !arsenal.is_full() {
            candidates.push(UpgradeOption::AddWeapon { kind });
        }
    }
    candidates
}

/// Shuffle the candidates and keep the first `slots`. Never repeats an option.
pub fn build_offer<R: Rng + ?Sized>(arsenal: &Arsenal, slots: usize, rng: &mut R) -> UpgradeOffer {
    let mut candidates = offer_candidates(arsenal);
    candidates.shuffle(rng);
    candidates.truncate(slots);

    UpgradeOffer {
        entries: candidates
            .into_iter()
            .map(|option| OfferEntry {
                option,
                label: option.label(),
            })
            .collect(),
        slots,
    }
}

/// What applying an option actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedUpgrade {
    Stat(StatUpgrade),
    Weapon(ArsenalChange),
}

/// Apply an upgrade option to the player.
pub fn apply_upgrade(
    option: UpgradeOption,
    progression: &mut Progression,
    arsenal: &mut Arsenal,
    health: &mut Health,
) -> AppliedUpgrade {
    match option {
        UpgradeOption::Stat { stat } => {
            progression.apply_stat(stat, health);
            AppliedUpgrade::Stat(stat)
        }
        UpgradeOption::AddWeapon { kind } | UpgradeOption::UpgradeWeapon { kind } => {
            let change = arsenal.acquire_or_upgrade(kind);
            match change {
                ArsenalChange::Added(kind) => {
                    tracing::debug!(?kind, held = arsenal.len(), "weapon added");
                }
                ArsenalChange::Upgraded { kind, level } => {
                    tracing::debug!(?kind, level, "weapon upgraded");
                }
                ArsenalChange::AtMaxLevel(kind) => {
                    tracing::debug!(?kind, "weapon already at max level");
                }
                ArsenalChange::SlotsFull(kind) => {
                    tracing::warn!(
                        ?kind,
                        max = arsenal.max_active(),
                        "cannot add weapon, all slots taken"
                    );
                }
            }
            AppliedUpgrade::Weapon(change)
        }
    }
}
