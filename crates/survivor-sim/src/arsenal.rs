//! The player's held weapons.
//!
//! An enum-indexed table of levels plus the acquisition order, which is also
//! the firing order of the standard volley.

use survivor_core::enums::WeaponKind;

/// Result of an acquire-or-upgrade request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArsenalChange {
    /// New slot at level 1.
    Added(WeaponKind),
    Upgraded { kind: WeaponKind, level: u32 },
    /// Already at the kind's max level. Nothing changed.
    AtMaxLevel(WeaponKind),
    /// Not held and no free slot. Nothing changed.
    SlotsFull(WeaponKind),
}

#[derive(Debug, Clone)]
pub struct Arsenal {
    levels: [Option<u32>; WeaponKind::COUNT],
    order: Vec<WeaponKind>,
    max_active: usize,
}

impl Arsenal {
    /// Empty arsenal holding at most `max_active` kinds.
    pub fn new(max_active: usize) -> Self {
        Self {
            levels: [None; WeaponKind::COUNT],
            order: Vec::with_capacity(WeaponKind::COUNT),
            max_active,
        }
    }

    /// Arsenal a run starts with: Basic Bullet at level 1.
    pub fn starting(max_active: usize) -> Self {
        let mut arsenal = Self::new(max_active);
        arsenal.acquire_or_upgrade(WeaponKind::BasicBullet);
        arsenal
    }

    pub fn level(&self, kind: WeaponKind) -> Option<u32> {
        self.levels[kind.index()]
    }

    pub fn holds(&self, kind: WeaponKind) -> bool {
        self.level(kind).is_some()
    }

    pub fn is_maxed(&self, kind: WeaponKind) -> bool {
        self.level(kind).is_some_and(|l| l >= kind.max_level())
    }

    /// Number of distinct kinds held.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.max_active
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Held kinds with their levels, in acquisition order.
    pub fn held(&self) -> impl Iterator<Item = (WeaponKind, u32)> + '_ {
        self.order
            .iter()
            .filter_map(|&kind| self.level(kind).map(|level| (kind, level)))
    }

    /// Held kinds that fire from the shared cooldown loop.
    pub fn standard(&self) -> impl Iterator<Item = (WeaponKind, u32)> + '_ {
        self.held().filter(|(kind, _)| kind.is_standard())
    }

    /// Raise a held kind by one level, or add it at level 1 if a slot is free.
    pub fn acquire_or_upgrade(&mut self, kind: WeaponKind) -> ArsenalChange {
        let slot = &mut self.levels[kind.index()];
        match *slot {
            Some(level) if level >= kind.max_level() => ArsenalChange::AtMaxLevel(kind),
            Some(level) => {
                *slot = Some(level + 1);
                ArsenalChange::Upgraded {
                    kind,
                    level: level + 1,
                }
            }
            None if self.order.len() >= self.max_active => ArsenalChange::SlotsFull(kind),
            None => {
                *slot = Some(1);
                self.order.push(kind);
                ArsenalChange::Added(kind)
            }
        }
    }

    /// Drop a held kind. No upgrade path removes weapons; tests use this to
    /// exercise the aura's release path.
    #[cfg(test)]
    pub(crate) fn remove(&mut self, kind: WeaponKind) {
        self.levels[kind.index()] = None;
        self.order.retain(|&k| k != kind);
    }
}
