//! Snapshot system: queries the ECS world and builds a complete RunSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::{Entity, World};

use survivor_core::components::*;
use survivor_core::enums::GamePhase;
use survivor_core::events::UpgradeOffer;
use survivor_core::state::*;
use survivor_core::types::{Position, SimTime};

use crate::arsenal::Arsenal;
use crate::progression::Progression;
use crate::systems::aura::AuraState;
use crate::systems::spawn_director::SpawnDirector;

/// Everything outside the world that the snapshot reports.
pub struct RunState<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: Entity,
    pub arsenal: &'a Arsenal,
    pub progression: &'a Progression,
    pub aura: Option<&'a AuraState>,
    pub director: &'a SpawnDirector,
    pub offer: Option<&'a UpgradeOffer>,
}

/// Build a complete RunSnapshot from the current world state.
pub fn build_snapshot(world: &World, run: &RunState) -> RunSnapshot {
    RunSnapshot {
        time: run.time,
        phase: run.phase,
        player: build_player(world, run.player),
        progression: build_progression(run.progression),
        weapons: build_weapons(run.arsenal),
        aura: run.aura.map(|aura| AuraView {
            radius: aura.radius,
            tick_damage: aura.tick_damage,
            occupants: aura.occupants.len(),
        }),
        wave: WaveView {
            phase: run.director.phase(),
            next_transition_secs: run.director.next_transition_secs(),
        },
        hostiles: build_hostiles(world),
        projectiles: build_projectiles(world),
        orbs: build_orbs(world),
        offer: run.offer.cloned(),
    }
}

fn build_player(world: &World, player: Entity) -> PlayerView {
    let position = world
        .get::<&Position>(player)
        .map(|p| *p)
        .unwrap_or_default();
    let (health, max_health) = world
        .get::<&Health>(player)
        .map(|h| (h.current, h.max))
        .unwrap_or_default();
    PlayerView {
        position,
        health,
        max_health,
    }
}

fn build_progression(progression: &Progression) -> ProgressionView {
    ProgressionView {
        level: progression.level(),
        experience: progression.experience(),
        experience_to_next_level: progression.experience_to_next_level(),
        damage_bonus_pct: progression.damage_bonus_pct(),
        attack_speed_bonus_pct: progression.attack_speed_bonus_pct(),
    }
}

fn build_weapons(arsenal: &Arsenal) -> Vec<WeaponView> {
    arsenal
        .held()
        .map(|(kind, level)| WeaponView {
            kind,
            level,
            max_level: kind.max_level(),
        })
        .collect()
}

/// Hostiles sorted by entity id for a stable order.
fn build_hostiles(world: &World) -> Vec<HostileView> {
    let mut hostiles: Vec<HostileView> = world
        .query::<(&Enemy, &Position, &Health)>()
        .iter()
        .map(|(entity, (enemy, pos, health))| HostileView {
            entity: entity.to_bits().get(),
            archetype: enemy.archetype,
            position: *pos,
            health: health.current,
        })
        .collect();

    hostiles.sort_by_key(|h| h.entity);
    hostiles
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<(Entity, ProjectileView)> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(entity, (projectile, pos))| {
            (
                entity,
                ProjectileView {
                    source: projectile.source,
                    position: *pos,
                },
            )
        })
        .collect();

    projectiles.sort_by_key(|(entity, _)| entity.to_bits());
    projectiles.into_iter().map(|(_, view)| view).collect()
}

fn build_orbs(world: &World) -> Vec<OrbView> {
    let mut orbs: Vec<(Entity, OrbView)> = world
        .query::<(&ExperienceOrb, &Position)>()
        .iter()
        .map(|(entity, (orb, pos))| {
            (
                entity,
                OrbView {
                    position: *pos,
                    value: orb.value,
                },
            )
        })
        .collect();

    orbs.sort_by_key(|(entity, _)| entity.to_bits());
    orbs.into_iter().map(|(_, view)| view).collect()
}
