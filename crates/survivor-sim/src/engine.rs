//! Simulation engine, the core of the game.
//!
//! `Simulation` owns the hecs ECS world, processes player commands, runs all
//! systems, and produces `RunSnapshot`s. Completely headless (no renderer or
//! UI dependency), enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use survivor_core::commands::PlayerCommand;
use survivor_core::components::Health;
use survivor_core::constants::{DT, MAX_STEP_SECS};
use survivor_core::enums::{GamePhase, UpgradeOption};
use survivor_core::events::{PresentationEvent, UpgradeOffer};
use survivor_core::state::RunSnapshot;
use survivor_core::types::{Position, SimTime};

use crate::arsenal::{Arsenal, ArsenalChange};
use crate::collaborators::{BestTimeStore, EventLog, MemoryBestTime, Presentation};
use crate::config::SimConfig;
use crate::progression::{self, AppliedUpgrade, Progression};
use crate::systems;
use crate::systems::aura::AuraState;
use crate::systems::snapshot::RunState;
use crate::systems::spawn_director::SpawnDirector;
use crate::systems::weapons::AttackClock;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all run state.
pub struct Simulation<P: Presentation = EventLog, B: BestTimeStore = MemoryBestTime> {
    config: SimConfig,
    world: World,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    player: Entity,
    move_input: DVec3,
    arsenal: Arsenal,
    progression: Progression,
    attack_clock: AttackClock,
    aura: Option<AuraState>,
    director: SpawnDirector,
    pending_offer: Option<UpgradeOffer>,
    command_queue: VecDeque<PlayerCommand>,
    deaths: Vec<Entity>,
    despawn_buffer: Vec<Entity>,
    events: Vec<PresentationEvent>,
    presentation: P,
    best_time: B,
}

impl Simulation<EventLog, MemoryBestTime> {
    /// Simulation that records presentation events and keeps the best time in memory.
    pub fn with_defaults(config: SimConfig) -> Self {
        Self::new(config, EventLog::default(), MemoryBestTime::default())
    }
}

impl<P: Presentation, B: BestTimeStore> Simulation<P, B> {
    /// Create a new simulation and start a run.
    ///
    /// An invalid config is logged and replaced by the defaults (keeping the seed).
    pub fn new(config: SimConfig, presentation: P, best_time: B) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "invalid config, falling back to defaults");
                SimConfig {
                    seed: config.seed,
                    ..SimConfig::default()
                }
            }
        };

        let mut world = World::new();
        let player = world_setup::spawn_player(&mut world, &config.player);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        tracing::info!(seed = config.seed, "run started");

        Self {
            arsenal: Arsenal::starting(config.weapons.max_active_weapons),
            progression: Progression::new(&config.progression),
            director: SpawnDirector::new(config.spawner.clone(), 0.0),
            config,
            world,
            time: SimTime::default(),
            phase: GamePhase::Active,
            rng,
            player,
            move_input: DVec3::ZERO,
            attack_clock: AttackClock::default(),
            aura: None,
            pending_offer: None,
            command_queue: VecDeque::new(),
            deaths: Vec::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            presentation,
            best_time,
        }
    }

    /// Queue a player command for processing at the next step boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds of frame time and return the
    /// resulting snapshot. Nothing advances unless the run is active.
    pub fn step(&mut self, dt: f64) -> RunSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = (dt * self.config.time_scale).clamp(0.0, MAX_STEP_SECS);
            if dt > 0.0 {
                self.run_systems(dt);
            }
        }

        self.flush_events();
        self.snapshot()
    }

    /// Advance by one nominal step.
    pub fn tick(&mut self) -> RunSnapshot {
        self.step(DT)
    }

    /// Grant experience directly. Returns the new level on a level-up.
    pub fn add_experience(&mut self, amount: i32) -> Option<u32> {
        let level = self.grant_experience(amount);
        self.flush_events();
        level
    }

    /// Apply an option from the pending offer and resume the run.
    ///
    /// Returns false (and changes nothing) when no offer is pending or the
    /// option is not part of it.
    pub fn apply_upgrade(&mut self, option: UpgradeOption) -> bool {
        let applied = self.resolve_upgrade(option);
        self.flush_events();
        applied
    }

    /// Current read-only view of the run.
    pub fn snapshot(&self) -> RunSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &RunState {
                time: self.time,
                phase: self.phase,
                player: self.player,
                arsenal: &self.arsenal,
                progression: &self.progression,
                aura: self.aura.as_ref(),
                director: &self.director,
                offer: self.pending_offer.as_ref(),
            },
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn aura(&self) -> Option<&AuraState> {
        self.aura.as_ref()
    }

    pub fn director(&self) -> &SpawnDirector {
        &self.director
    }

    pub fn pending_offer(&self) -> Option<&UpgradeOffer> {
        self.pending_offer.as_ref()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn best_time_store(&self) -> &B {
        &self.best_time
    }

    /// Get a mutable reference to the ECS world (for tests staging hostiles).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn arsenal_mut(&mut self) -> &mut Arsenal {
        &mut self.arsenal
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Move { x, z } => {
                self.move_input = DVec3::new(x, 0.0, z);
            }
            PlayerCommand::ApplyUpgrade { option } => {
                self.resolve_upgrade(option);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                    self.events.push(PresentationEvent::PausePanelOpened);
                } else {
                    tracing::warn!(phase = ?self.phase, "pause ignored");
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                    self.events.push(PresentationEvent::PausePanelClosed);
                } else {
                    tracing::warn!(phase = ?self.phase, "resume ignored");
                }
            }
            PlayerCommand::Restart => self.restart(),
        }
    }

    /// Throw the current run away and start a fresh one from the same config.
    /// The RNG stream carries on, so consecutive runs differ.
    fn restart(&mut self) {
        match self.phase {
            GamePhase::Paused => self.events.push(PresentationEvent::PausePanelClosed),
            GamePhase::LevelUp => self.events.push(PresentationEvent::UpgradePanelClosed),
            GamePhase::Active | GamePhase::GameOver => {}
        }
        if self.aura.take().is_some() {
            self.events.push(PresentationEvent::AuraReleased);
        }

        self.world.clear();
        self.player = world_setup::spawn_player(&mut self.world, &self.config.player);
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
        self.move_input = DVec3::ZERO;
        self.arsenal = Arsenal::starting(self.config.weapons.max_active_weapons);
        self.progression = Progression::new(&self.config.progression);
        self.attack_clock = AttackClock::default();
        self.director = SpawnDirector::new(self.config.spawner.clone(), 0.0);
        self.pending_offer = None;
        self.deaths.clear();
        tracing::info!("run restarted");
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Enemy and player movement
        systems::movement::steer_player(
            &mut self.world,
            self.player,
            self.move_input,
            self.config.player.speed,
        );
        let player_pos = self.player_position();
        systems::enemy_ai::run(&mut self.world, player_pos, dt);
        systems::movement::run(&mut self.world, dt);
        let player_pos = self.player_position();

        // 2. Standard weapons (shared cooldown)
        systems::weapons::run(
            &mut self.world,
            self.player,
            &self.arsenal,
            &self.progression,
            &self.config.weapons,
            &mut self.attack_clock,
            now,
            &mut self.events,
            &mut self.deaths,
        );
        // 3. Projectile hits and lifetimes
        systems::projectiles::run(&mut self.world, dt, &mut self.events, &mut self.deaths);
        // 4. Aura countdown
        systems::aura::run(
            &mut self.world,
            self.player,
            &self.arsenal,
            &self.progression,
            &self.config.weapons.aura,
            &mut self.aura,
            dt,
            &mut self.events,
            &mut self.deaths,
        );
        // 5. Spawn director
        systems::spawn_director::run(
            &mut self.world,
            &mut self.rng,
            &mut self.director,
            player_pos,
            now,
            &mut self.events,
        );
        // 6. Contact damage on the player
        let player_died = systems::contact::run(
            &mut self.world,
            self.player,
            &self.config.player,
            dt,
            &mut self.events,
        );
        // 7. Orb pickup
        if !player_died {
            self.collect_orbs(player_pos);
        }
        // 8. Cleanup (deaths, spent projectiles)
        systems::cleanup::run(
            &mut self.world,
            &mut self.deaths,
            &mut self.despawn_buffer,
            &mut self.events,
        );

        self.time.advance(dt);

        if player_died {
            self.end_run();
        }
    }

    /// Collect orbs in reach. Stops at the first level-up so the offer
    /// reflects the state the player chooses from.
    fn collect_orbs(&mut self, player_pos: Position) {
        let reach = systems::pickup::orbs_in_reach(
            &self.world,
            player_pos,
            self.config.player.pickup_radius,
        );
        for (orb, value) in reach {
            let _ = self.world.despawn(orb);
            let amount = i32::try_from(value).unwrap_or(i32::MAX);
            if self.grant_experience(amount).is_some() {
                break;
            }
        }
    }

    fn grant_experience(&mut self, amount: i32) -> Option<u32> {
        let level = self.progression.add_experience(amount);
        self.events.push(PresentationEvent::ExperienceChanged {
            experience: self.progression.experience(),
            to_next_level: self.progression.experience_to_next_level(),
        });
        if let Some(level) = level {
            self.on_level_up(level);
        }
        level
    }

    fn on_level_up(&mut self, level: u32) {
        self.events.push(PresentationEvent::LevelReached { level });
        if self.phase == GamePhase::GameOver {
            return;
        }
        if self.pending_offer.is_some() {
            tracing::debug!(level, "offer already pending, keeping it");
            return;
        }

        let offer = progression::build_offer(
            &self.arsenal,
            self.config.progression.offer_slots,
            &mut self.rng,
        );
        if offer.entries.is_empty() {
            tracing::debug!(level, "no upgrade candidates, run continues");
            return;
        }

        self.phase = GamePhase::LevelUp;
        self.events.push(PresentationEvent::UpgradePanelOpened {
            offer: offer.clone(),
        });
        self.pending_offer = Some(offer);
    }

    fn resolve_upgrade(&mut self, option: UpgradeOption) -> bool {
        let Some(offer) = self.pending_offer.as_ref() else {
            tracing::warn!(?option, "no upgrade offer pending, ignoring");
            return false;
        };
        if !offer.contains(option) {
            tracing::warn!(?option, "option not in the pending offer, ignoring");
            return false;
        }
        self.pending_offer = None;

        let mut health = self
            .world
            .get::<&Health>(self.player)
            .map(|h| *h)
            .unwrap_or(Health { current: 0, max: 0 });
        let applied = progression::apply_upgrade(
            option,
            &mut self.progression,
            &mut self.arsenal,
            &mut health,
        );
        if let Ok(mut h) = self.world.get::<&mut Health>(self.player) {
            *h = health;
        }

        match applied {
            AppliedUpgrade::Weapon(ArsenalChange::Added(kind)) => {
                self.events
                    .push(PresentationEvent::WeaponChanged { kind, level: 1 });
            }
            AppliedUpgrade::Weapon(ArsenalChange::Upgraded { kind, level }) => {
                self.events
                    .push(PresentationEvent::WeaponChanged { kind, level });
            }
            AppliedUpgrade::Weapon(_) | AppliedUpgrade::Stat(_) => {}
        }

        self.events.push(PresentationEvent::UpgradePanelClosed);
        if self.phase == GamePhase::LevelUp {
            self.phase = GamePhase::Active;
        }
        true
    }

    /// The player died: record the time and stop the run.
    fn end_run(&mut self) {
        let survived = self.time.elapsed_secs;
        let best = self.best_time.best_time();
        let new_record = survived > best;
        if new_record {
            self.best_time.set_best_time(survived);
        }

        self.phase = GamePhase::GameOver;
        self.pending_offer = None;
        tracing::info!(
            survived_secs = survived,
            best_secs = best.max(survived),
            new_record,
            level = self.progression.level(),
            "run over"
        );
        self.events.push(PresentationEvent::RunOver {
            survived_secs: survived,
            best_secs: best.max(survived),
            new_record,
        });
    }

    fn player_position(&self) -> Position {
        self.world
            .get::<&Position>(self.player)
            .map(|p| *p)
            .unwrap_or_default()
    }

    /// Hand buffered events to the presentation sink.
    fn flush_events(&mut self) {
        for event in self.events.drain(..) {
            self.presentation.present(event);
        }
    }
}
