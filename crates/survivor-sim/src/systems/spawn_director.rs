//! Spawn director: a timer-driven wave state machine.
//!
//! Outside a wave it spawns a small group every `spawn_rate_base_secs`.
//! Every `wave_interval_secs` a wave starts, spawning groups three times the
//! size five times as often until `wave_duration_secs` have passed.

use hecs::World;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use survivor_core::constants::{WAVE_SPAWN_COUNT_MULTIPLIER, WAVE_SPAWN_INTERVAL_FACTOR};
use survivor_core::enums::{EnemyArchetype, WavePhase};
use survivor_core::events::PresentationEvent;
use survivor_core::types::Position;

use crate::config::SpawnTuning;
use crate::world_setup;

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    phase: WavePhase,
    next_spawn_secs: f64,
    next_wave_secs: f64,
    wave_end_secs: f64,
    tuning: SpawnTuning,
}

impl SpawnDirector {
    /// Director for a run starting at `now`. The first group spawns immediately.
    pub fn new(tuning: SpawnTuning, now: f64) -> Self {
        Self {
            phase: WavePhase::Idle,
            next_spawn_secs: now,
            next_wave_secs: now + tuning.wave_interval_secs,
            wave_end_secs: 0.0,
            tuning,
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn next_spawn_secs(&self) -> f64 {
        self.next_spawn_secs
    }

    pub fn next_wave_secs(&self) -> f64 {
        self.next_wave_secs
    }

    pub fn wave_end_secs(&self) -> f64 {
        self.wave_end_secs
    }

    /// Clock time of the next phase change.
    pub fn next_transition_secs(&self) -> f64 {
        match self.phase {
            WavePhase::Idle => self.next_wave_secs,
            WavePhase::WaveActive => self.wave_end_secs,
        }
    }

    pub fn spawn_radius(&self) -> f64 {
        self.tuning.spawn_radius
    }

    /// Seconds between spawn events in the current phase.
    pub fn spawn_interval(&self) -> f64 {
        match self.phase {
            WavePhase::Idle => self.tuning.spawn_rate_base_secs,
            WavePhase::WaveActive => self.tuning.spawn_rate_base_secs * WAVE_SPAWN_INTERVAL_FACTOR,
        }
    }

    /// Enemies per spawn event in the current phase.
    pub fn spawn_count(&self) -> u32 {
        match self.phase {
            WavePhase::Idle => self.tuning.base_spawn_count,
            WavePhase::WaveActive => self.tuning.base_spawn_count * WAVE_SPAWN_COUNT_MULTIPLIER,
        }
    }

    /// Advance the state machine to `now`. Returns how many enemies to spawn.
    pub fn update(&mut self, now: f64, events: &mut Vec<PresentationEvent>) -> u32 {
        if self.phase == WavePhase::WaveActive && now >= self.wave_end_secs {
            self.phase = WavePhase::Idle;
            self.next_wave_secs = now + self.tuning.wave_interval_secs;
            tracing::info!(now, next_wave = self.next_wave_secs, "wave ended");
            events.push(PresentationEvent::WaveEnded {
                next_wave_secs: self.next_wave_secs,
            });
        }

        if self.phase == WavePhase::Idle && now >= self.next_wave_secs {
            self.phase = WavePhase::WaveActive;
            self.wave_end_secs = now + self.tuning.wave_duration_secs;
            tracing::info!(now, ends_at = self.wave_end_secs, "wave started");
            events.push(PresentationEvent::WaveStarted {
                ends_at_secs: self.wave_end_secs,
            });
        }

        if now < self.next_spawn_secs {
            return 0;
        }
        self.next_spawn_secs = now + self.spawn_interval();
        self.spawn_count()
    }
}

/// Run the director and spawn whatever it asks for around `center`.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    director: &mut SpawnDirector,
    center: Position,
    now: f64,
    events: &mut Vec<PresentationEvent>,
) -> u32 {
    let count = director.update(now, events);
    for _ in 0..count {
        let archetype = EnemyArchetype::ALL
            .choose(rng)
            .copied()
            .unwrap_or(EnemyArchetype::Grunt);
        let position = world_setup::random_ring_position(rng, center, director.spawn_radius());
        world_setup::spawn_enemy(world, archetype, position);
    }
    if count > 0 {
        tracing::debug!(count, phase = ?director.phase(), "spawned enemies");
    }
    count
}
