//! Narrow interfaces to the world outside the simulation.
//!
//! Collaborators are injected into `Simulation::new` instead of living in
//! global state. None of them can fail the simulation.

use glam::DVec3;

use survivor_core::components::KnockbackBody;
use survivor_core::events::PresentationEvent;

/// Receives fire-and-forget display requests.
pub trait Presentation {
    fn present(&mut self, event: PresentationEvent);
}

/// Presentation sink that records everything it receives.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<PresentationEvent>,
}

impl EventLog {
    /// Remove and return everything recorded so far.
    pub fn drain(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Presentation for EventLog {
    fn present(&mut self, event: PresentationEvent) {
        self.events.push(event);
    }
}

/// Presentation sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Presentation for Discard {
    fn present(&mut self, _event: PresentationEvent) {}
}

/// Read/write access to the best survived time. Used once per run end.
pub trait BestTimeStore {
    fn best_time(&self) -> f64;
    fn set_best_time(&mut self, secs: f64);
}

/// Best time kept in memory only.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryBestTime {
    pub secs: f64,
}

impl BestTimeStore for MemoryBestTime {
    fn best_time(&self) -> f64 {
        self.secs
    }

    fn set_best_time(&mut self, secs: f64) {
        self.secs = secs;
    }
}

/// Velocity-capable body. Hostiles without one ignore knockback.
pub trait Mover {
    fn apply_impulse(&mut self, impulse: DVec3);
    fn speed(&self) -> f64;
    fn clamp_speed(&mut self, max: f64);
}

impl Mover for KnockbackBody {
    fn apply_impulse(&mut self, impulse: DVec3) {
        self.velocity.0 += impulse;
    }

    fn speed(&self) -> f64 {
        self.velocity.speed()
    }

    fn clamp_speed(&mut self, max: f64) {
        self.velocity.0 = self.velocity.0.clamp_length_max(max);
    }
}
