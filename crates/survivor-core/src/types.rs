//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable entity identifier exposed outside the ECS (`hecs::Entity::to_bits`).
pub type EntityId = u64;

/// 3D position in simulation space (world units).
/// y = Up; play happens on the x/z ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// 3D velocity in simulation space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec3);

/// Virtual simulation clock. Only advances while the run is active,
/// so every timer measured against it freezes with the game.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active steps taken.
    pub tick: u64,
    /// Elapsed active simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.0.distance(other.0)
    }

    /// Unit direction toward `other`, or zero when the points coincide.
    pub fn direction_to(&self, other: &Position) -> DVec3 {
        (other.0 - self.0).normalize_or_zero()
    }

    /// Unit direction toward `other` projected onto the ground plane.
    pub fn ground_direction_to(&self, other: &Position) -> DVec3 {
        let delta = other.0 - self.0;
        DVec3::new(delta.x, 0.0, delta.z).normalize_or_zero()
    }

    /// Yaw in radians facing `other` (0 = +z, clockwise toward +x).
    pub fn yaw_to(&self, other: &Position) -> f64 {
        let delta = other.0 - self.0;
        delta.x.atan2(delta.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        self.0.length()
    }
}

impl SimTime {
    /// Advance the clock by one active step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
