//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next step boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Set the desired ground-plane movement direction. Zero stops.
    Move { x: f64, z: f64 },
    /// Pick an option from the pending upgrade offer.
    ApplyUpgrade { option: UpgradeOption },
    /// Pause the run.
    Pause,
    /// Resume a paused run.
    Resume,
    /// Throw the current run away and start over.
    Restart,
}
