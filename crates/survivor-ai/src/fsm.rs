//! Enemy movement finite state machine.
//!
//! Pure functions that compute state transitions and seek velocity for an
//! enemy based on its current state and situation.
//! No ECS dependency; operates on plain data.

use glam::DVec3;

use survivor_core::enums::MoveState;
use survivor_core::types::{Position, Velocity};

/// Input to the movement FSM for a single enemy.
pub struct MoveContext {
    pub state: MoveState,
    pub pause_remaining_secs: f64,
    pub position: Position,
    pub target: Position,
    pub speed: f64,
    /// Whether this enemy landed a contact hit on the player last step.
    pub struck_target: bool,
    /// Pause length applied when `struck_target` is set.
    pub pause_secs: f64,
    pub dt: f64,
}

/// Output from the movement FSM.
pub struct MoveUpdate {
    pub new_state: MoveState,
    pub pause_remaining_secs: f64,
    /// Seek velocity for this step (zero while paused).
    pub seek_velocity: Velocity,
    pub state_changed: bool,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &MoveContext) -> MoveUpdate {
    if ctx.struck_target {
        return MoveUpdate {
            new_state: MoveState::Paused,
            pause_remaining_secs: ctx.pause_secs,
            seek_velocity: Velocity::default(),
            state_changed: ctx.state != MoveState::Paused,
        };
    }

    match ctx.state {
        MoveState::Paused => evaluate_paused(ctx),
        MoveState::Seeking => MoveUpdate {
            new_state: MoveState::Seeking,
            pause_remaining_secs: 0.0,
            seek_velocity: seek_velocity(ctx),
            state_changed: false,
        },
    }
}

fn evaluate_paused(ctx: &MoveContext) -> MoveUpdate {
    let remaining = ctx.pause_remaining_secs - ctx.dt;
    if remaining <= 0.0 {
        return MoveUpdate {
            new_state: MoveState::Seeking,
            pause_remaining_secs: 0.0,
            seek_velocity: seek_velocity(ctx),
            state_changed: true,
        };
    }

    MoveUpdate {
        new_state: MoveState::Paused,
        pause_remaining_secs: remaining,
        seek_velocity: Velocity::default(),
        state_changed: false,
    }
}

/// Straight-line ground velocity toward the target.
fn seek_velocity(ctx: &MoveContext) -> Velocity {
    let dir: DVec3 = ctx.position.ground_direction_to(&ctx.target);
    Velocity(dir * ctx.speed)
}
