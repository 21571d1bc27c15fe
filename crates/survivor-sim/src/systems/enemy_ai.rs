//! Enemy AI system: updates hostile movement each step.
//!
//! Calls the movement FSM from survivor-ai to compute seek/pause transitions,
//! then writes the results back into ECS components.

use hecs::{Entity, World};

use survivor_core::components::{Enemy, EnemyMotion};
use survivor_core::enums::MoveState;
use survivor_core::types::{Position, Velocity};

use survivor_ai::fsm::{evaluate, MoveContext};
use survivor_ai::profiles::get_profile;

/// Run the enemy AI: evaluate the FSM for each enemy against `target`.
pub fn run(world: &mut World, target: Position, dt: f64) {
    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(Entity, MoveState, f64, Velocity, bool)> = Vec::new();

    {
        let mut query = world.query::<(&Enemy, &EnemyMotion, &Position)>();
        for (entity, (enemy, motion, pos)) in query.iter() {
            let ctx = MoveContext {
                state: motion.state,
                pause_remaining_secs: motion.pause_remaining_secs,
                position: *pos,
                target,
                speed: enemy.speed,
                struck_target: motion.struck_target,
                pause_secs: get_profile(enemy.archetype).pause_secs,
                dt,
            };

            let update = evaluate(&ctx);
            updates.push((
                entity,
                update.new_state,
                update.pause_remaining_secs,
                update.seek_velocity,
                update.state_changed,
            ));
        }
    }

    for (entity, state, pause_remaining_secs, velocity, changed) in updates {
        if let Ok(mut motion) = world.get::<&mut EnemyMotion>(entity) {
            motion.state = state;
            motion.pause_remaining_secs = pause_remaining_secs;
            motion.struck_target = false;
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = velocity;
        }
        if changed {
            tracing::trace!(?entity, ?state, "enemy movement state changed");
        }
    }
}
