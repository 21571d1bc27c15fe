//! Kinematic integration system.
//!
//! Updates Position from Velocity each step: position += velocity * dt.
//! Knockback velocity is integrated on top and bleeds off over time.

use glam::DVec3;
use hecs::{Entity, World};

use survivor_core::components::KnockbackBody;
use survivor_core::constants::KNOCKBACK_DAMPING;
use survivor_core::types::{Position, Velocity};

/// Turn the latest move input into the player's ground velocity.
pub fn steer_player(world: &mut World, player: Entity, input: DVec3, speed: f64) {
    if let Ok(mut vel) = world.get::<&mut Velocity>(player) {
        let ground = DVec3::new(input.x, 0.0, input.z).clamp_length_max(1.0);
        vel.0 = ground * speed;
    }
}

/// Run kinematic integration for all entities with Position + Velocity,
/// then apply and damp knockback.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.0 += vel.0 * dt;
    }

    let damping = (1.0 - KNOCKBACK_DAMPING * dt).max(0.0);
    for (_entity, (pos, body)) in world.query_mut::<(&mut Position, &mut KnockbackBody)>() {
        pos.0 += body.velocity.0 * dt;
        body.velocity.0 *= damping;
    }
}
