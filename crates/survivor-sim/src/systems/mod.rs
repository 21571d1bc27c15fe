//! ECS systems that operate on the simulation world each step.
//!
//! Systems are free functions that take `&mut World` (or `&World` for read-only).
//! Per-run state they need (arsenal, aura, director) is passed in by the engine.

pub mod aura;
pub mod cleanup;
pub mod combat;
pub mod contact;
pub mod enemy_ai;
pub mod movement;
pub mod pickup;
pub mod projectiles;
pub mod snapshot;
pub mod spawn_director;
pub mod weapons;
