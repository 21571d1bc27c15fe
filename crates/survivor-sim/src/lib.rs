//! Simulation engine for a survival-action run.
//!
//! Owns the hecs ECS world, steps the weapon, progression, and spawn
//! processes on a virtual clock, and produces RunSnapshots for the frontend.

pub mod arsenal;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod persistence;
pub mod progression;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::Simulation;
pub use survivor_core as core;

#[cfg(test)]
mod tests;
