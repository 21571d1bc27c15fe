//! Enemy AI for SURVIVOR.
//!
//! Implements archetype profiles and the seek/pause movement state machine.

pub mod fsm;
pub mod profiles;

pub use survivor_core as core;
