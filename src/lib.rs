//! Reflex Drive - deterministic timing core for a reaction racing game
//!
//! An automatically-moving vehicle traverses a fixed-length track. At
//! configured distances a brake or acceleration control opens for a fixed
//! window, and the timing of the player's reaction decides the speed
//! modification applied to the vehicle. This crate is the game's state
//! core; rendering, input-device binding, and persistence live in the
//! host and consume the snapshot/summary records exposed here.

pub mod game_core;

pub use game_core::*;
