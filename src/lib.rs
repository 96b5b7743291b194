//! Pachinko: a coin-drop pin-field game.
//!
//! A ball is dropped into a randomly jittered field of pins and bounces down
//! into one of several reward buckets.  Physics is delegated to Rapier through
//! `bevy_rapier2d`; this crate owns the board layout, the round and money
//! bookkeeping, and the rules for deciding where a ball landed.
//!
//! [`simulation::PachinkoPlugin`] is the headless core.
//! [`input::KeyboardControlsPlugin`] and [`rendering::PresentationPlugin`]
//! add the interactive front end.

pub mod body;
pub mod bucket;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod input;
pub mod outcome;
pub mod rendering;
pub mod round;
pub mod session;
pub mod simulation;
pub mod world;
