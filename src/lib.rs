//! Chaser - a tiny real-time arcade game.
//!
//! The player steers a square around the board while an enemy chases it
//! and fires projectiles. Touch the enemy to win, touch a projectile to lose.
//!
//! Core modules:
//! - `geometry`: vector math, bounding boxes, intersection
//! - `entities`: pure data (board, entities, scoreboard, key state)
//! - `ai`: per-entity behaviors
//! - `compute`: the tick loop and session lifecycle
//! - `display`: render target abstraction and the terminal surface
//! - `settings`: JSON-backed configuration

pub mod ai;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod settings;

pub use compute::{Session, TickReport};
pub use error::GameError;
pub use settings::Settings;
