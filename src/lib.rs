//! Escape-room puzzle game.
//!
//! Rooms hold puzzles solved by typed answers or by applying inventory items.
//! Clearing a room opens the next one; clearing the last room wins, running
//! out of time loses. All state changes go through [`game::reduce`].

pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod puzzle;

pub use error::{GameError, Result};
