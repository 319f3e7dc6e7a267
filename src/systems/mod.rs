//! Gameplay rules that act on the game state each tick.

pub mod collision;
pub mod lifecycle;
pub mod movement;
pub mod pathfinder;
pub mod targeting;
