//! Headless Pac-Man simulation engine.
//!
//! Builds an intersection graph from a maze, moves Pac-Man and four ghosts along
//! it, and runs the mode timers, collisions and life cycle on a virtual clock.
//! Rendering and input devices are left to whoever drives [`game::Game`].

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod logging;
pub mod map;
pub mod persistence;
pub mod systems;
