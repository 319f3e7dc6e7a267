//! Entity value types and per-entity state.

pub mod ghost;
pub mod mode;
pub mod pacman;
pub mod position;
pub mod traversal;
