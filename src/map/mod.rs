//! This module defines the maze and provides functions for interacting with it.

pub mod builder;
pub mod direction;
pub mod graph;
pub mod parser;
pub mod provider;
