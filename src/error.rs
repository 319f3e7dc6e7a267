//! Centralized error types for the engine.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use crate::entity::ghost::GhostPersonality;

/// Main error type for the engine.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while loading or running a game.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),
    #[error("House door must have exactly 2 positions, found {0}")]
    InvalidHouseDoorCount(usize),
    #[error("Map parsing failed: {0}")]
    ParseFailed(String),
}

/// Errors related to map and graph construction.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    #[error("Pac-Man's spawn point is missing")]
    MissingSpawn,

    #[error("Home position for {0:?} is missing")]
    MissingGhostHome(GhostPersonality),

    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to entity behavior during a tick.
///
/// None of these are fatal: the tick loop logs them and the affected entity
/// falls back to its previous course.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EntityError {
    #[error("Node not found in graph: {0}")]
    NodeNotFound(usize),

    #[error("No path found from node {from} to node {to}")]
    PathNotFound { from: usize, to: usize },

    #[error("Target is unreachable from node {0}")]
    UnreachableTarget(usize),

    #[error("Entity is not attached to the graph")]
    Detached,
}

/// Errors reported by the external score persistence collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Score submission rejected: {0}")]
    Rejected(String),

    #[error("Score service unavailable: {0}")]
    Unavailable(String),

    #[error("Score submission timed out after {0}ms")]
    TimedOut(u64),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
