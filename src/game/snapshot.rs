//! Read-only views of a game for presentation layers.

use strum::EnumCount;

use crate::entity::ghost::{GhostEntity, GhostPersonality};
use crate::entity::mode::{Mode, Vulnerability};
use crate::entity::position::Position;
use crate::game::state::{GameEntity, GameStatus};
use crate::map::direction::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct PacmanSnapshot {
    pub position: Position,
    pub direction: Direction,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GhostSnapshot {
    pub personality: GhostPersonality,
    pub position: Position,
    pub direction: Direction,
    pub vulnerability: Vulnerability,
    pub entered_maze: bool,
    /// Where the ghost's current plan is heading.
    pub target: Option<Position>,
}

impl From<&GhostEntity> for GhostSnapshot {
    fn from(ghost: &GhostEntity) -> Self {
        Self {
            personality: ghost.personality,
            position: ghost.position,
            direction: ghost.direction,
            vulnerability: ghost.vulnerability,
            entered_maze: ghost.entered_maze,
            target: ghost.target,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub tick: u64,
    pub time_ms: u64,
    pub score: u32,
    pub lives: u8,
    pub level: u8,
    pub mode: Mode,
    pub pacman: PacmanSnapshot,
    pub ghosts: [GhostSnapshot; GhostPersonality::COUNT],
    pub dots_remaining: usize,
    pub power_pills_remaining: usize,
    pub paused: bool,
    pub game_over: bool,
    pub victory: bool,
}

impl GameSnapshot {
    pub fn capture(state: &GameEntity, paused: bool) -> Self {
        let victory = matches!(state.status, GameStatus::GameOver { victory: true });
        Self {
            tick: state.tick_count,
            time_ms: state.now_ms,
            score: state.score(),
            lives: state.lives,
            level: state.level,
            mode: state.mode,
            pacman: PacmanSnapshot {
                position: state.pacman.position,
                direction: state.pacman.direction,
                alive: state.pacman.alive,
            },
            ghosts: state.ghosts.each_ref().map(GhostSnapshot::from),
            dots_remaining: state.dots.len(),
            power_pills_remaining: state.power_pills.len(),
            paused,
            game_over: state.is_game_over(),
            victory,
        }
    }

    pub fn ghost(&self, personality: GhostPersonality) -> &GhostSnapshot {
        &self.ghosts[personality.index()]
    }
}

