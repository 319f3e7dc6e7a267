#![allow(dead_code)]

use pacman_core::config::GameConfig;
use pacman_core::constants::COLLISION_THRESHOLD;
use pacman_core::entity::ghost::GhostPersonality;
use pacman_core::entity::mode::Vulnerability;
use pacman_core::entity::position::Position;
use pacman_core::game::Game;
use pacman_core::map::builder::Map;
use pacman_core::map::provider::Maze;

/// A spot in the top-left corridor block, clear of the ghost house and the spawn point.
pub const SPOT: Position = Position::new(100.0, 100.0);

pub fn classic_map() -> Map {
    let maze = Maze::classic().unwrap();
    Map::new(&maze).unwrap()
}

pub fn new_game() -> Game {
    Game::new(GameConfig::default()).unwrap()
}

pub fn game_with(config: GameConfig) -> Game {
    Game::new(config).unwrap()
}

/// Lifts Pac-Man off the graph onto `at` and clears every collectible within reach of it.
///
/// Off the graph he stays put, which keeps collision scenarios exact.
pub fn isolate_pacman(game: &mut Game, at: Position) {
    let state = game.state_mut();
    state.pacman.traversal = None;
    state.pacman.position = at;
    state.dots.retain(|dot| !dot.within_box(at, COLLISION_THRESHOLD));
    state.power_pills.retain(|pill| !pill.within_box(at, COLLISION_THRESHOLD));
}

/// Puts a ghost that has not been released yet right on top of `at`.
///
/// Unreleased ghosts never move, so it is still there when collisions run.
pub fn park_ghost(game: &mut Game, personality: GhostPersonality, at: Position, vulnerability: Vulnerability) {
    let ghost = game.state_mut().ghost_mut(personality);
    assert!(!ghost.entered_maze, "only unreleased ghosts stay put");
    ghost.position = at;
    ghost.vulnerability = vulnerability;
}

pub fn run_ticks(game: &mut Game, ticks: usize) {
    for _ in 0..ticks {
        game.tick();
    }
}

/// Advances the clock in tick-sized steps, ticking after each one.
pub fn run_for(game: &mut Game, ms: u64) {
    let step = game.config().tick_ms;
    let mut elapsed = 0;
    while elapsed < ms {
        let chunk = step.min(ms - elapsed);
        game.update(chunk);
        elapsed += chunk;
    }
}
