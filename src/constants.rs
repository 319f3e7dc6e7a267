//! This module contains all the constants used by the engine.

use std::time::Duration;

use glam::UVec2;

/// The default length of a single gameplay tick.
pub const TICK_TIME: Duration = Duration::from_millis(16);

/// The size of each cell, in pixels.
pub const CELL_SIZE: u32 = 16;
/// The size of the game board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);
/// The size of the game board, in pixels.
pub const BOARD_PIXEL_SIZE: UVec2 = UVec2::new(BOARD_CELL_SIZE.x * CELL_SIZE, BOARD_CELL_SIZE.y * CELL_SIZE);

/// Side length of the axis-aligned box used for every pickup and contact test, in pixels.
pub const COLLISION_THRESHOLD: f32 = CELL_SIZE as f32;

/// Lives at the start of a game.
pub const STARTING_LIVES: u8 = 3;
/// Number of levels before the game is completed.
pub const MAX_LEVELS: u8 = 5;

/// Pac-Man's movement speed, in pixels per second.
pub const PACMAN_SPEED: f32 = 170.0;

/// Ghosts heading home after being consumed move this many times faster than their mode speed.
pub const CONSUMED_SPEED_FACTOR: f32 = 2.0;

/// Scoring table.
pub mod points {
    pub const DOT: u32 = 10;
    pub const POWER_PILL: u32 = 50;
    pub const GHOST: u32 = 200;
}

/// Ghost behavior mode timings and speeds.
pub mod modes {
    /// Length of a scatter phase, in milliseconds.
    pub const SCATTER_MS: u64 = 7000;
    /// Length of a chase phase, in milliseconds.
    pub const CHASE_MS: u64 = 20000;
    /// Length of a scared phase, in milliseconds.
    pub const SCARED_MS: u64 = 9000;
    /// Ghost speed relative to Pac-Man while scattering or chasing.
    pub const NORMAL_SPEED_MULTIPLIER: f32 = 0.7;
    /// Ghost speed relative to Pac-Man while scared.
    pub const SCARED_SPEED_MULTIPLIER: f32 = 0.5;
}

/// Scheduling delays, in milliseconds of virtual time.
pub mod delays {
    /// Delay between Pac-Man's death and his respawn.
    pub const RESPAWN_MS: u64 = 2000;
    /// Spacing between consecutive ghost releases from the house.
    pub const RELEASE_INTERVAL_MS: u64 = 7000;
    /// Time a consumed ghost spends in the house before it is released again.
    pub const CONSUMED_RESPAWN_MS: u64 = 3000;
    /// Time allowed for an external score submission before it is reported as failed.
    pub const SCORE_SUBMIT_TIMEOUT_MS: u64 = 10_000;
}

/// Number of consecutive ticks a ghost may fail to move before it is reported as stuck.
pub const STUCK_TICK_LIMIT: u32 = 60;

/// Distance ahead of Pac-Man targeted by the ambusher, in cells.
pub const AMBUSH_LOOKAHEAD_CELLS: i32 = 4;
/// Distance ahead of Pac-Man targeted by the flanker, in cells.
pub const FLANK_LOOKAHEAD_CELLS: i32 = 2;
/// Beyond this distance (in cells) the opportunist chases; within it, it retreats.
pub const OPPORTUNIST_RETREAT_CELLS: f32 = 8.0;

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// An empty, walkable tile.
    Empty,
    /// A wall tile.
    Wall,
    /// A walkable tile holding a dot.
    Dot,
    /// A walkable tile holding a power pill.
    PowerPill,
    /// A walkable tile on a wrap-around tunnel end.
    Tunnel,
    /// One of the two door tiles of the ghost house.
    HouseDoor,
    /// Floor of the ghost house.
    HouseFloor,
    /// The home tile of a ghost, inside the house.
    GhostHome(u8),
}

/// The raw layout of the game board, as a 2D array of characters.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #HHHHHH# ##.######",
    "T     .   #H0123H#   .     T",
    "######.## #HHHHHH# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......X .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Level two: the top corridor runs unbroken and the bottom corners gain a shortcut each.
pub const LEVEL_TWO_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#..........................#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #HHHHHH# ##.######",
    "T     .   #H0123H#   .     T",
    "######.## #HHHHHH# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......X .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "############################",
];

/// Level three: the tunnel is walled off and the upper power pills move down two rows.
pub const LEVEL_THREE_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o........................o#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #HHHHHH# ##.######",
    "######.   #H0123H#   .######",
    "######.## #HHHHHH# ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......X .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Layouts by level. Levels past the end keep using the last one.
pub const LEVEL_BOARDS: [&[&str]; 3] = [&RAW_BOARD, &LEVEL_TWO_BOARD, &LEVEL_THREE_BOARD];
