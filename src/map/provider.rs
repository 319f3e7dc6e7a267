//! The maze provider boundary: everything the engine reads from a level layout.
//!
//! A provider is consulted once per level load. The clearance predicates are only
//! used while the intersection graph is built, never during live ticks.

use glam::{IVec2, UVec2};
use smallvec::SmallVec;
use strum::EnumCount;
use tracing::debug;

use crate::constants::{MapTile, LEVEL_BOARDS, RAW_BOARD};
use crate::entity::ghost::GhostPersonality;
use crate::entity::position::Position;
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::{MapTileParser, ParsedMap};

/// Read-only view of a maze layout.
pub trait MazeProvider: Send + Sync {
    /// Board size in cells.
    fn dimensions(&self) -> UVec2;
    /// Cells with more than two open neighbors, or exactly two that are not colinear.
    fn intersections(&self) -> Vec<Position>;
    /// Dot positions, in row-major order.
    fn dots(&self) -> Vec<Position>;
    /// Power pill positions, in row-major order.
    fn power_pills(&self) -> Vec<Position>;
    /// The corridor cell directly outside the ghost house door.
    fn house_exit(&self) -> Position;
    /// The wrap-around tunnel ends, if the layout has a tunnel.
    fn tunnel_ends(&self) -> SmallVec<[Position; 2]>;
    /// Pac-Man's spawn point.
    fn pacman_spawn(&self) -> Position;
    /// A ghost's resting cell inside the house.
    fn ghost_home(&self, ghost: GhostPersonality) -> Position;
    /// Whether an entity may stand on the cell containing `position`.
    fn is_point_clear(&self, position: Position) -> bool;
    /// Whether `position` lies inside the ghost house (door included).
    fn is_in_ghost_house(&self, position: Position) -> bool;
}

/// A maze parsed from an ASCII layout.
#[derive(Debug, Clone)]
pub struct Maze {
    parsed: ParsedMap,
    pacman_spawn: IVec2,
    ghost_homes: [IVec2; GhostPersonality::COUNT],
    house_exit: IVec2,
}

impl Maze {
    /// Parses and validates an ASCII layout.
    ///
    /// # Errors
    ///
    /// Fails if the layout does not parse, lacks a Pac-Man spawn or any ghost home,
    /// or if the cell above the house door is not walkable.
    pub fn new(raw_board: &[&str]) -> GameResult<Maze> {
        let parsed = MapTileParser::parse_board(raw_board)?;

        let pacman_spawn = parsed.pacman_start.ok_or(MapError::MissingSpawn)?;

        let mut ghost_homes = [IVec2::ZERO; GhostPersonality::COUNT];
        for personality in GhostPersonality::ALL {
            ghost_homes[personality.index()] =
                parsed.ghost_homes[personality.index()].ok_or(MapError::MissingGhostHome(personality))?;
        }

        let house_exit = parsed.house_door[0] + Direction::Up.as_ivec2();
        if !is_walkable(parsed.tile(house_exit)) {
            return Err(MapError::InvalidConfig(format!("house exit {house_exit} is not walkable")).into());
        }

        debug!(
            width = parsed.dimensions.x,
            height = parsed.dimensions.y,
            %house_exit,
            %pacman_spawn,
            "Maze parsed"
        );

        Ok(Maze {
            parsed,
            pacman_spawn,
            ghost_homes,
            house_exit,
        })
    }

    /// The built-in classic layout.
    pub fn classic() -> GameResult<Maze> {
        Maze::new(&RAW_BOARD)
    }

    /// The built-in layouts, one per level.
    pub fn level_set() -> GameResult<Vec<Maze>> {
        LEVEL_BOARDS.iter().map(|board| Maze::new(board)).collect()
    }

    /// Returns the tile at a cell, walls outside the board.
    pub fn tile(&self, cell: IVec2) -> MapTile {
        self.parsed.tile(cell)
    }

    fn is_open(&self, cell: IVec2) -> bool {
        is_walkable(self.tile(cell))
    }

    fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let size = self.parsed.dimensions.as_ivec2();
        (0..size.y).flat_map(move |y| (0..size.x).map(move |x| IVec2::new(x, y)))
    }

    fn positions_of(&self, wanted: MapTile) -> Vec<Position> {
        self.cells()
            .filter(|cell| self.tile(*cell) == wanted)
            .map(Position::from_cell)
            .collect()
    }

    fn is_intersection(&self, cell: IVec2) -> bool {
        if !self.is_open(cell) {
            return false;
        }

        let open: SmallVec<[Direction; 4]> = Direction::DIRECTIONS
            .into_iter()
            .filter(|d| self.is_open(cell + d.as_ivec2()))
            .collect();

        match open.len() {
            3 | 4 => true,
            2 => open[0].is_perpendicular(open[1]),
            _ => false,
        }
    }
}

fn is_walkable(tile: MapTile) -> bool {
    matches!(tile, MapTile::Empty | MapTile::Dot | MapTile::PowerPill | MapTile::Tunnel)
}

impl MazeProvider for Maze {
    fn dimensions(&self) -> UVec2 {
        self.parsed.dimensions
    }

    fn intersections(&self) -> Vec<Position> {
        self.cells()
            .filter(|cell| self.is_intersection(*cell))
            .map(Position::from_cell)
            .collect()
    }

    fn dots(&self) -> Vec<Position> {
        self.positions_of(MapTile::Dot)
    }

    fn power_pills(&self) -> Vec<Position> {
        self.positions_of(MapTile::PowerPill)
    }

    fn house_exit(&self) -> Position {
        Position::from_cell(self.house_exit)
    }

    fn tunnel_ends(&self) -> SmallVec<[Position; 2]> {
        self.parsed.tunnel_ends.iter().copied().map(Position::from_cell).collect()
    }

    fn pacman_spawn(&self) -> Position {
        Position::from_cell(self.pacman_spawn)
    }

    fn ghost_home(&self, ghost: GhostPersonality) -> Position {
        Position::from_cell(self.ghost_homes[ghost.index()])
    }

    fn is_point_clear(&self, position: Position) -> bool {
        self.is_open(position.to_cell())
    }

    fn is_in_ghost_house(&self, position: Position) -> bool {
        matches!(
            self.tile(position.to_cell()),
            MapTile::HouseDoor | MapTile::HouseFloor | MapTile::GhostHome(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32) -> Position {
        Position::from_cell(IVec2::new(x, y))
    }

    #[test]
    fn test_classic_collectibles() {
        let maze = Maze::classic().unwrap();
        assert_eq!(maze.dots().len(), 240);
        assert_eq!(maze.power_pills().len(), 4);
        assert_eq!(maze.power_pills()[0], cell(1, 3));
    }

    #[test]
    fn test_classic_intersections() {
        let maze = Maze::classic().unwrap();
        let intersections = maze.intersections();
        assert_eq!(intersections.len(), 64);

        // Top-left corner: right and down are open
        assert!(intersections.contains(&cell(1, 1)));
        // Straight corridor cell is not an intersection
        assert!(!intersections.contains(&cell(3, 1)));
        // Nothing inside the house
        assert!(intersections.iter().all(|p| !maze.is_in_ghost_house(*p)));
    }

    #[test]
    fn test_classic_markers() {
        let maze = Maze::classic().unwrap();
        assert_eq!(maze.house_exit(), cell(13, 11));
        assert_eq!(maze.pacman_spawn(), cell(13, 23));
        assert_eq!(maze.ghost_home(GhostPersonality::Blinky), cell(12, 14));
        assert_eq!(maze.ghost_home(GhostPersonality::Clyde), cell(15, 14));
        assert_eq!(maze.tunnel_ends().as_slice(), &[cell(0, 14), cell(27, 14)]);
    }

    #[test]
    fn test_clearance() {
        let maze = Maze::classic().unwrap();
        assert!(maze.is_point_clear(cell(1, 1)));
        assert!(!maze.is_point_clear(cell(0, 0)));
        assert!(!maze.is_point_clear(cell(13, 12)));
        assert!(maze.is_in_ghost_house(cell(13, 12)));
        assert!(maze.is_in_ghost_house(cell(14, 14)));
        assert!(!maze.is_in_ghost_house(cell(13, 11)));
    }

    #[test]
    fn test_missing_spawn() {
        let board = ["######", "#.  .#", "#=0=.#", "#H123#", "######"];
        let err = Maze::new(&board).unwrap_err();
        assert!(matches!(err, crate::error::GameError::Map(MapError::MissingSpawn)));
    }
}
