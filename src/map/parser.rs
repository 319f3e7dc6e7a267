//! Map parsing functionality for converting raw board layouts into structured data.

use glam::{IVec2, UVec2};
use smallvec::SmallVec;

use crate::constants::MapTile;
use crate::error::ParseError;

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone)]
pub struct ParsedMap {
    /// The parsed tile layout, indexed as `tiles[x][y]`.
    pub tiles: Vec<Vec<MapTile>>,
    /// Width and height of the board, in cells.
    pub dimensions: UVec2,
    /// The positions of the house door tiles, left to right.
    pub house_door: [IVec2; 2],
    /// The positions of the tunnel end tiles (either none or exactly two).
    pub tunnel_ends: SmallVec<[IVec2; 2]>,
    /// Pac-Man's starting position.
    pub pacman_start: Option<IVec2>,
    /// Home cell of each ghost, indexed by the digit used in the layout.
    pub ghost_homes: [Option<IVec2>; 4],
}

impl ParsedMap {
    /// Returns the tile at `cell`, treating anything outside the board as a wall.
    pub fn tile(&self, cell: IVec2) -> MapTile {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.dimensions.x as i32 || cell.y >= self.dimensions.y as i32 {
            return MapTile::Wall;
        }
        self.tiles[cell.x as usize][cell.y as usize]
    }
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Wall),
            '.' => Ok(MapTile::Dot),
            'o' => Ok(MapTile::PowerPill),
            ' ' => Ok(MapTile::Empty),
            'T' => Ok(MapTile::Tunnel),
            'X' => Ok(MapTile::Empty), // Pac-Man's starting position, treated as empty
            '=' => Ok(MapTile::HouseDoor),
            'H' => Ok(MapTile::HouseFloor),
            '0'..='3' => Ok(MapTile::GhostHome(c as u8 - b'0')),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or ragged, contains unknown characters,
    /// has a tunnel count other than zero or two, repeats a ghost home digit, or if
    /// the house door is not defined by exactly two '=' characters.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let height = raw_board.len();
        let width = raw_board.first().map(|row| row.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ParseError::ParseFailed("board is empty".to_string()));
        }

        let mut tiles = vec![vec![MapTile::Empty; height]; width];
        let mut house_door: SmallVec<[IVec2; 2]> = SmallVec::new();
        let mut tunnel_ends: SmallVec<[IVec2; 2]> = SmallVec::new();
        let mut pacman_start: Option<IVec2> = None;
        let mut ghost_homes = [None; 4];

        for (y, line) in raw_board.iter().enumerate() {
            let row_width = line.chars().count();
            if row_width != width {
                return Err(ParseError::ParseFailed(format!(
                    "row {y} has {row_width} cells, expected {width}"
                )));
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let cell = IVec2::new(x as i32, y as i32);

                // Track special positions
                match tile {
                    MapTile::Tunnel => tunnel_ends.push(cell),
                    MapTile::HouseDoor => house_door.push(cell),
                    MapTile::GhostHome(index) => {
                        let slot = &mut ghost_homes[index as usize];
                        if slot.is_some() {
                            return Err(ParseError::ParseFailed(format!("ghost home {index} appears twice")));
                        }
                        *slot = Some(cell);
                    }
                    _ => {}
                }

                if character == 'X' {
                    if pacman_start.is_some() {
                        return Err(ParseError::ParseFailed("multiple Pac-Man start positions".to_string()));
                    }
                    pacman_start = Some(cell);
                }

                tiles[x][y] = tile;
            }
        }

        if house_door.len() != 2 {
            return Err(ParseError::InvalidHouseDoorCount(house_door.len()));
        }

        if !tunnel_ends.is_empty() && tunnel_ends.len() != 2 {
            return Err(ParseError::ParseFailed(format!(
                "tunnels must come in pairs, found {} ends",
                tunnel_ends.len()
            )));
        }

        Ok(ParsedMap {
            tiles,
            dimensions: UVec2::new(width as u32, height as u32),
            house_door: [house_door[0], house_door[1]],
            tunnel_ends,
            pacman_start,
            ghost_homes,
        })
    }
}
