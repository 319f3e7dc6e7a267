//! Pixel-space coordinates.
//!
//! Positions are plain values: moving an entity produces a new `Position`,
//! nothing ever mutates one in place.

use std::fmt;

use glam::{IVec2, Vec2};

use crate::constants::CELL_SIZE;
use crate::map::direction::Direction;

/// A point on the board, in pixels. Cell `(x, y)` maps to `(x * CELL_SIZE, y * CELL_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The pixel position of a board cell.
    pub fn from_cell(cell: IVec2) -> Self {
        Self::new((cell.x * CELL_SIZE as i32) as f32, (cell.y * CELL_SIZE as i32) as f32)
    }

    /// The board cell containing this position.
    pub fn to_cell(self) -> IVec2 {
        let size = CELL_SIZE as f32;
        IVec2::new((self.x / size).floor() as i32, (self.y / size).floor() as i32)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another position.
    pub fn distance(self, other: Position) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    /// Manhattan (taxicab) distance to another position.
    pub fn manhattan(self, other: Position) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns a new position shifted by `(dx, dy)` pixels.
    pub fn offset(self, dx: f32, dy: f32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// Returns a new position `cells` board cells away in `direction`.
    pub fn ahead(self, direction: Direction, cells: i32) -> Position {
        let delta = direction.as_vec2() * (cells * CELL_SIZE as i32) as f32;
        self.offset(delta.x, delta.y)
    }

    /// Axis-independent box test: both `|dx|` and `|dy|` are strictly below `threshold`.
    pub fn within_box(self, other: Position, threshold: f32) -> bool {
        (self.x - other.x).abs() < threshold && (self.y - other.y).abs() < threshold
    }
}

impl From<Vec2> for Position {
    fn from(value: Vec2) -> Self {
        Position::new(value.x, value.y)
    }
}

impl From<Position> for Vec2 {
    fn from(value: Position) -> Self {
        value.as_vec2()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
