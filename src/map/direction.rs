use glam::{IVec2, Vec2};
use strum_macros::AsRefStr;

/// The four cardinal directions plus `None`, used by entities that are not moving.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// The four cardinal directions, in the order edges are explored.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. `None` is its own opposite.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Returns the unit grid vector for this direction (`ZERO` for `None`).
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Returns the direction as a `usize` (0-3), or `None` for [`Direction::None`].
    pub const fn as_usize(self) -> Option<usize> {
        match self {
            Direction::Up => Some(0),
            Direction::Down => Some(1),
            Direction::Left => Some(2),
            Direction::Right => Some(3),
            Direction::None => None,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Two directions are perpendicular when one is horizontal and the other vertical.
    ///
    /// `None` is perpendicular to nothing.
    pub const fn is_perpendicular(self, other: Direction) -> bool {
        (self.is_horizontal() && other.is_vertical()) || (self.is_vertical() && other.is_horizontal())
    }

    /// Returns the cardinal direction matching a unit grid vector, if any.
    pub fn from_ivec2(vector: IVec2) -> Option<Direction> {
        Direction::DIRECTIONS.into_iter().find(|d| d.as_ivec2() == vector)
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
            Direction::None => IVec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_direction_as_ivec2() {
        assert_eq!(Direction::Up.as_ivec2(), -IVec2::Y);
        assert_eq!(Direction::Down.as_ivec2(), IVec2::Y);
        assert_eq!(Direction::Left.as_ivec2(), -IVec2::X);
        assert_eq!(Direction::Right.as_ivec2(), IVec2::X);
        assert_eq!(Direction::None.as_ivec2(), IVec2::ZERO);
    }

    #[test]
    fn test_direction_perpendicular() {
        assert!(Direction::Up.is_perpendicular(Direction::Left));
        assert!(Direction::Right.is_perpendicular(Direction::Down));
        assert!(!Direction::Up.is_perpendicular(Direction::Down));
        assert!(!Direction::Left.is_perpendicular(Direction::Left));
        assert!(!Direction::None.is_perpendicular(Direction::Up));
        assert!(!Direction::Left.is_perpendicular(Direction::None));
    }

    #[test]
    fn test_direction_from_ivec2() {
        for direction in Direction::DIRECTIONS {
            assert_eq!(Direction::from_ivec2(direction.as_ivec2()), Some(direction));
        }
        assert_eq!(Direction::from_ivec2(IVec2::new(1, 1)), None);
    }

    #[test]
    fn test_direction_as_ref() {
        assert_eq!(Direction::Up.as_ref(), "up");
        assert_eq!(Direction::None.as_ref(), "none");
    }
}
