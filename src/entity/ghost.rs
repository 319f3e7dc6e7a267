//! Ghost entity state.
//!
//! Ghost decision making lives in [`crate::systems::targeting`]; this module only
//! holds the per-ghost data and the small state changes that keep it consistent.

use std::collections::VecDeque;

use glam::{IVec2, UVec2};
use strum::EnumCount as _;
use strum_macros::{AsRefStr, EnumCount};

use crate::entity::mode::{Mode, Vulnerability};
use crate::entity::position::Position;
use crate::entity::traversal::Traversal;
use crate::map::direction::Direction;
use crate::map::graph::NodeId;

/// The four classic ghosts, each with a fixed corner and chase rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum GhostPersonality {
    /// Direct pursuer: chases Pac-Man's current position. Top-right corner.
    Blinky,
    /// Ambusher: aims four cells ahead of Pac-Man. Top-left corner.
    Pinky,
    /// Flanker: aims two cells ahead of Pac-Man. Bottom-right corner.
    Inky,
    /// Opportunist: chases from afar, retreats to its corner when close. Bottom-left corner.
    Clyde,
}

impl GhostPersonality {
    /// All personalities, in ghost list and release order.
    pub const ALL: [GhostPersonality; GhostPersonality::COUNT] = [
        GhostPersonality::Blinky,
        GhostPersonality::Pinky,
        GhostPersonality::Inky,
        GhostPersonality::Clyde,
    ];

    /// Position of this ghost in the ghost list.
    pub const fn index(self) -> usize {
        match self {
            GhostPersonality::Blinky => 0,
            GhostPersonality::Pinky => 1,
            GhostPersonality::Inky => 2,
            GhostPersonality::Clyde => 3,
        }
    }

    /// This ghost's scatter corner on a board of `dimensions` cells.
    pub fn scatter_corner(self, dimensions: UVec2) -> Position {
        let max = dimensions.as_ivec2() - IVec2::ONE;
        let cell = match self {
            GhostPersonality::Blinky => IVec2::new(max.x, 0),
            GhostPersonality::Pinky => IVec2::new(0, 0),
            GhostPersonality::Inky => IVec2::new(max.x, max.y),
            GhostPersonality::Clyde => IVec2::new(0, max.y),
        };
        Position::from_cell(cell)
    }
}

#[derive(Debug, Clone)]
pub struct GhostEntity {
    pub personality: GhostPersonality,
    pub position: Position,
    pub direction: Direction,
    pub previous_direction: Direction,
    pub mode: Mode,
    pub vulnerability: Vulnerability,
    /// False while the ghost waits inside the house.
    pub entered_maze: bool,
    /// Remaining waypoints of the current plan, next intersection first.
    pub path: VecDeque<NodeId>,
    pub next_intersection: Option<NodeId>,
    /// The position the current plan is aiming for.
    pub target: Option<Position>,
    /// Consecutive ticks without progress.
    pub stuck_ticks: u32,
    /// Movement speed, in pixels per second.
    pub speed: f32,
    /// Location on the graph; `None` while inside the house.
    pub traversal: Option<Traversal>,
    /// Resting cell inside the house.
    pub home: Position,
}

impl GhostEntity {
    /// Creates a ghost waiting at its home cell.
    pub fn new(personality: GhostPersonality, home: Position, mode: Mode, speed: f32) -> Self {
        Self {
            personality,
            position: home,
            direction: Direction::Up,
            previous_direction: Direction::Up,
            mode,
            vulnerability: Vulnerability::Normal,
            entered_maze: false,
            path: VecDeque::new(),
            next_intersection: None,
            target: None,
            stuck_ticks: 0,
            speed,
            traversal: None,
            home,
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.previous_direction = self.direction;
            self.direction = direction;
        }
    }

    /// Drops the current plan so the next intersection triggers a fresh one.
    pub fn clear_plan(&mut self) {
        self.path.clear();
        self.next_intersection = None;
        self.target = None;
    }

    /// Puts the ghost back on its home cell, lethal and waiting for release.
    pub fn send_home(&mut self) {
        self.position = self.home;
        self.traversal = None;
        self.entered_maze = false;
        self.vulnerability = Vulnerability::Normal;
        self.stuck_ticks = 0;
        self.set_direction(Direction::Up);
        self.clear_plan();
    }

    /// Places the ghost on the house exit node and lets it roam.
    pub fn enter_maze(&mut self, exit: NodeId, exit_position: Position) {
        self.traversal = Some(Traversal::AtNode(exit));
        self.position = exit_position;
        self.entered_maze = true;
        self.stuck_ticks = 0;
        self.clear_plan();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BOARD_CELL_SIZE;

    #[test]
    fn test_personality_indices_match_order() {
        for (i, personality) in GhostPersonality::ALL.iter().enumerate() {
            assert_eq!(personality.index(), i);
        }
    }

    #[test]
    fn test_scatter_corners_are_unique() {
        let corners: Vec<Position> = GhostPersonality::ALL
            .iter()
            .map(|p| p.scatter_corner(BOARD_CELL_SIZE))
            .collect();
        assert_eq!(corners[0], Position::new(432.0, 0.0));
        assert_eq!(corners[1], Position::new(0.0, 0.0));
        assert_eq!(corners[2], Position::new(432.0, 480.0));
        assert_eq!(corners[3], Position::new(0.0, 480.0));
    }

    #[test]
    fn test_send_home_resets_lifecycle() {
        let home = Position::new(192.0, 224.0);
        let mut ghost = GhostEntity::new(GhostPersonality::Inky, home, Mode::Chase, 100.0);
        ghost.enter_maze(4, Position::new(208.0, 176.0));
        ghost.set_direction(Direction::Left);
        ghost.vulnerability = Vulnerability::Consumed;
        ghost.path.push_back(7);

        ghost.send_home();

        assert_eq!(ghost.position, home);
        assert_eq!(ghost.direction, Direction::Up);
        assert_eq!(ghost.previous_direction, Direction::Left);
        assert_eq!(ghost.vulnerability, Vulnerability::Normal);
        assert!(!ghost.entered_maze);
        assert!(ghost.traversal.is_none());
        assert!(ghost.path.is_empty());
    }
}
