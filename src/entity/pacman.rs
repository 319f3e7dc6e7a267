//! Pac-Man entity state.

use crate::entity::position::Position;
use crate::entity::traversal::Traversal;
use crate::map::direction::Direction;

#[derive(Debug, Clone)]
pub struct PacmanEntity {
    pub position: Position,
    pub direction: Direction,
    pub previous_direction: Direction,
    /// The direction the player asked for; applied at the next opportunity.
    pub requested_direction: Direction,
    /// Movement speed, in pixels per second.
    pub speed: f32,
    pub alive: bool,
    /// Location on the graph; `None` when placed off the corridors.
    pub traversal: Option<Traversal>,
}

impl PacmanEntity {
    /// Creates a living Pac-Man facing left.
    pub fn new(position: Position, traversal: Option<Traversal>, speed: f32) -> Self {
        Self {
            position,
            direction: Direction::Left,
            previous_direction: Direction::Left,
            requested_direction: Direction::None,
            speed,
            alive: true,
            traversal,
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.previous_direction = self.direction;
            self.direction = direction;
        }
    }

    /// Buffers a direction change. `None` clears the buffer.
    pub fn request_direction(&mut self, direction: Direction) {
        self.requested_direction = direction;
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.requested_direction = Direction::None;
    }

    /// Puts Pac-Man back on the spawn point, alive and facing left.
    pub fn respawn(&mut self, position: Position, traversal: Option<Traversal>) {
        self.position = position;
        self.traversal = traversal;
        self.requested_direction = Direction::None;
        self.set_direction(Direction::Left);
        self.alive = true;
    }
}
