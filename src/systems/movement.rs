//! Moving entities along the intersection graph.
//!
//! Entities between two nodes always move toward the edge's `to` node. Direction
//! choices are only made on nodes, except that Pac-Man may reverse mid-corridor.

use rand::Rng;
use tracing::{trace, warn};

use crate::constants::{CONSUMED_SPEED_FACTOR, STUCK_TICK_LIMIT};
use crate::entity::ghost::GhostEntity;
use crate::entity::pacman::PacmanEntity;
use crate::entity::traversal::Traversal;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::graph::{Edge, Graph, NodeId, TraversalFlags};
use crate::systems::targeting::{GhostController, TargetContext};

/// Upper bound on nodes passed in a single step. Zero-length tunnel edges would
/// otherwise let a confused chooser spin forever.
const MAX_HOPS: usize = 8;

/// What happened to a ghost during one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostStep {
    /// Still waiting in the house.
    Idle,
    Moved,
    /// No progress for too long; its plan was dropped.
    Stuck,
    /// A consumed ghost reached the house exit.
    ReturnedHome,
}

/// Advances `traversal` by `distance` pixels.
///
/// Whenever the entity stands on a node, `choose` picks the edge to leave by;
/// returning `None` stops the entity there. Distance left over after reaching a
/// node carries onto the next edge. Returns whether the entity moved at all.
pub fn travel<F>(graph: &Graph, traversal: &mut Traversal, distance: f32, mut choose: F) -> bool
where
    F: FnMut(NodeId) -> Option<Edge>,
{
    let mut remaining = distance;
    let mut moved = false;

    for _ in 0..MAX_HOPS {
        match *traversal {
            Traversal::AtNode(node) => {
                if remaining <= 0.0 {
                    break;
                }
                let Some(edge) = choose(node) else {
                    break;
                };
                moved = true;
                if edge.distance <= 0.0 {
                    trace!(from = node, to = edge.target, "Tunnel traversed");
                    *traversal = Traversal::AtNode(edge.target);
                    continue;
                }
                *traversal = Traversal::BetweenNodes {
                    from: node,
                    to: edge.target,
                    traversed: 0.0,
                };
            }
            Traversal::BetweenNodes { from, to, traversed } => {
                let Some(edge) = graph.find_edge(from, to) else {
                    warn!(from, to, "Entity on a missing edge, snapping back");
                    *traversal = Traversal::AtNode(from);
                    break;
                };
                if remaining <= 0.0 {
                    break;
                }
                moved = true;
                let progressed = traversed + remaining;
                if progressed < edge.distance {
                    *traversal = Traversal::BetweenNodes {
                        from,
                        to,
                        traversed: progressed,
                    };
                    break;
                }
                remaining = progressed - edge.distance;
                *traversal = Traversal::AtNode(to);
            }
        }
    }

    moved
}

/// Moves Pac-Man for `dt` seconds.
///
/// A buffered request is taken at the first node that has an edge that way,
/// otherwise Pac-Man keeps going straight and stops against walls. Asking for
/// the opposite direction turns around immediately, even mid-corridor.
pub fn move_pacman(graph: &Graph, pacman: &mut PacmanEntity, dt: f32) -> bool {
    if !pacman.alive {
        return false;
    }
    let Some(mut traversal) = pacman.traversal else {
        return false;
    };

    let mut heading = pacman.direction;
    let mut requested = pacman.requested_direction;

    if let Traversal::BetweenNodes { from, to, traversed } = traversal {
        if let Some(edge) = graph.find_edge(from, to) {
            let reverse = edge.direction.opposite();
            let turn_around = requested == reverse || (heading == reverse && requested != edge.direction);
            heading = if turn_around { reverse } else { edge.direction };
            if turn_around {
                traversal = Traversal::BetweenNodes {
                    from: to,
                    to: from,
                    traversed: (edge.distance - traversed).max(0.0),
                };
            }
            if requested == heading {
                requested = Direction::None;
            }
        }
    }

    let usable = |edge: &Edge| edge.allows(TraversalFlags::PACMAN);
    let moved = travel(graph, &mut traversal, pacman.speed * dt, |node| {
        if requested != Direction::None {
            if let Some(edge) = graph.find_edge_in_direction(node, requested).filter(usable) {
                heading = requested;
                requested = Direction::None;
                return Some(edge);
            }
        }
        graph.find_edge_in_direction(node, heading).filter(usable)
    });

    pacman.traversal = Some(traversal);
    pacman.requested_direction = requested;
    pacman.set_direction(heading);
    if let Some(position) = traversal.pixel_position(graph) {
        pacman.position = position;
    }
    moved
}

/// Moves one ghost for `dt` seconds, replanning at every node it reaches.
pub fn move_ghost<R: Rng + ?Sized>(
    map: &Map,
    controller: &GhostController<'_>,
    ghost: &mut GhostEntity,
    context: &TargetContext,
    dt: f32,
    rng: &mut R,
) -> GhostStep {
    if !ghost.entered_maze {
        ghost.set_direction(Direction::Up);
        return GhostStep::Idle;
    }
    let Some(mut traversal) = ghost.traversal else {
        return GhostStep::Idle;
    };

    let speed = if ghost.vulnerability.is_consumed() {
        ghost.speed * CONSUMED_SPEED_FACTOR
    } else {
        ghost.speed
    };

    let mut returned = false;
    let moved = travel(&map.graph, &mut traversal, speed * dt, |node| {
        if ghost.path.front() == Some(&node) {
            ghost.path.pop_front();
        }
        if ghost.vulnerability.is_consumed() && node == map.house_exit {
            returned = true;
            return None;
        }
        let edge = controller.plan(ghost, node, context, rng)?;
        ghost.set_direction(edge.direction);
        Some(edge)
    });

    // The house exit may already be under a consumed ghost's feet
    if !returned && ghost.vulnerability.is_consumed() && traversal == Traversal::AtNode(map.house_exit) {
        returned = true;
    }

    ghost.traversal = Some(traversal);
    if let Some(position) = traversal.pixel_position(&map.graph) {
        ghost.position = position;
    }

    if returned {
        return GhostStep::ReturnedHome;
    }
    if moved {
        ghost.stuck_ticks = 0;
        return GhostStep::Moved;
    }

    ghost.stuck_ticks += 1;
    if ghost.stuck_ticks >= STUCK_TICK_LIMIT {
        warn!(
            ghost = ghost.personality.as_ref(),
            position = %ghost.position,
            ticks = ghost.stuck_ticks,
            "Ghost stuck, dropping its plan"
        );
        ghost.clear_plan();
        ghost.stuck_ticks = 0;
        return GhostStep::Stuck;
    }
    GhostStep::Moved
}
