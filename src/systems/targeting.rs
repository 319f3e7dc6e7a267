//! Ghost behavior: picking a target by mode and personality, then turning it into a path.
//!
//! Plans are only made when a ghost stands on a node, so a ghost never changes its
//! mind in the middle of a corridor.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::constants::{AMBUSH_LOOKAHEAD_CELLS, CELL_SIZE, FLANK_LOOKAHEAD_CELLS, OPPORTUNIST_RETREAT_CELLS};
use crate::entity::ghost::{GhostEntity, GhostPersonality};
use crate::entity::mode::Mode;
use crate::entity::position::Position;
use crate::error::EntityError;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::graph::{Edge, NodeId, NodeKind, TraversalFlags};
use crate::systems::pathfinder::Pathfinder;

/// The parts of the world a ghost looks at when choosing where to go.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub pacman_position: Position,
    pub pacman_direction: Direction,
    pub mode: Mode,
}

/// Where a ghost aims in chase mode, given its own position.
pub fn chase_target(
    personality: GhostPersonality,
    ghost_position: Position,
    pacman_position: Position,
    pacman_direction: Direction,
    corner: Position,
) -> Position {
    match personality {
        GhostPersonality::Blinky => pacman_position,
        GhostPersonality::Pinky => pacman_position.ahead(pacman_direction, AMBUSH_LOOKAHEAD_CELLS),
        GhostPersonality::Inky => pacman_position.ahead(pacman_direction, FLANK_LOOKAHEAD_CELLS),
        GhostPersonality::Clyde => {
            if ghost_position.distance(pacman_position) > OPPORTUNIST_RETREAT_CELLS * CELL_SIZE as f32 {
                pacman_position
            } else {
                corner
            }
        }
    }
}

/// Chooses targets and paths for ghosts on one map.
pub struct GhostController<'a> {
    map: &'a Map,
    pathfinder: Pathfinder<'a>,
}

impl<'a> GhostController<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self {
            map,
            pathfinder: Pathfinder::for_ghosts(&map.graph),
        }
    }

    /// Picks the position `ghost`, standing on node `at`, should head for.
    ///
    /// Consumed ghosts always head for the house exit. Scared ghosts pick a fresh
    /// random reachable intersection every time they are asked.
    pub fn select_target<R: Rng + ?Sized>(
        &self,
        ghost: &GhostEntity,
        at: NodeId,
        context: &TargetContext,
        rng: &mut R,
    ) -> Position {
        if ghost.vulnerability.is_consumed() {
            return self.map.house_exit_position();
        }

        let corner = ghost.personality.scatter_corner(self.map.dimensions);
        // Planning runs while the ghost is mid-move, so its stored position can lag behind the node
        let standing = self.map.graph.get_node(at).map_or(ghost.position, |node| node.position);
        match context.mode {
            Mode::Scatter => corner,
            Mode::Chase => chase_target(
                ghost.personality,
                standing,
                context.pacman_position,
                context.pacman_direction,
                corner,
            ),
            Mode::Scared => self.random_intersection(at, rng).unwrap_or(corner),
        }
    }

    /// A uniformly random intersection reachable from `at`, never the house exit or a tunnel end.
    pub fn random_intersection<R: Rng + ?Sized>(&self, at: NodeId, rng: &mut R) -> Option<Position> {
        let candidates: Vec<NodeId> = self
            .pathfinder
            .reachable_from(at)
            .into_iter()
            .filter(|&id| {
                self.map
                    .graph
                    .get_node(id)
                    .is_some_and(|node| node.kind == NodeKind::Intersection)
            })
            .collect();

        let choice = candidates.choose(rng)?;
        self.map.graph.get_node(*choice).map(|node| node.position)
    }

    /// Resolves `target` to a node reachable from `at`.
    ///
    /// A target whose nearest node cannot be reached falls back to the nearest node that can.
    pub fn resolve_target_node(&self, at: NodeId, target: Position) -> Result<NodeId, EntityError> {
        let graph = &self.map.graph;
        let reachable = self.pathfinder.reachable_from(at);
        if reachable.is_empty() {
            return Err(EntityError::NodeNotFound(at));
        }

        match graph.nearest_node(target) {
            Some(node) if reachable.contains(&node) => Ok(node),
            nearest => {
                let fallback = graph
                    .nearest_node_where(target, |id, _| reachable.contains(&id))
                    .ok_or(EntityError::UnreachableTarget(at))?;
                debug!(
                    from = at,
                    nearest = ?nearest,
                    fallback,
                    error = %EntityError::UnreachableTarget(at),
                    "Target clamped to a reachable node"
                );
                Ok(fallback)
            }
        }
    }

    /// Replans for a ghost standing on node `at` and returns the edge to take next.
    ///
    /// When no path exists (or the ghost already stands on its target) the ghost keeps
    /// its current heading if it can, otherwise takes the first open non-reversing
    /// edge, and reverses only as a last resort.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        ghost: &mut GhostEntity,
        at: NodeId,
        context: &TargetContext,
        rng: &mut R,
    ) -> Option<Edge> {
        let target = self.select_target(ghost, at, context, rng);
        ghost.target = Some(target);
        ghost.path.clear();
        ghost.next_intersection = None;

        let path = self
            .resolve_target_node(at, target)
            .and_then(|goal| self.pathfinder.find_node_path(at, goal));

        match path {
            Ok(path) if path.len() >= 2 => {
                ghost.path.extend(path.iter().skip(1));
                ghost.next_intersection = Some(path[1]);
                trace!(ghost = ghost.personality.as_ref(), %target, hops = path.len() - 1, "Path planned");
                if let Some(edge) = self.map.graph.find_edge(at, path[1]) {
                    return Some(edge);
                }
            }
            Ok(_) => {}
            Err(error) => {
                debug!(ghost = ghost.personality.as_ref(), node = at, %error, "Holding course");
            }
        }

        let edge = self.fallback_edge(at, ghost.direction);
        if let Some(edge) = edge {
            ghost.next_intersection = Some(edge.target);
            ghost.path.push_back(edge.target);
        }
        edge
    }

    fn fallback_edge(&self, at: NodeId, heading: Direction) -> Option<Edge> {
        let graph = &self.map.graph;
        let usable = |edge: &Edge| edge.allows(TraversalFlags::GHOST);

        graph
            .find_edge_in_direction(at, heading)
            .filter(usable)
            .or_else(|| {
                graph
                    .edges_for(at, TraversalFlags::GHOST)
                    .find(|edge| edge.direction != heading.opposite())
            })
            .or_else(|| graph.find_edge_in_direction(at, heading.opposite()).filter(usable))
    }
}
