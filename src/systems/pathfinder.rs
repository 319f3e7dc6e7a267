//! A* search over the intersection graph.
//!
//! Every edge costs the same, so the search minimizes the number of hops. The
//! heuristic is the Manhattan distance in cells; edge costs are scaled by the
//! longest span a single edge covers, which keeps the heuristic admissible and
//! consistent even across long corridors and tunnels.
//!
//! The search itself is deterministic: the open set pops the lowest f-score and
//! breaks ties by insertion order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use pathfinding::prelude::bfs_reach;
use tracing::trace;

use crate::entity::position::Position;
use crate::error::EntityError;
use crate::map::graph::{Graph, NodeId, TraversalFlags};

/// Shortest-path queries on a graph, restricted to edges an entity may use.
#[derive(Clone, Copy)]
pub struct Pathfinder<'a> {
    graph: &'a Graph,
    flags: TraversalFlags,
}

impl<'a> Pathfinder<'a> {
    pub fn new(graph: &'a Graph, flags: TraversalFlags) -> Self {
        Self { graph, flags }
    }

    /// A pathfinder that ignores Pac-Man-only edges.
    pub fn for_ghosts(graph: &'a Graph) -> Self {
        Self::new(graph, TraversalFlags::GHOST)
    }

    /// Finds the shortest waypoint sequence between the nodes nearest to `start` and `target`.
    ///
    /// The sequence starts with the start node and ends with the target node. It is
    /// empty when either position has no graph node or the two are disconnected;
    /// callers hold their course and retry at the next intersection.
    pub fn find_path(&self, start: Position, target: Position) -> Vec<Position> {
        let (Some(from), Some(to)) = (self.graph.nearest_node(start), self.graph.nearest_node(target)) else {
            return Vec::new();
        };

        match self.find_node_path(from, to) {
            Ok(path) => self.positions(&path),
            Err(error) => {
                trace!(%start, %target, %error, "No path");
                Vec::new()
            }
        }
    }

    /// A* between two nodes. The returned path includes both endpoints.
    pub fn find_node_path(&self, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>, EntityError> {
        let node_count = self.graph.node_count();
        let goal_cell = self
            .graph
            .get_node(goal)
            .ok_or(EntityError::NodeNotFound(goal))?
            .position
            .to_cell();
        if start >= node_count {
            return Err(EntityError::NodeNotFound(start));
        }
        if start == goal {
            return Ok(vec![start]);
        }

        let step_cost = self.graph.max_span();
        let heuristic = |id: NodeId| -> u32 {
            self.graph
                .get_node(id)
                .map(|node| (node.position.to_cell() - goal_cell).abs().element_sum() as u32)
                .unwrap_or(0)
        };

        let mut g_score = vec![u32::MAX; node_count];
        let mut came_from: Vec<Option<NodeId>> = vec![None; node_count];
        let mut closed = vec![false; node_count];
        let mut open: BinaryHeap<Reverse<(u32, u64, NodeId)>> = BinaryHeap::new();
        let mut sequence: u64 = 0;

        g_score[start] = 0;
        open.push(Reverse((heuristic(start), sequence, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if closed[current] {
                continue;
            }
            closed[current] = true;

            if current == goal {
                return Ok(Self::reconstruct(&came_from, goal));
            }

            for edge in self.graph.edges_for(current, self.flags) {
                let next = edge.target;
                if next >= node_count || closed[next] {
                    continue;
                }

                let tentative = g_score[current].saturating_add(step_cost);
                if tentative < g_score[next] {
                    g_score[next] = tentative;
                    came_from[next] = Some(current);
                    sequence += 1;
                    open.push(Reverse((tentative.saturating_add(heuristic(next)), sequence, next)));
                }
            }
        }

        Err(EntityError::PathNotFound { from: start, to: goal })
    }

    /// Every node reachable from `start` through usable edges, `start` first.
    pub fn reachable_from(&self, start: NodeId) -> Vec<NodeId> {
        if start >= self.graph.node_count() {
            return Vec::new();
        }
        bfs_reach(start, |&node| {
            self.graph
                .edges_for(node, self.flags)
                .map(|edge| edge.target)
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Converts node IDs to their pixel positions, skipping unknown IDs.
    pub fn positions(&self, path: &[NodeId]) -> Vec<Position> {
        path.iter()
            .filter_map(|&id| self.graph.get_node(id).map(|node| node.position))
            .collect()
    }

    fn reconstruct(came_from: &[Option<NodeId>], goal: NodeId) -> Vec<NodeId> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(previous) = came_from[current] {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::direction::Direction;
    use crate::map::graph::{Node, NodeKind};

    fn add(graph: &mut Graph, x: i32, y: i32) -> NodeId {
        graph.add_node(Node {
            position: Position::from_cell(glam::IVec2::new(x, y)),
            kind: NodeKind::Intersection,
        })
    }

    /// A 3x3 lattice of nodes two cells apart, ids row-major.
    fn lattice() -> Graph {
        let mut graph = Graph::new();
        for y in 0..3 {
            for x in 0..3 {
                add(&mut graph, x * 2, y * 2);
            }
        }
        for y in 0..3 {
            for x in 0..3 {
                let id = y * 3 + x;
                if x < 2 {
                    graph.connect(id, id + 1, None, Direction::Right, TraversalFlags::ALL).unwrap();
                }
                if y < 2 {
                    graph.connect(id, id + 3, None, Direction::Down, TraversalFlags::ALL).unwrap();
                }
            }
        }
        graph
    }

    #[test]
    fn test_path_includes_both_endpoints() {
        let graph = lattice();
        let path = Pathfinder::for_ghosts(&graph).find_node_path(0, 8).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&8));
        for pair in path.windows(2) {
            assert!(graph.find_edge(pair[0], pair[1]).is_some());
        }
    }

    #[test]
    fn test_tie_breaking_is_deterministic() {
        let graph = lattice();
        let pathfinder = Pathfinder::for_ghosts(&graph);
        let first = pathfinder.find_node_path(0, 8).unwrap();
        for _ in 0..10 {
            assert_eq!(pathfinder.find_node_path(0, 8).unwrap(), first);
        }
        // Down is explored before right, and equal f-scores pop first-inserted first
        assert_eq!(first, vec![0, 3, 6, 7, 8]);
    }

    #[test]
    fn test_same_start_and_goal() {
        let graph = lattice();
        assert_eq!(Pathfinder::for_ghosts(&graph).find_node_path(4, 4).unwrap(), vec![4]);
    }

    #[test]
    fn test_unknown_nodes() {
        let graph = lattice();
        let pathfinder = Pathfinder::for_ghosts(&graph);
        assert_eq!(pathfinder.find_node_path(0, 42), Err(EntityError::NodeNotFound(42)));
        assert_eq!(pathfinder.find_node_path(42, 0), Err(EntityError::NodeNotFound(42)));
    }

    #[test]
    fn test_disconnected_returns_empty() {
        let mut graph = lattice();
        let island = add(&mut graph, 20, 20);
        let pathfinder = Pathfinder::for_ghosts(&graph);

        assert_eq!(
            pathfinder.find_node_path(0, island),
            Err(EntityError::PathNotFound { from: 0, to: island })
        );
        let far = Position::from_cell(glam::IVec2::new(20, 20));
        assert!(pathfinder.find_path(Position::new(0.0, 0.0), far).is_empty());
        assert!(Pathfinder::for_ghosts(&Graph::new())
            .find_path(Position::new(0.0, 0.0), far)
            .is_empty());
    }

    #[test]
    fn test_ghosts_ignore_pacman_only_edges() {
        let mut graph = lattice();
        // A shortcut from corner to corner that only Pac-Man may take
        graph.add_edge(0, 8, Some(0.0), Direction::Left, TraversalFlags::PACMAN).unwrap();

        assert_eq!(Pathfinder::new(&graph, TraversalFlags::PACMAN).find_node_path(0, 8).unwrap(), vec![0, 8]);
        assert_eq!(Pathfinder::for_ghosts(&graph).find_node_path(0, 8).unwrap().len(), 5);
    }

    #[test]
    fn test_reachable_from() {
        let mut graph = lattice();
        let island = add(&mut graph, 20, 20);
        let reachable = Pathfinder::for_ghosts(&graph).reachable_from(0);
        assert_eq!(reachable.len(), 9);
        assert_eq!(reachable[0], 0);
        assert!(!reachable.contains(&island));
    }
}
