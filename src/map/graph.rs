use bitflags::bitflags;

use crate::entity::position::Position;
use crate::entity::traversal::Traversal;
use crate::error::MapError;
use crate::map::direction::Direction;

/// A unique identifier for a node, represented by its index in the graph's storage.
pub type NodeId = usize;

bitflags! {
    /// Defines who can traverse a given edge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        const PACMAN = 1 << 0;
        const GHOST = 1 << 1;

        const ALL = Self::PACMAN.bits() | Self::GHOST.bits();
    }
}

impl Default for TraversalFlags {
    fn default() -> Self {
        TraversalFlags::ALL
    }
}

/// Why a node exists in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A maze intersection reported by the provider.
    Intersection,
    /// The corridor cell in front of the ghost house door.
    HouseExit,
    /// One end of a wrap-around tunnel.
    TunnelEnd,
}

/// Represents a directed edge from one node to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// The destination node of this edge.
    pub target: NodeId,
    /// The length of the edge, in pixels. Tunnel edges are zero-length.
    pub distance: f32,
    /// The cardinal direction of this edge.
    pub direction: Direction,
    /// Defines who is allowed to traverse this edge.
    pub traversal_flags: TraversalFlags,
}

impl Edge {
    pub fn allows(&self, flags: TraversalFlags) -> bool {
        self.traversal_flags.intersects(flags)
    }
}

/// Represents a node in the graph, defined by its position.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// The pixel coordinates of the node.
    pub position: Position,
    pub kind: NodeKind,
}

/// Represents the four possible directions from a node in the graph.
///
/// Each field contains an optional edge leading in that direction,
/// providing O(1) access to edges in any cardinal direction.
#[derive(Debug, Default, Clone)]
pub struct Intersection {
    pub up: Option<Edge>,
    pub down: Option<Edge>,
    pub left: Option<Edge>,
    pub right: Option<Edge>,
}

impl Intersection {
    /// Returns an iterator over all edges from this intersection, in up/down/left/right order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> {
        [self.up, self.down, self.left, self.right].into_iter().flatten()
    }

    /// Retrieves the edge in the specified direction, if it exists.
    pub fn get(&self, direction: Direction) -> Option<Edge> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::None => None,
        }
    }

    /// Sets the edge in the specified direction, overwriting any existing edge there.
    pub fn set(&mut self, direction: Direction, edge: Edge) {
        match direction {
            Direction::Up => self.up = Some(edge),
            Direction::Down => self.down = Some(edge),
            Direction::Left => self.left = Some(edge),
            Direction::Right => self.right = Some(edge),
            Direction::None => {}
        }
    }
}

/// A directed graph of maze intersections using an adjacency list representation.
///
/// Nodes are stored in a vector, and their indices serve as their `NodeId`.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    pub adjacency_list: Vec<Intersection>,
    /// Largest Manhattan span, in cells, covered by a single edge.
    max_span: u32,
}

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new node to the graph and returns its ID.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.adjacency_list.push(Intersection::default());
        id
    }

    /// Connects two existing nodes with a pair of opposing edges.
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        distance: Option<f32>,
        direction: Direction,
        flags: TraversalFlags,
    ) -> Result<(), MapError> {
        self.add_edge(from, to, distance, direction, flags)?;
        self.add_edge(to, from, distance, direction.opposite(), flags)
    }

    /// Adds a directed edge between two nodes.
    ///
    /// If `distance` is `None`, the Euclidean distance between the two nodes is used.
    ///
    /// # Errors
    ///
    /// Returns an error if either node does not exist, the direction is `None`,
    /// the distance is negative, or an edge already leaves `from` in that direction.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        distance: Option<f32>,
        direction: Direction,
        flags: TraversalFlags,
    ) -> Result<(), MapError> {
        let from_pos = self.nodes.get(from).ok_or(MapError::NodeNotFound(from))?.position;
        let to_pos = self.nodes.get(to).ok_or(MapError::NodeNotFound(to))?.position;

        if direction == Direction::None {
            return Err(MapError::InvalidConfig("edge direction must be cardinal".to_string()));
        }

        let distance = match distance {
            Some(d) if d < 0.0 => {
                return Err(MapError::InvalidConfig("edge distance must be non-negative".to_string()));
            }
            Some(d) => d,
            None => from_pos.distance(to_pos),
        };

        let intersection = &mut self.adjacency_list[from];
        if intersection.get(direction).is_some() {
            return Err(MapError::InvalidConfig(format!(
                "node {from} already has an edge going {}",
                direction.as_ref()
            )));
        }

        intersection.set(
            direction,
            Edge {
                target: to,
                distance,
                direction,
                traversal_flags: flags,
            },
        );

        // Tunnel edges count by the ground they skip, not their zero length
        let span = (from_pos.to_cell() - to_pos.to_cell()).abs().element_sum() as u32;
        self.max_span = self.max_span.max(span);

        Ok(())
    }

    /// Retrieves an immutable reference to a node's data.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterates over all nodes with their IDs.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Returns the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The largest number of cells of Manhattan distance a single edge can cover (at least 1).
    pub fn max_span(&self) -> u32 {
        self.max_span.max(1)
    }

    /// Finds a specific edge from a source node to a target node.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<Edge> {
        self.adjacency_list.get(from)?.edges().find(|edge| edge.target == to)
    }

    /// Finds an edge originating from a given node that follows a specific direction.
    pub fn find_edge_in_direction(&self, from: NodeId, direction: Direction) -> Option<Edge> {
        self.adjacency_list.get(from)?.get(direction)
    }

    /// Outgoing edges usable by an entity with `flags`.
    pub fn edges_for(&self, from: NodeId, flags: TraversalFlags) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency_list
            .get(from)
            .into_iter()
            .flat_map(|intersection| intersection.edges())
            .filter(move |edge| edge.allows(flags))
    }

    /// The node sitting exactly on `position`, if any.
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.position == position)
    }

    /// The node closest to `position` by Manhattan distance; ties go to the lowest ID.
    pub fn nearest_node(&self, position: Position) -> Option<NodeId> {
        self.nearest_node_where(position, |_, _| true)
    }

    /// Like [`Graph::nearest_node`], restricted to nodes accepted by `filter`.
    pub fn nearest_node_where<F>(&self, position: Position, filter: F) -> Option<NodeId>
    where
        F: Fn(NodeId, &Node) -> bool,
    {
        let mut best: Option<(NodeId, f32)> = None;
        for (id, node) in self.nodes() {
            if !filter(id, node) {
                continue;
            }
            let distance = node.position.manhattan(position);
            // Strict comparison keeps the earliest node on ties
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Maps a pixel position onto the graph.
    ///
    /// Positions on a node resolve to [`Traversal::AtNode`]; positions lying on an
    /// edge resolve to [`Traversal::BetweenNodes`] measured from the lower-ID endpoint.
    pub fn locate(&self, position: Position) -> Option<Traversal> {
        if let Some(node) = self.node_at(position) {
            return Some(Traversal::AtNode(node));
        }

        for (from, node) in self.nodes() {
            for edge in self.adjacency_list[from].edges() {
                if edge.target < from || edge.distance <= 0.0 {
                    continue;
                }
                let Some(target) = self.get_node(edge.target) else {
                    continue;
                };

                let (a, b) = (node.position, target.position);
                let colinear = (a.x == b.x && position.x == a.x) || (a.y == b.y && position.y == a.y);
                let between = position.x >= a.x.min(b.x)
                    && position.x <= a.x.max(b.x)
                    && position.y >= a.y.min(b.y)
                    && position.y <= a.y.max(b.y);

                if colinear && between {
                    return Some(Traversal::BetweenNodes {
                        from,
                        to: edge.target,
                        traversed: a.distance(position),
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f32, y: f32) -> Node {
        Node {
            position: Position::new(x, y),
            kind: NodeKind::Intersection,
        }
    }

    fn line_graph() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_node(node(0.0, 0.0));
        let b = graph.add_node(node(32.0, 0.0));
        let c = graph.add_node(node(32.0, 48.0));
        graph.connect(a, b, None, Direction::Right, TraversalFlags::ALL).unwrap();
        graph.connect(b, c, None, Direction::Down, TraversalFlags::ALL).unwrap();
        graph
    }

    #[test]
    fn test_connect_adds_both_directions() {
        let graph = line_graph();
        let forward = graph.find_edge_in_direction(0, Direction::Right).unwrap();
        assert_eq!(forward.target, 1);
        assert_eq!(forward.distance, 32.0);
        let back = graph.find_edge_in_direction(1, Direction::Left).unwrap();
        assert_eq!(back.target, 0);
        assert!(graph.find_edge(0, 2).is_none());
    }

    #[test]
    fn test_add_edge_rejects_duplicates_and_bad_input() {
        let mut graph = line_graph();
        assert!(graph.add_edge(0, 2, None, Direction::Right, TraversalFlags::ALL).is_err());
        assert!(graph.add_edge(0, 2, Some(-1.0), Direction::Down, TraversalFlags::ALL).is_err());
        assert!(graph.add_edge(0, 2, None, Direction::None, TraversalFlags::ALL).is_err());
        assert_eq!(
            graph.add_edge(0, 9, None, Direction::Down, TraversalFlags::ALL),
            Err(MapError::NodeNotFound(9))
        );
    }

    #[test]
    fn test_edges_for_filters_by_flags() {
        let mut graph = line_graph();
        graph.add_edge(0, 2, Some(0.0), Direction::Left, TraversalFlags::PACMAN).unwrap();

        assert_eq!(graph.edges_for(0, TraversalFlags::PACMAN).count(), 2);
        assert_eq!(graph.edges_for(0, TraversalFlags::GHOST).count(), 1);
    }

    #[test]
    fn test_max_span() {
        let graph = line_graph();
        // 48px down is 3 cells
        assert_eq!(graph.max_span(), 3);
        assert_eq!(Graph::new().max_span(), 1);
    }

    #[test]
    fn test_nearest_node_ties_go_to_lowest_id() {
        let graph = line_graph();
        assert_eq!(graph.nearest_node(Position::new(16.0, 0.0)), Some(0));
        assert_eq!(graph.nearest_node(Position::new(40.0, 40.0)), Some(2));
        assert_eq!(Graph::new().nearest_node(Position::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_locate() {
        let graph = line_graph();
        assert_eq!(graph.locate(Position::new(32.0, 0.0)), Some(Traversal::AtNode(1)));
        assert_eq!(
            graph.locate(Position::new(32.0, 16.0)),
            Some(Traversal::BetweenNodes {
                from: 1,
                to: 2,
                traversed: 16.0
            })
        );
        assert_eq!(graph.locate(Position::new(100.0, 100.0)), None);
    }
}
