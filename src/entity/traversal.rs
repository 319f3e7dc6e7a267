use crate::entity::position::Position;
use crate::map::graph::{Graph, NodeId};

/// Where an entity sits on the intersection graph.
///
/// This enum allows for precise tracking of whether an entity is exactly at a node
/// or moving along an edge between two nodes.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Traversal {
    /// The entity is located exactly at a node.
    AtNode(NodeId),
    /// The entity is on an edge between two nodes.
    BetweenNodes {
        from: NodeId,
        to: NodeId,
        /// The distance traversed along the edge from the `from` node, in pixels.
        traversed: f32,
    },
}

impl Traversal {
    /// Returns `true` if the position is exactly at a node.
    pub fn is_at_node(&self) -> bool {
        matches!(self, Traversal::AtNode(_))
    }

    /// Returns the `NodeId` of the current or most recently departed node.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_node_id(&self) -> NodeId {
        match self {
            Traversal::AtNode(id) => *id,
            Traversal::BetweenNodes { from, .. } => *from,
        }
    }

    /// Returns the `NodeId` of the destination node, if currently on an edge.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_node_id(&self) -> Option<NodeId> {
        match self {
            Traversal::AtNode(_) => None,
            Traversal::BetweenNodes { to, .. } => Some(*to),
        }
    }

    /// Resolves this graph location to a pixel position.
    ///
    /// Returns `None` if a referenced node does not exist.
    pub fn pixel_position(&self, graph: &Graph) -> Option<Position> {
        match *self {
            Traversal::AtNode(id) => graph.get_node(id).map(|node| node.position),
            Traversal::BetweenNodes { from, to, traversed } => {
                let a = graph.get_node(from)?.position.as_vec2();
                let b = graph.get_node(to)?.position.as_vec2();
                // Zero-length tunnel edges never leave their origin
                let length = graph.find_edge(from, to).map_or_else(|| a.distance(b), |edge| edge.distance);
                if length <= f32::EPSILON {
                    return Some(a.into());
                }
                // Edges are axis-aligned, so stepping along the unit vector stays exact
                Some((a + (b - a).normalize_or_zero() * traversed.clamp(0.0, length)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::direction::Direction;
    use crate::map::graph::{Node, NodeKind, TraversalFlags};

    fn graph() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_node(Node {
            position: Position::new(0.0, 0.0),
            kind: NodeKind::Intersection,
        });
        let b = graph.add_node(Node {
            position: Position::new(64.0, 0.0),
            kind: NodeKind::Intersection,
        });
        graph.connect(a, b, None, Direction::Right, TraversalFlags::ALL).unwrap();
        graph
    }

    #[test]
    fn test_node_ids() {
        let at = Traversal::AtNode(3);
        assert!(at.is_at_node());
        assert_eq!(at.from_node_id(), 3);
        assert_eq!(at.to_node_id(), None);

        let between = Traversal::BetweenNodes {
            from: 1,
            to: 2,
            traversed: 4.0,
        };
        assert!(!between.is_at_node());
        assert_eq!(between.from_node_id(), 1);
        assert_eq!(between.to_node_id(), Some(2));
    }

    #[test]
    fn test_pixel_position_interpolates() {
        let graph = graph();
        assert_eq!(Traversal::AtNode(1).pixel_position(&graph), Some(Position::new(64.0, 0.0)));
        let midway = Traversal::BetweenNodes {
            from: 1,
            to: 0,
            traversed: 16.0,
        };
        assert_eq!(midway.pixel_position(&graph), Some(Position::new(48.0, 0.0)));
        assert_eq!(Traversal::AtNode(7).pixel_position(&graph), None);
    }
}
