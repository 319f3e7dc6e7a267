//! Map construction: reads a [`MazeProvider`] once and builds the intersection graph.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{IVec2, UVec2};
use smallvec::SmallVec;
use strum::EnumCount;
use tracing::{debug, info};

use crate::constants::CELL_SIZE;
use crate::entity::ghost::GhostPersonality;
use crate::entity::position::Position;
use crate::entity::traversal::Traversal;
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::graph::{Graph, Node, NodeId, NodeKind, TraversalFlags};
use crate::map::provider::MazeProvider;

/// Everything a level needs from its maze, captured at load time.
#[derive(Debug)]
pub struct Map {
    /// The intersection graph entities move on.
    pub graph: Graph,
    /// Board size in cells.
    pub dimensions: UVec2,
    /// Dots at level start, in provider order.
    pub dots: Vec<Position>,
    /// Power pills at level start, in provider order.
    pub power_pills: Vec<Position>,
    pub pacman_spawn: Position,
    /// Where the spawn point sits on the graph.
    pub spawn_traversal: Traversal,
    pub ghost_homes: [Position; GhostPersonality::COUNT],
    /// The node ghosts are released onto and return to.
    pub house_exit: NodeId,
    pub tunnel_ends: SmallVec<[NodeId; 2]>,
}

impl Map {
    /// Reads a provider and builds the navigation graph from its intersections.
    ///
    /// # Errors
    ///
    /// Fails if edges conflict or if the spawn point does not lie on a corridor.
    pub fn new(provider: &dyn MazeProvider) -> GameResult<Map> {
        let mut graph = Graph::new();
        let mut cell_to_node: HashMap<IVec2, NodeId> = HashMap::new();

        let mut add = |graph: &mut Graph, position: Position, kind: NodeKind| -> NodeId {
            *cell_to_node
                .entry(position.to_cell())
                .or_insert_with(|| graph.add_node(Node { position, kind }))
        };

        for position in provider.intersections() {
            add(&mut graph, position, NodeKind::Intersection);
        }
        let house_exit = add(&mut graph, provider.house_exit(), NodeKind::HouseExit);
        let tunnel_ends: SmallVec<[NodeId; 2]> = provider
            .tunnel_ends()
            .into_iter()
            .map(|position| add(&mut graph, position, NodeKind::TunnelEnd))
            .collect();

        Self::build_corridors(&mut graph, &cell_to_node, provider)?;
        Self::build_tunnels(&mut graph, &tunnel_ends)?;

        let pacman_spawn = provider.pacman_spawn();
        let spawn_traversal = graph
            .locate(pacman_spawn)
            .ok_or_else(|| MapError::InvalidConfig(format!("spawn point {pacman_spawn} is not on a corridor")))?;

        let ghost_homes = GhostPersonality::ALL.map(|personality| provider.ghost_home(personality));

        let edge_count: usize = graph.adjacency_list.iter().map(|i| i.edges().count()).sum();
        info!(
            nodes = graph.node_count(),
            edges = edge_count,
            max_span = graph.max_span(),
            "Intersection graph built"
        );

        Ok(Map {
            graph,
            dimensions: provider.dimensions(),
            dots: provider.dots(),
            power_pills: provider.power_pills(),
            pacman_spawn,
            spawn_traversal,
            ghost_homes,
            house_exit,
            tunnel_ends,
        })
    }

    /// Pixel position of the house exit node.
    pub fn house_exit_position(&self) -> Position {
        self.graph
            .get_node(self.house_exit)
            .map(|node| node.position)
            .unwrap_or_default()
    }

    pub fn ghost_home(&self, personality: GhostPersonality) -> Position {
        self.ghost_homes[personality.index()]
    }

    /// Walks every straight corridor leaving each node until it reaches another node.
    fn build_corridors(
        graph: &mut Graph,
        cell_to_node: &HashMap<IVec2, NodeId>,
        provider: &dyn MazeProvider,
    ) -> GameResult<()> {
        let origins: Vec<(NodeId, Position)> = graph.nodes().map(|(id, node)| (id, node.position)).collect();

        for (from, origin) in origins {
            for direction in Direction::DIRECTIONS {
                let mut steps = 0;
                let mut cursor = origin;
                loop {
                    cursor = cursor.ahead(direction, 1);
                    steps += 1;

                    if !provider.is_point_clear(cursor) || provider.is_in_ghost_house(cursor) {
                        if steps > 1 {
                            debug!(node = from, direction = direction.as_ref(), "Corridor ends without a node");
                        }
                        break;
                    }

                    if let Some(&to) = cell_to_node.get(&cursor.to_cell()) {
                        let distance = (steps * CELL_SIZE) as f32;
                        graph.add_edge(from, to, Some(distance), direction, TraversalFlags::ALL)?;
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Joins the two tunnel ends with zero-length edges only Pac-Man may use.
    fn build_tunnels(graph: &mut Graph, tunnel_ends: &[NodeId]) -> GameResult<()> {
        let [a, b] = tunnel_ends else {
            return Ok(());
        };

        let (a_pos, b_pos) = match (graph.get_node(*a), graph.get_node(*b)) {
            (Some(a), Some(b)) => (a.position, b.position),
            _ => return Err(MapError::InvalidConfig("tunnel end missing from graph".to_string()).into()),
        };

        // Leaving `a` away from `b` wraps around to `b`
        let direction = if (a_pos.x - b_pos.x).abs() >= (a_pos.y - b_pos.y).abs() {
            if a_pos.x < b_pos.x {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if a_pos.y < b_pos.y {
            Direction::Up
        } else {
            Direction::Down
        };

        graph.connect(*a, *b, Some(0.0), direction, TraversalFlags::PACMAN)?;
        debug!(from = a, to = b, direction = direction.as_ref(), "Tunnel connected");

        Ok(())
    }
}

/// The maps a game plays through, one per level. Never empty.
#[derive(Debug, Clone)]
pub struct LevelMaps {
    maps: Arc<[Arc<Map>]>,
}

impl LevelMaps {
    /// Builds a map from every provider, in level order.
    ///
    /// # Errors
    ///
    /// Fails when no provider is given or any of the maps fails to build.
    pub fn build(providers: &[&dyn MazeProvider]) -> GameResult<LevelMaps> {
        if providers.is_empty() {
            return Err(MapError::InvalidConfig("at least one maze is required".to_string()).into());
        }

        let maps = providers
            .iter()
            .map(|provider| Map::new(*provider).map(Arc::new))
            .collect::<GameResult<Vec<_>>>()?;
        Ok(LevelMaps { maps: maps.into() })
    }

    /// Every level plays on the same map.
    pub fn single(map: Arc<Map>) -> LevelMaps {
        LevelMaps {
            maps: Arc::from([map]),
        }
    }

    /// The map for a 1-based level. Levels past the last map reuse it.
    pub fn for_level(&self, level: u8) -> Arc<Map> {
        let index = usize::from(level.saturating_sub(1)).min(self.maps.len() - 1);
        Arc::clone(&self.maps[index])
    }

    /// Number of distinct maps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
