use pacman_core::entity::position::Position;
use pacman_core::map::graph::{Graph, NodeId, TraversalFlags};
use pacman_core::systems::pathfinder::Pathfinder;
use pathfinding::prelude::bfs;
use speculoos::prelude::*;

mod common;

fn bfs_hops(graph: &Graph, flags: TraversalFlags, start: NodeId, goal: NodeId) -> Option<usize> {
    bfs(
        &start,
        |&node| graph.edges_for(node, flags).map(|edge| edge.target).collect::<Vec<_>>(),
        |&node| node == goal,
    )
    .map(|path| path.len() - 1)
}

fn assert_adjacent(graph: &Graph, flags: TraversalFlags, path: &[NodeId]) {
    for pair in path.windows(2) {
        let edge = graph.find_edge(pair[0], pair[1]);
        assert!(edge.is_some_and(|e| e.allows(flags)), "{} -> {} is not an edge", pair[0], pair[1]);
    }
}

#[test]
fn test_paths_match_bfs_hop_counts_for_every_pair() {
    let map = common::classic_map();
    let graph = &map.graph;

    for flags in [TraversalFlags::PACMAN, TraversalFlags::GHOST] {
        let pathfinder = Pathfinder::new(graph, flags);
        for start in 0..graph.node_count() {
            for goal in 0..graph.node_count() {
                let expected = bfs_hops(graph, flags, start, goal);
                match pathfinder.find_node_path(start, goal) {
                    Ok(path) => {
                        assert_that(&path.first()).is_equal_to(Some(&start));
                        assert_that(&path.last()).is_equal_to(Some(&goal));
                        assert_adjacent(graph, flags, &path);
                        assert_eq!(Some(path.len() - 1), expected, "{start} -> {goal} with {flags:?}");
                    }
                    Err(_) => assert_that(&expected).is_none(),
                }
            }
        }
    }
}

#[test]
fn test_classic_graph_is_connected_for_both() {
    let map = common::classic_map();
    for pathfinder in [Pathfinder::new(&map.graph, TraversalFlags::PACMAN), Pathfinder::for_ghosts(&map.graph)] {
        assert_that(&pathfinder.reachable_from(0).len()).is_equal_to(map.graph.node_count());
    }
}

#[test]
fn test_ghost_paths_never_use_the_tunnel() {
    let map = common::classic_map();
    let [left, right] = [map.tunnel_ends[0], map.tunnel_ends[1]];

    let ghost_path = Pathfinder::for_ghosts(&map.graph).find_node_path(left, right).unwrap();
    let pacman_path = Pathfinder::new(&map.graph, TraversalFlags::PACMAN)
        .find_node_path(left, right)
        .unwrap();

    assert_that(&pacman_path).is_equal_to(vec![left, right]);
    assert_that(&ghost_path.len()).is_greater_than(2);
    assert_adjacent(&map.graph, TraversalFlags::GHOST, &ghost_path);
}

#[test]
fn test_paths_are_deterministic() {
    let map = common::classic_map();
    let pathfinder = Pathfinder::for_ghosts(&map.graph);
    let last = map.graph.node_count() - 1;
    let first = pathfinder.find_node_path(0, last).unwrap();
    for _ in 0..10 {
        assert_that(&pathfinder.find_node_path(0, last).unwrap()).is_equal_to(&first);
    }
}

#[test]
fn test_find_path_snaps_to_nearest_nodes() {
    let map = common::classic_map();
    let pathfinder = Pathfinder::for_ghosts(&map.graph);

    // Board corners are walls; the nearest intersections sit one cell in
    let path = pathfinder.find_path(Position::new(0.0, 0.0), Position::new(432.0, 0.0));

    assert_that(&path.first().copied()).is_equal_to(Some(Position::new(16.0, 16.0)));
    assert_that(&path.last().copied()).is_equal_to(Some(Position::new(416.0, 16.0)));
}

#[test]
fn test_same_start_and_target_is_a_single_waypoint() {
    let map = common::classic_map();
    let exit = map.house_exit_position();
    let path = Pathfinder::for_ghosts(&map.graph).find_path(exit, exit);
    assert_that(&path).is_equal_to(vec![exit]);
}

#[test]
fn test_unknown_nodes_are_errors() {
    let map = common::classic_map();
    let pathfinder = Pathfinder::for_ghosts(&map.graph);
    assert_that(&pathfinder.find_node_path(0, 10_000).is_err()).is_true();
    assert_that(&pathfinder.find_node_path(10_000, 0).is_err()).is_true();
    assert_that(&pathfinder.reachable_from(10_000)).is_equal_to(Vec::<NodeId>::new());
}

#[test]
fn test_empty_graph_yields_empty_path() {
    let graph = Graph::new();
    let path = Pathfinder::for_ghosts(&graph).find_path(Position::new(0.0, 0.0), Position::new(16.0, 0.0));
    assert_that(&path.is_empty()).is_true();
}
