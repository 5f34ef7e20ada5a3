//! Graph searches over a [`GridGraph`]: BFS, Dijkstra, and A* with
//! exploration tracking. Every run owns its cost, predecessor, and
//! visited arrays (dense, keyed by row-major node index), so no state
//! leaks between calls and runs never contaminate each other.
//!
//! Failure policy: out-of-bounds endpoints and unreachable goals yield
//! empty containers, never errors. A path runs from the node after the
//! start through the goal; it is empty when start equals goal.

use std::collections::{BTreeSet, VecDeque};

use crate::grid::GridGraph;
use crate::types::Pos;

/// A computed path plus the set of nodes the search visited. The
/// explored set is diagnostic only; game logic must not depend on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathResult {
    pub path: Vec<Pos>,
    pub explored: BTreeSet<Pos>,
}

impl PathResult {
    fn empty() -> Self {
        Self::default()
    }
}

/// Frontier entry ordered by accumulated cost, then row-major index.
/// The index tie-break plus the canonical adjacency order make every
/// search deterministic node-for-node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CostNode {
    cost: u32,
    idx: u32,
}

/// A* frontier entry: `f = g + h`, ties broken toward the goal (lower
/// `h`), then by row-major index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    idx: u32,
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

pub fn bfs(graph: &GridGraph, start: Pos, goal: Pos) -> Vec<Pos> {
    bfs_with_tracking(graph, start, goal).path
}

/// Unweighted shortest path by hop count. The explored set is marked on
/// discovery, so an unreachable goal leaves it covering exactly the
/// start's connected component.
pub fn bfs_with_tracking(graph: &GridGraph, start: Pos, goal: Pos) -> PathResult {
    let (Some(start_idx), Some(goal_idx)) = (graph.index(start), graph.index(goal)) else {
        return PathResult::empty();
    };

    let cells = graph.cell_count();
    let mut visited = vec![false; cells];
    let mut came_from: Vec<Option<u32>> = vec![None; cells];
    let mut explored = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited[start_idx] = true;
    explored.insert(start);
    queue.push_back(start_idx);

    while let Some(current) = queue.pop_front() {
        if current == goal_idx {
            break;
        }
        for &next in neighbor_indices(graph, current) {
            let next = next as usize;
            if graph.is_wall_index(next) || visited[next] {
                continue;
            }
            visited[next] = true;
            explored.insert(graph.pos_of(next));
            came_from[next] = Some(current as u32);
            queue.push_back(next);
        }
    }

    PathResult { path: reconstruct_path(graph, &came_from, start_idx, goal_idx), explored }
}

pub fn dijkstra(graph: &GridGraph, start: Pos, goal: Pos) -> Vec<Pos> {
    dijkstra_with_tracking(graph, start, goal).path
}

/// Cost-ordered search. Steps cost `1 + penalty(next)`, which reduces
/// to BFS on a penalty-free grid but honors the danger-zone overlays
/// built by derived graphs. Cost decreases remove the stale frontier
/// entry rather than relying on decrease-key.
pub fn dijkstra_with_tracking(graph: &GridGraph, start: Pos, goal: Pos) -> PathResult {
    let (Some(start_idx), Some(goal_idx)) = (graph.index(start), graph.index(goal)) else {
        return PathResult::empty();
    };

    let cells = graph.cell_count();
    let mut dist = vec![u32::MAX; cells];
    let mut came_from: Vec<Option<u32>> = vec![None; cells];
    let mut open_entry: Vec<Option<CostNode>> = vec![None; cells];
    let mut open = BTreeSet::new();
    let mut explored = BTreeSet::new();

    dist[start_idx] = 0;
    let start_node = CostNode { cost: 0, idx: start_idx as u32 };
    open.insert(start_node);
    open_entry[start_idx] = Some(start_node);

    while let Some(current) = open.pop_first() {
        let current_idx = current.idx as usize;
        open_entry[current_idx] = None;
        explored.insert(graph.pos_of(current_idx));

        if current_idx == goal_idx {
            break;
        }

        for &next in neighbor_indices(graph, current_idx) {
            let next = next as usize;
            if graph.is_wall_index(next) {
                continue;
            }
            let step = 1 + graph.penalty_index(next);
            let tentative = dist[current_idx].saturating_add(step);
            if tentative >= dist[next] {
                continue;
            }
            if let Some(stale) = open_entry[next].take() {
                open.remove(&stale);
            }
            dist[next] = tentative;
            came_from[next] = Some(current_idx as u32);
            let node = CostNode { cost: tentative, idx: next as u32 };
            open.insert(node);
            open_entry[next] = Some(node);
        }
    }

    PathResult { path: reconstruct_path(graph, &came_from, start_idx, goal_idx), explored }
}

pub fn astar(graph: &GridGraph, start: Pos, goal: Pos) -> Vec<Pos> {
    astar_with_tracking(graph, start, goal).path
}

/// A* with a Manhattan heuristic, which stays admissible here because
/// diagonal steps also cost 1. The g-score lives in its own dense
/// array; the frontier key combines it with the heuristic.
pub fn astar_with_tracking(graph: &GridGraph, start: Pos, goal: Pos) -> PathResult {
    let (Some(start_idx), Some(goal_idx)) = (graph.index(start), graph.index(goal)) else {
        return PathResult::empty();
    };

    let cells = graph.cell_count();
    let mut g_score = vec![u32::MAX; cells];
    let mut came_from: Vec<Option<u32>> = vec![None; cells];
    let mut open_entry: Vec<Option<OpenNode>> = vec![None; cells];
    let mut open = BTreeSet::new();
    let mut explored = BTreeSet::new();

    g_score[start_idx] = 0;
    let start_h = manhattan(start, goal);
    let start_node = OpenNode { f: start_h, h: start_h, idx: start_idx as u32 };
    open.insert(start_node);
    open_entry[start_idx] = Some(start_node);

    while let Some(current) = open.pop_first() {
        let current_idx = current.idx as usize;
        open_entry[current_idx] = None;
        explored.insert(graph.pos_of(current_idx));

        if current_idx == goal_idx {
            break;
        }

        for &next in neighbor_indices(graph, current_idx) {
            let next = next as usize;
            if graph.is_wall_index(next) {
                continue;
            }
            let step = 1 + graph.penalty_index(next);
            let tentative = g_score[current_idx].saturating_add(step);
            if tentative >= g_score[next] {
                continue;
            }
            if let Some(stale) = open_entry[next].take() {
                open.remove(&stale);
            }
            g_score[next] = tentative;
            came_from[next] = Some(current_idx as u32);
            let h = manhattan(graph.pos_of(next), goal);
            let node = OpenNode { f: tentative.saturating_add(h), h, idx: next as u32 };
            open.insert(node);
            open_entry[next] = Some(node);
        }
    }

    PathResult { path: reconstruct_path(graph, &came_from, start_idx, goal_idx), explored }
}

/// BFS flood from `start` over non-wall nodes; the connectivity
/// validator checks enemy spawns against this set.
pub fn reachable_component(graph: &GridGraph, start: Pos) -> BTreeSet<Pos> {
    let mut component = BTreeSet::new();
    let Some(start_idx) = graph.index(start) else {
        return component;
    };
    if graph.is_wall_index(start_idx) {
        return component;
    }

    let cells = graph.cell_count();
    let mut visited = vec![false; cells];
    let mut queue = VecDeque::new();
    visited[start_idx] = true;
    component.insert(start);
    queue.push_back(start_idx);

    while let Some(current) = queue.pop_front() {
        for &next in neighbor_indices(graph, current) {
            let next = next as usize;
            if graph.is_wall_index(next) || visited[next] {
                continue;
            }
            visited[next] = true;
            component.insert(graph.pos_of(next));
            queue.push_back(next);
        }
    }

    component
}

/// A wall node expands to nothing, which also makes a wall start yield
/// an explored set of just itself.
fn neighbor_indices(graph: &GridGraph, index: usize) -> &[u32] {
    if graph.is_wall_index(index) { &[] } else { graph.adjacency_row(index) }
}

fn reconstruct_path(
    graph: &GridGraph,
    came_from: &[Option<u32>],
    start_idx: usize,
    goal_idx: usize,
) -> Vec<Pos> {
    if goal_idx != start_idx && came_from[goal_idx].is_none() {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut current = goal_idx;
    while current != start_idx {
        path.push(graph.pos_of(current));
        let Some(prev) = came_from[current] else {
            return Vec::new();
        };
        current = prev as usize;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn open_grid(rows: usize, cols: usize) -> GridGraph {
        GridGraph::new(rows, cols).expect("valid dimensions")
    }

    #[test]
    fn all_algorithms_return_chebyshev_length_paths_on_open_grid() {
        let graph = open_grid(8, 8);
        let start = Pos { y: 1, x: 1 };
        let goal = Pos { y: 6, x: 3 };
        let expected = chebyshev(start, goal) as usize;

        assert_eq!(bfs(&graph, start, goal).len(), expected);
        assert_eq!(dijkstra(&graph, start, goal).len(), expected);
        assert_eq!(astar(&graph, start, goal).len(), expected);
    }

    #[test]
    fn start_equals_goal_yields_empty_path() {
        let graph = open_grid(5, 5);
        let pos = Pos { y: 2, x: 2 };
        assert!(bfs(&graph, pos, pos).is_empty());
        assert!(dijkstra(&graph, pos, pos).is_empty());
        assert!(astar(&graph, pos, pos).is_empty());
    }

    #[test]
    fn out_of_bounds_endpoints_yield_empty_results() {
        let graph = open_grid(5, 5);
        let inside = Pos { y: 2, x: 2 };
        let outside = Pos { y: 9, x: 9 };

        for result in [
            bfs_with_tracking(&graph, outside, inside),
            bfs_with_tracking(&graph, inside, outside),
            dijkstra_with_tracking(&graph, outside, inside),
            astar_with_tracking(&graph, inside, outside),
        ] {
            assert!(result.path.is_empty());
            assert!(result.explored.is_empty());
        }
    }

    #[test]
    fn unreachable_goal_explores_exactly_the_start_component() {
        let mut graph = open_grid(5, 5);
        // Seal off the right column behind a full-height wall.
        for y in 0..5 {
            graph.set_wall(Pos { y, x: 3 }, true);
        }
        let start = Pos { y: 2, x: 0 };
        let goal = Pos { y: 2, x: 4 };
        let component = reachable_component(&graph, start);
        assert!(!component.contains(&goal));

        for result in [
            bfs_with_tracking(&graph, start, goal),
            dijkstra_with_tracking(&graph, start, goal),
            astar_with_tracking(&graph, start, goal),
        ] {
            assert!(result.path.is_empty());
            assert_eq!(result.explored, component);
        }
    }

    #[test]
    fn wall_start_explores_only_itself() {
        let mut graph = open_grid(4, 4);
        let start = Pos { y: 1, x: 1 };
        graph.set_wall(start, true);

        let result = bfs_with_tracking(&graph, start, Pos { y: 3, x: 3 });
        assert!(result.path.is_empty());
        assert_eq!(result.explored.len(), 1);
        assert!(result.explored.contains(&start));
    }

    #[test]
    fn path_excludes_start_and_ends_on_goal() {
        let graph = open_grid(4, 4);
        let start = Pos { y: 0, x: 0 };
        let goal = Pos { y: 3, x: 3 };
        let path = bfs(&graph, start, goal);
        assert_ne!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn bfs_routes_around_a_wall_line() {
        let mut graph = open_grid(5, 5);
        for y in 0..4 {
            graph.set_wall(Pos { y, x: 2 }, true);
        }
        let path = bfs(&graph, Pos { y: 0, x: 0 }, Pos { y: 0, x: 4 });
        assert!(!path.is_empty());
        assert!(path.iter().all(|&p| !graph.is_wall(p)));
        // Forced down to row 4 to round the wall line.
        assert!(path.iter().any(|p| p.y == 4));
    }

    #[test]
    fn weighted_searches_detour_around_penalized_cells() {
        // Two lanes between walled rows: the direct lane at row 1 is
        // penalized, the clean lane at row 3 is two hops longer and
        // only enters at the corridor ends.
        let mut graph = open_grid(4, 7);
        for x in 0..7 {
            graph.set_wall(Pos { y: 0, x }, true);
            graph.set_wall(Pos { y: 2, x }, true);
        }
        graph.set_wall(Pos { y: 2, x: 0 }, false);
        graph.set_wall(Pos { y: 2, x: 6 }, false);
        for x in 1..6 {
            graph.add_penalty(Pos { y: 1, x }, 10);
        }

        let start = Pos { y: 1, x: 0 };
        let goal = Pos { y: 1, x: 6 };

        for path in [dijkstra(&graph, start, goal), astar(&graph, start, goal)] {
            assert!(!path.is_empty());
            assert!(
                path.iter().any(|p| p.y == 3),
                "weighted search should take the clean lane, got {path:?}"
            );
        }
        // BFS is hop-count only and stays in the short lane.
        assert!(bfs(&graph, start, goal).iter().all(|p| p.y == 1));
    }

    #[test]
    fn tie_breaks_follow_canonical_order() {
        // Diagonal moves cost the same as straight ones, so several
        // shortest paths exist; the canonical adjacency order makes the
        // frontier prefer the lowest row-major step first.
        let graph = open_grid(4, 4);
        let path = bfs(&graph, Pos { y: 2, x: 2 }, Pos { y: 0, x: 0 });
        assert_eq!(path, vec![Pos { y: 1, x: 1 }, Pos { y: 0, x: 0 }]);
    }

    #[test]
    fn dijkstra_matches_bfs_hop_count_without_penalties() {
        let mut graph = open_grid(6, 6);
        graph.set_wall(Pos { y: 2, x: 2 }, true);
        graph.set_wall(Pos { y: 3, x: 2 }, true);
        let start = Pos { y: 0, x: 0 };
        let goal = Pos { y: 5, x: 5 };
        assert_eq!(bfs(&graph, start, goal).len(), dijkstra(&graph, start, goal).len());
    }

    #[test]
    fn reachable_component_from_wall_or_outside_is_empty() {
        let mut graph = open_grid(3, 3);
        let wall = Pos { y: 1, x: 1 };
        graph.set_wall(wall, true);
        assert!(reachable_component(&graph, wall).is_empty());
        assert!(reachable_component(&graph, Pos { y: 5, x: 5 }).is_empty());
    }

    proptest! {
        #[test]
        fn open_grid_paths_always_have_chebyshev_length(
            sy in 0i32..9, sx in 0i32..9, gy in 0i32..9, gx in 0i32..9,
        ) {
            let graph = open_grid(9, 9);
            let start = Pos { y: sy, x: sx };
            let goal = Pos { y: gy, x: gx };
            let expected = chebyshev(start, goal) as usize;

            prop_assert_eq!(bfs(&graph, start, goal).len(), expected);
            prop_assert_eq!(dijkstra(&graph, start, goal).len(), expected);
            prop_assert_eq!(astar(&graph, start, goal).len(), expected);
        }
    }
}
