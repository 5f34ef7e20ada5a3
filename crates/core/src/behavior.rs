//! Pursuit strategies. The behavior set is closed and small, so it is a
//! tagged enum dispatched by `match` rather than trait objects; the one
//! stateful variant (Hunter) carries its own last-seen coordinates and
//! must therefore be instantiated per enemy, never shared.

use crate::grid::GridGraph;
use crate::search::{self, PathResult};
use crate::types::Pos;

/// Extra step cost layered onto every open cell adjacent to a wall by
/// the Cautious strategy.
const WALL_PENALTY: u32 = 5;

/// Manhattan radius inside which a Lazy enemy bothers to chase.
pub const LAZY_ACTIVATION_RANGE: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Shortest hop-count pursuit via BFS.
    Default,
    /// A* straight at the target.
    Aggressive,
    /// A* over a derived graph that penalizes cells hugging walls.
    Cautious,
    /// A* at a linear extrapolation of the target's movement.
    Hunter { last_seen: Option<Pos> },
    /// BFS, but only when the target is close; otherwise stays put.
    Lazy,
    /// Uniform-cost pursuit via Dijkstra.
    Methodical,
}

impl Behavior {
    pub fn hunter() -> Self {
        Behavior::Hunter { last_seen: None }
    }

    /// Computes the path this strategy wants to follow. May remap the
    /// target (Hunter) or penalize a derived graph (Cautious) before
    /// delegating to the search engine. An empty path means "do not
    /// move this tick" and is a normal outcome.
    pub fn calculate_path(&mut self, graph: &GridGraph, start: Pos, target: Pos) -> Vec<Pos> {
        match self {
            Behavior::Default => search::bfs(graph, start, target),
            Behavior::Aggressive => search::astar(graph, start, target),
            Behavior::Methodical => search::dijkstra(graph, start, target),
            Behavior::Cautious => {
                let derived = penalized_copy(graph);
                search::astar(&derived, start, target)
            }
            Behavior::Hunter { last_seen } => {
                let predicted = last_seen.map(|last| Pos {
                    y: target.y + (target.y - last.y),
                    x: target.x + (target.x - last.x),
                });
                *last_seen = Some(target);

                if let Some(predicted) = predicted
                    && graph.contains(predicted)
                    && !graph.is_wall(predicted)
                {
                    return search::astar(graph, start, predicted);
                }
                search::astar(graph, start, target)
            }
            Behavior::Lazy => {
                if search::manhattan(start, target) <= LAZY_ACTIVATION_RANGE {
                    search::bfs(graph, start, target)
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Human-readable label for the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Behavior::Default => "Default",
            Behavior::Aggressive => "Aggressive",
            Behavior::Cautious => "Cautious",
            Behavior::Hunter { .. } => "Hunter",
            Behavior::Lazy => "Lazy",
            Behavior::Methodical => "Methodical",
        }
    }

    /// Assigning a behavior couples the enemy's activation gate to it:
    /// Lazy gates at its chase radius, everything else is unbounded.
    pub fn activation_range(&self) -> Option<u32> {
        match self {
            Behavior::Lazy => Some(LAZY_ACTIVATION_RANGE),
            _ => None,
        }
    }
}

/// Tracking-aware dispatch for diagnostics: the A*-driven strategies
/// are visualized with A*, everything else with BFS, always against the
/// true target. Pursuit itself goes through [`Behavior::calculate_path`].
pub fn find_path_with_tracking(
    behavior: &Behavior,
    graph: &GridGraph,
    start: Pos,
    goal: Pos,
) -> PathResult {
    match behavior {
        Behavior::Aggressive | Behavior::Hunter { .. } => {
            search::astar_with_tracking(graph, start, goal)
        }
        _ => search::bfs_with_tracking(graph, start, goal),
    }
}

/// Deep copy of the graph with a fresh danger-zone overlay: every
/// non-wall geometric neighbor of a wall gains [`WALL_PENALTY`], once
/// per adjacent wall. Rebuilt on every Cautious call so the penalties
/// always reflect the current wall layout.
fn penalized_copy(graph: &GridGraph) -> GridGraph {
    let mut derived = graph.clone();
    derived.clear_penalties();
    for wall in graph.positions().filter(|&p| graph.is_wall(p)) {
        for adjacent in graph.adjacent(wall) {
            if !graph.is_wall(adjacent) {
                derived.add_penalty(adjacent, WALL_PENALTY);
            }
        }
    }
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(rows: usize, cols: usize) -> GridGraph {
        GridGraph::new(rows, cols).expect("valid dimensions")
    }

    #[test]
    fn default_matches_bfs_and_aggressive_matches_astar() {
        let mut graph = open_grid(6, 6);
        graph.set_wall(Pos { y: 2, x: 2 }, true);
        let start = Pos { y: 0, x: 0 };
        let target = Pos { y: 5, x: 5 };

        assert_eq!(
            Behavior::Default.calculate_path(&graph, start, target),
            search::bfs(&graph, start, target)
        );
        assert_eq!(
            Behavior::Aggressive.calculate_path(&graph, start, target),
            search::astar(&graph, start, target)
        );
        assert_eq!(
            Behavior::Methodical.calculate_path(&graph, start, target),
            search::dijkstra(&graph, start, target)
        );
    }

    #[test]
    fn hunter_predicts_one_step_beyond_a_moving_target() {
        let graph = open_grid(8, 8);
        let mut hunter = Behavior::hunter();
        let start = Pos { y: 7, x: 7 };

        // First observation: no history, chases the true target.
        let first = hunter.calculate_path(&graph, start, Pos { y: 2, x: 2 });
        assert_eq!(first.last(), Some(&Pos { y: 2, x: 2 }));

        // Target moved +1 col; prediction is one further column over.
        let second = hunter.calculate_path(&graph, start, Pos { y: 2, x: 3 });
        assert_eq!(second.last(), Some(&Pos { y: 2, x: 4 }));

        let third = hunter.calculate_path(&graph, start, Pos { y: 2, x: 4 });
        assert_eq!(third.last(), Some(&Pos { y: 2, x: 5 }));
    }

    #[test]
    fn hunter_falls_back_to_true_target_when_prediction_is_walled() {
        let mut graph = open_grid(8, 8);
        graph.set_wall(Pos { y: 2, x: 5 }, true);
        let mut hunter = Behavior::hunter();
        let start = Pos { y: 7, x: 7 };

        hunter.calculate_path(&graph, start, Pos { y: 2, x: 3 });
        let path = hunter.calculate_path(&graph, start, Pos { y: 2, x: 4 });
        assert_eq!(path.last(), Some(&Pos { y: 2, x: 4 }));
    }

    #[test]
    fn hunter_falls_back_when_prediction_leaves_the_grid() {
        let graph = open_grid(5, 5);
        let mut hunter = Behavior::hunter();
        let start = Pos { y: 4, x: 0 };

        hunter.calculate_path(&graph, start, Pos { y: 0, x: 3 });
        // Moving +1 col from x=4 predicts x=5, outside the grid.
        let path = hunter.calculate_path(&graph, start, Pos { y: 0, x: 4 });
        assert_eq!(path.last(), Some(&Pos { y: 0, x: 4 }));
    }

    #[test]
    fn hunter_state_is_per_instance() {
        let graph = open_grid(8, 8);
        let start = Pos { y: 7, x: 7 };

        let mut seasoned = Behavior::hunter();
        seasoned.calculate_path(&graph, start, Pos { y: 2, x: 2 });

        // A fresh hunter has no history and must not predict.
        let mut fresh = Behavior::hunter();
        let path = fresh.calculate_path(&graph, start, Pos { y: 2, x: 3 });
        assert_eq!(path.last(), Some(&Pos { y: 2, x: 3 }));
    }

    #[test]
    fn lazy_ignores_distant_targets_and_chases_close_ones() {
        let graph = open_grid(12, 12);
        let start = Pos { y: 0, x: 0 };

        assert!(Behavior::Lazy.calculate_path(&graph, start, Pos { y: 0, x: 10 }).is_empty());

        let close = Behavior::Lazy.calculate_path(&graph, start, Pos { y: 0, x: 4 });
        assert_eq!(close, search::bfs(&graph, start, Pos { y: 0, x: 4 }));
        assert!(!close.is_empty());
    }

    #[test]
    fn cautious_detours_around_wall_hugging_cells() {
        // Walled corridor at row 1 versus an open lane at row 3; the
        // corridor is shorter but every cell in it touches walls.
        let mut graph = open_grid(5, 7);
        for x in 0..7 {
            graph.set_wall(Pos { y: 0, x }, true);
            graph.set_wall(Pos { y: 2, x }, true);
        }
        graph.set_wall(Pos { y: 2, x: 0 }, false);
        graph.set_wall(Pos { y: 2, x: 6 }, false);

        let start = Pos { y: 1, x: 0 };
        let target = Pos { y: 1, x: 6 };

        let bold = Behavior::Aggressive.calculate_path(&graph, start, target);
        assert!(bold.iter().all(|p| p.y <= 1), "A* takes the short corridor, got {bold:?}");

        let wary = Behavior::Cautious.calculate_path(&graph, start, target);
        assert!(!wary.is_empty());
        assert!(
            wary.iter().any(|p| p.y >= 3),
            "Cautious should avoid the walled corridor, got {wary:?}"
        );
    }

    #[test]
    fn cautious_never_mutates_the_source_graph() {
        let mut graph = open_grid(5, 5);
        graph.set_wall(Pos { y: 2, x: 2 }, true);

        Behavior::Cautious.calculate_path(&graph, Pos { y: 0, x: 0 }, Pos { y: 4, x: 4 });

        for pos in graph.positions() {
            assert_eq!(graph.penalty(pos), 0);
        }
    }

    #[test]
    fn labels_and_activation_ranges() {
        assert_eq!(Behavior::hunter().label(), "Hunter");
        assert_eq!(Behavior::Lazy.label(), "Lazy");
        assert_eq!(Behavior::Lazy.activation_range(), Some(LAZY_ACTIVATION_RANGE));
        assert_eq!(Behavior::Aggressive.activation_range(), None);
        assert_eq!(Behavior::Methodical.activation_range(), None);
    }
}
