//! The pursuing agent: position, assigned behavior, cached path, and
//! activation gating. An enemy is Idle (empty path) or Pursuing
//! (non-empty cached path); `update_path` transitions between the two
//! every tick and `step` consumes exactly one node.

use std::collections::{BTreeSet, VecDeque};

use crate::behavior::{Behavior, find_path_with_tracking};
use crate::grid::GridGraph;
use crate::search;
use crate::types::{EnemyId, Pos};

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pos: Pos,
    behavior: Behavior,
    path: VecDeque<Pos>,
    last_explored: BTreeSet<Pos>,
    activation_range: Option<u32>,
}

impl Enemy {
    pub fn new(pos: Pos, behavior: Behavior) -> Self {
        let activation_range = behavior.activation_range();
        Self {
            id: EnemyId::default(),
            pos,
            behavior,
            path: VecDeque::new(),
            last_explored: BTreeSet::new(),
            activation_range,
        }
    }

    /// Places an enemy on the first open candidate position, falling
    /// back to a row-major scan of the whole grid, and as a last resort
    /// forcing the origin open. Always succeeds.
    pub fn spawn(graph: &mut GridGraph, behavior: Behavior, candidates: &[Pos]) -> Self {
        let spot = candidates
            .iter()
            .copied()
            .find(|&c| graph.contains(c) && !graph.is_wall(c))
            .or_else(|| graph.positions().find(|&p| !graph.is_wall(p)));

        let pos = match spot {
            Some(pos) => pos,
            None => {
                let origin = Pos { y: 0, x: 0 };
                graph.set_wall(origin, false);
                origin
            }
        };
        Self::new(pos, behavior)
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Installs a behavior and its activation gate: Lazy enemies only
    /// chase within range 5, any other assignment removes the gate.
    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.activation_range = behavior.activation_range();
        self.behavior = behavior;
    }

    pub fn activation_range(&self) -> Option<u32> {
        self.activation_range
    }

    pub fn current_path(&self) -> impl Iterator<Item = Pos> + '_ {
        self.path.iter().copied()
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Explored nodes from the last tracking-aware refresh; empty after
    /// a plain `update_path`.
    pub fn last_explored(&self) -> &BTreeSet<Pos> {
        &self.last_explored
    }

    /// Per-tick path refresh. Clears to Idle when there is no target,
    /// when the enemy's own position is off the graph, or when the
    /// target sits beyond a finite activation range. The plain-path
    /// behavior API carries no exploration data, so diagnostics clear
    /// on every refresh here.
    pub fn update_path(&mut self, graph: &GridGraph, target: Option<Pos>) {
        let Some(target) = target else {
            self.clear();
            return;
        };
        if !self.target_in_range(graph, target) {
            self.clear();
            return;
        }

        self.path = self.behavior.calculate_path(graph, self.pos, target).into();
        self.last_explored.clear();
    }

    /// Tracking-aware variant for diagnostics: same gating, but routes
    /// through the behavior's algorithm dispatch and keeps the explored
    /// set. Does not advance Hunter's observation history.
    pub fn update_path_with_tracking(&mut self, graph: &GridGraph, target: Option<Pos>) {
        let Some(target) = target else {
            self.clear();
            return;
        };
        if !self.target_in_range(graph, target) {
            self.clear();
            return;
        }

        let result = find_path_with_tracking(&self.behavior, graph, self.pos, target);
        self.path = result.path.into();
        self.last_explored = result.explored;
    }

    /// Consumes one cached step, snapping the position to it. Safe only
    /// because the path is recomputed against the current position at
    /// least once per tick.
    pub fn step(&mut self) {
        if let Some(next) = self.path.pop_front() {
            self.pos = next;
        }
    }

    fn target_in_range(&self, graph: &GridGraph, target: Pos) -> bool {
        if !graph.contains(self.pos) {
            return false;
        }
        match self.activation_range {
            Some(range) => search::manhattan(self.pos, target) <= range,
            None => true,
        }
    }

    fn clear(&mut self) {
        self.path.clear();
        self.last_explored.clear();
    }
}
