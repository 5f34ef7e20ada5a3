//! The chase orchestrator: owns the graph and every enemy, advances the
//! pursuit one tick at a time, and evaluates termination. Single
//! threaded and tick driven; the player's move and the enemies' moves
//! never interleave mid-computation.

use slotmap::SlotMap;

use crate::behavior::Behavior;
use crate::enemy::Enemy;
use crate::grid::GridGraph;
use crate::search::reachable_component;
use crate::types::{
    Difficulty, EnemyId, GameError, GameMode, LogEvent, Pos, RejectReason, RunOutcome,
};

pub const DEFAULT_TIME_TRIAL_TICKS: u64 = 120;

#[derive(Debug)]
pub struct ChaseGame {
    graph: GridGraph,
    player: Pos,
    enemies: SlotMap<EnemyId, Enemy>,
    difficulty: Difficulty,
    mode: GameMode,
    exit: Option<Pos>,
    tick: u64,
    time_trial_ticks: u64,
    outcome: Option<RunOutcome>,
    log: Vec<LogEvent>,
}

impl ChaseGame {
    pub fn new(
        rows: usize,
        cols: usize,
        difficulty: Difficulty,
        mode: GameMode,
    ) -> Result<Self, GameError> {
        let graph = GridGraph::new(rows, cols)?;
        let mut game = Self {
            graph,
            player: Pos { y: 0, x: 0 },
            enemies: SlotMap::with_key(),
            difficulty,
            mode,
            exit: None,
            tick: 0,
            time_trial_ticks: DEFAULT_TIME_TRIAL_TICKS,
            outcome: None,
            log: Vec::new(),
        };
        game.exit = game.exit_for_mode();
        game.respawn_enemies();
        Ok(game)
    }

    /// Advances the pursuit by one tick: every enemy refreshes its path
    /// against the player's current node and consumes one step, then
    /// termination is evaluated. No-op once the run is terminal.
    pub fn advance_tick(&mut self) -> Option<RunOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let target = Some(self.player);
        for enemy in self.enemies.values_mut() {
            enemy.update_path(&self.graph, target);
            enemy.step();
        }

        self.tick += 1;
        self.check_conditions();
        self.outcome
    }

    /// Repositions the player. Rejected silently (with a log event)
    /// when the run is over, the target is out of bounds, or the target
    /// is a wall.
    pub fn move_player(&mut self, target: Pos) {
        if self.outcome.is_some() {
            self.log.push(LogEvent::MoveRejected { target, reason: RejectReason::GameOver });
            return;
        }
        if !self.graph.contains(target) {
            self.log.push(LogEvent::MoveRejected { target, reason: RejectReason::OutOfBounds });
            return;
        }
        if self.graph.is_wall(target) {
            self.log.push(LogEvent::MoveRejected { target, reason: RejectReason::Wall });
            return;
        }

        self.player = target;
        self.check_conditions();
    }

    /// Flips the wall state of a cell. The player's and enemies'
    /// occupied cells cannot be walled in.
    pub fn toggle_wall(&mut self, target: Pos) {
        if !self.graph.contains(target) {
            self.log
                .push(LogEvent::WallToggleRejected { target, reason: RejectReason::OutOfBounds });
            return;
        }
        if target == self.player || self.enemies.values().any(|enemy| enemy.pos() == target) {
            self.log.push(LogEvent::WallToggleRejected { target, reason: RejectReason::Occupied });
            return;
        }

        let present = self.graph.is_wall(target);
        self.graph.set_wall(target, !present);
    }

    /// Installs an externally built graph of matching dimensions,
    /// repositions the player and enemies, then validates that every
    /// enemy can reach the player. An unconnected graph is discarded
    /// and replaced with a fully open grid of the same dimensions.
    pub fn install_graph(&mut self, graph: GridGraph) -> Result<(), GameError> {
        if graph.rows() != self.graph.rows() || graph.cols() != self.graph.cols() {
            return Err(GameError::DimensionMismatch);
        }

        self.graph = graph;
        self.tick = 0;
        self.outcome = None;
        self.place_player();
        self.respawn_enemies();

        let reachable = reachable_component(&self.graph, self.player);
        let stranded =
            self.enemies.values().map(Enemy::pos).find(|pos| !reachable.contains(pos));
        if let Some(pos) = stranded {
            self.log.push(LogEvent::GraphRejected { unreachable_enemy: pos });
            self.graph = self.fresh_graph();
            self.player = Pos { y: 0, x: 0 };
            self.respawn_enemies();
        }
        Ok(())
    }

    /// Rebuilds the run from scratch on a fully open grid of the same
    /// dimensions. Enemies are recreated wholesale, never mutated
    /// across resets.
    pub fn reset(&mut self) {
        self.graph = self.fresh_graph();
        self.player = Pos { y: 0, x: 0 };
        self.tick = 0;
        self.outcome = None;
        self.exit = self.exit_for_mode();
        self.respawn_enemies();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reset();
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn set_time_trial_ticks(&mut self, ticks: u64) {
        self.time_trial_ticks = ticks;
    }

    pub fn set_enemy_behavior(&mut self, id: EnemyId, behavior: Behavior) {
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.set_behavior(behavior);
        }
    }

    /// Tracking-aware path refresh for one enemy, populating its
    /// explored set for visualization.
    pub fn refresh_enemy_tracking(&mut self, id: EnemyId) {
        let target = Some(self.player);
        if let Some(enemy) = self.enemies.get_mut(id) {
            enemy.update_path_with_tracking(&self.graph, target);
        }
    }

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn enemies(&self) -> &SlotMap<EnemyId, Enemy> {
        &self.enemies
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn exit(&self) -> Option<Pos> {
        self.exit
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn remaining_time_trial_ticks(&self) -> u64 {
        match self.mode {
            GameMode::TimeTrial => self.time_trial_ticks.saturating_sub(self.tick),
            _ => 0,
        }
    }

    /// Canonical state digest for replay-equivalence checks.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.tick);
        hasher.write_i32(self.player.y);
        hasher.write_i32(self.player.x);
        hasher.write_u8(self.outcome.map_or(0, |outcome| outcome as u8 + 1));

        for pos in self.graph.positions() {
            hasher.write_u8(self.graph.is_wall(pos) as u8);
        }
        for enemy in self.enemies.values() {
            hasher.write_i32(enemy.pos().y);
            hasher.write_i32(enemy.pos().x);
            hasher.write(enemy.behavior().label().as_bytes());
            hasher.write_u64(enemy.path_len() as u64);
        }
        hasher.finish()
    }

    fn check_conditions(&mut self) {
        let captured = self.enemies.iter().find(|(_, enemy)| enemy.pos() == self.player);
        if let Some((id, _)) = captured {
            self.outcome = Some(RunOutcome::Defeat);
            self.log.push(LogEvent::PlayerCaptured { enemy: id });
            return;
        }

        match self.mode {
            GameMode::Escape => {
                if self.exit == Some(self.player) {
                    self.outcome = Some(RunOutcome::Victory);
                    self.log.push(LogEvent::PlayerEscaped { exit: self.player });
                }
            }
            GameMode::TimeTrial => {
                if self.tick >= self.time_trial_ticks {
                    self.outcome = Some(RunOutcome::Victory);
                    self.log.push(LogEvent::TimeTrialSurvived { ticks: self.tick });
                }
            }
            GameMode::Chase => {}
        }
    }

    /// The difficulty roster: one BFS pursuer, then a Dijkstra pursuer,
    /// then an A* pursuer, preferring the bottom-right corner, the
    /// bottom-left corner, and the center respectively.
    fn roster(&self) -> Vec<(Behavior, Pos)> {
        let rows = self.graph.rows() as i32;
        let cols = self.graph.cols() as i32;
        let bottom_right = Pos { y: rows - 1, x: cols - 1 };
        let bottom_left = Pos { y: rows - 1, x: 0 };
        let center = Pos { y: rows / 2, x: cols / 2 };

        let mut roster = vec![(Behavior::Default, bottom_right)];
        if matches!(self.difficulty, Difficulty::Medium | Difficulty::Hard) {
            roster.push((Behavior::Methodical, bottom_left));
        }
        if matches!(self.difficulty, Difficulty::Hard) {
            roster.push((Behavior::Aggressive, center));
        }
        roster
    }

    fn respawn_enemies(&mut self) {
        self.enemies = SlotMap::with_key();
        for (behavior, preferred) in self.roster() {
            let enemy = Enemy::spawn(&mut self.graph, behavior, &[preferred]);
            let id = self.enemies.insert(enemy);
            self.enemies[id].id = id;
        }
    }

    /// Origin, else the first open cell row-major, else the origin
    /// forced open.
    fn place_player(&mut self) {
        let origin = Pos { y: 0, x: 0 };
        if !self.graph.is_wall(origin) {
            self.player = origin;
            return;
        }
        if let Some(open) = self.graph.positions().find(|&pos| !self.graph.is_wall(pos)) {
            self.player = open;
            return;
        }
        self.graph.set_wall(origin, false);
        self.player = origin;
    }

    fn fresh_graph(&self) -> GridGraph {
        GridGraph::new(self.graph.rows(), self.graph.cols())
            .expect("dimensions were validated at construction")
    }

    fn exit_for_mode(&self) -> Option<Pos> {
        match self.mode {
            GameMode::Escape => Some(Pos {
                y: self.graph.rows() as i32 - 1,
                x: self.graph.cols() as i32 - 1,
            }),
            _ => None,
        }
    }
}
