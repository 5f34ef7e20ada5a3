use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

/// Grid coordinates; `y` is the row, `x` is the column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// One BFS pursuer.
    Easy,
    /// BFS plus a Dijkstra pursuer.
    Medium,
    /// BFS, Dijkstra, and A* pursuers.
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// No win condition; the run only ends on capture.
    Chase,
    /// Reach the exit node at the bottom-right corner.
    Escape,
    /// Survive a configured number of ticks.
    TimeTrial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    ZeroDimensions,
    DimensionMismatch,
}

/// Diagnostic channel consumed by the presentation layer. Rejected
/// requests are recorded here instead of failing the tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    MoveRejected { target: Pos, reason: RejectReason },
    WallToggleRejected { target: Pos, reason: RejectReason },
    GraphRejected { unreachable_enemy: Pos },
    PlayerCaptured { enemy: EnemyId },
    PlayerEscaped { exit: Pos },
    TimeTrialSurvived { ticks: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    GameOver,
    OutOfBounds,
    Wall,
    Occupied,
}
