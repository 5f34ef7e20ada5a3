pub mod behavior;
pub mod enemy;
pub mod game;
pub mod grid;
pub mod journal;
pub mod replay;
pub mod search;
pub mod types;

pub use behavior::Behavior;
pub use enemy::Enemy;
pub use game::{ChaseGame, DEFAULT_TIME_TRIAL_TICKS};
pub use grid::GridGraph;
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use replay::*;
pub use search::PathResult;
pub use types::*;
