use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, GameMode, Pos};

/// A recorded run: the construction parameters plus every player input,
/// stamped with the tick it was issued at. Replaying a journal against
/// the same build reproduces the run bit-for-bit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub rows: usize,
    pub cols: usize,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub time_trial_ticks: Option<u64>,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct InputRecord {
    pub tick: u64,
    pub payload: InputPayload,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum InputPayload {
    MovePlayer { target: Pos },
    ToggleWall { target: Pos },
}

impl InputJournal {
    pub fn new(rows: usize, cols: usize, difficulty: Difficulty, mode: GameMode) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            rows,
            cols,
            difficulty,
            mode,
            time_trial_ticks: None,
            inputs: Vec::new(),
        }
    }

    pub fn append_move(&mut self, tick: u64, target: Pos) {
        self.inputs.push(InputRecord { tick, payload: InputPayload::MovePlayer { target } });
    }

    pub fn append_toggle_wall(&mut self, tick: u64, target: Pos) {
        self.inputs.push(InputRecord { tick, payload: InputPayload::ToggleWall { target } });
    }
}
