use crate::game::ChaseGame;
use crate::journal::{InputJournal, InputPayload};
use crate::types::RunOutcome;

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    InvalidDimensions,
    OutOfOrderInput,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    /// `None` when the tick budget ran out before the run ended.
    pub outcome: Option<RunOutcome>,
    pub final_tick: u64,
    pub final_snapshot_hash: u64,
}

/// Re-runs a journal: inputs stamped for a tick are applied before that
/// tick advances, exactly as a live caller would issue them. Stops at a
/// terminal outcome or after `max_ticks`.
pub fn replay_to_end(journal: &InputJournal, max_ticks: u64) -> Result<ReplayResult, ReplayError> {
    let mut game = ChaseGame::new(journal.rows, journal.cols, journal.difficulty, journal.mode)
        .map_err(|_| ReplayError::InvalidDimensions)?;
    if let Some(ticks) = journal.time_trial_ticks {
        game.set_time_trial_ticks(ticks);
    }

    let mut inputs = journal.inputs.iter().peekable();
    loop {
        while let Some(record) = inputs.peek() {
            if record.tick < game.tick() {
                return Err(ReplayError::OutOfOrderInput);
            }
            if record.tick > game.tick() {
                break;
            }
            match record.payload {
                InputPayload::MovePlayer { target } => game.move_player(target),
                InputPayload::ToggleWall { target } => game.toggle_wall(target),
            }
            inputs.next();
        }

        if game.outcome().is_some() || game.tick() >= max_ticks {
            return Ok(ReplayResult {
                outcome: game.outcome(),
                final_tick: game.tick(),
                final_snapshot_hash: game.snapshot_hash(),
            });
        }
        game.advance_tick();
    }
}
