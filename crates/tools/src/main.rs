use anyhow::{Context, Result};
use clap::Parser;
use game_core::{InputJournal, ReplayResult, replay::replay_to_end};
use std::fs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: String,

    /// Tick budget for runs that never reach a terminal outcome
    #[arg(short, long, default_value_t = 10_000)]
    max_ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let journal_data = fs::read_to_string(&args.journal)
        .with_context(|| format!("Failed to read journal file: {}", args.journal))?;
    let journal: InputJournal =
        serde_json::from_str(&journal_data).with_context(|| "Failed to deserialize journal JSON")?;

    let result: ReplayResult = replay_to_end(&journal, args.max_ticks)
        .map_err(|e| anyhow::anyhow!("Replay failed during execution: {:?}", e))?;

    println!("Replay complete.");
    println!("Final Tick: {}", result.final_tick);
    match result.outcome {
        Some(outcome) => println!("Outcome: {outcome:?}"),
        None => println!("Outcome: none (tick budget exhausted)"),
    }
    println!("Snapshot Hash: {}", result.final_snapshot_hash);

    Ok(())
}
