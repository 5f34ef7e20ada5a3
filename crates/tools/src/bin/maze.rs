//! Maze layout collaborator: generates seeded random wall layouts,
//! round-trips them through the one-char-per-cell text format, and
//! reports the core's connectivity verdict on imported layouts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use game_core::{ChaseGame, Difficulty, GameMode, GridGraph, LogEvent, Pos};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a random wall layout and write it out
    Gen {
        #[arg(long, default_value_t = 15)]
        rows: usize,
        #[arg(long, default_value_t = 15)]
        cols: usize,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Wall probability per cell, in percent
        #[arg(short, long, default_value_t = 25)]
        density: u32,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Load a layout and report whether the core accepts it
    Check {
        path: PathBuf,
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        cols: usize,
    },
}

fn main() -> Result<()> {
    match Args::parse().command {
        Command::Gen { rows, cols, seed, density, out } => {
            let graph = generate_layout(rows, cols, seed, density)?;
            fs::write(&out, encode_layout(&graph))
                .with_context(|| format!("Failed to write layout to {}", out.display()))?;
            let walls = graph.positions().filter(|&p| graph.is_wall(p)).count();
            println!("Wrote {rows}x{cols} layout with {walls} walls to {}", out.display());
            report_verdict(graph)
        }
        Command::Check { path, rows, cols } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read layout from {}", path.display()))?;
            let graph = decode_layout(&text, rows, cols)?;
            report_verdict(graph)
        }
    }
}

/// Installs the layout into a fresh game and prints whether the
/// connectivity validator kept or replaced it.
fn report_verdict(graph: GridGraph) -> Result<()> {
    let rows = graph.rows();
    let cols = graph.cols();
    let mut game = ChaseGame::new(rows, cols, Difficulty::Hard, GameMode::Chase)
        .map_err(|e| anyhow::anyhow!("Core rejected dimensions: {e:?}"))?;
    game.install_graph(graph)
        .map_err(|e| anyhow::anyhow!("Graph installation failed: {e:?}"))?;

    let rejected = game
        .log()
        .iter()
        .find_map(|event| match event {
            LogEvent::GraphRejected { unreachable_enemy } => Some(*unreachable_enemy),
            _ => None,
        });
    match rejected {
        Some(pos) => println!("Verdict: rejected (enemy at ({}, {}) unreachable)", pos.y, pos.x),
        None => println!("Verdict: accepted"),
    }
    Ok(())
}

fn generate_layout(rows: usize, cols: usize, seed: u64, density: u32) -> Result<GridGraph> {
    if density > 100 {
        bail!("density must be 0-100, got {density}");
    }
    let mut graph = GridGraph::new(rows, cols)
        .map_err(|e| anyhow::anyhow!("Invalid dimensions {rows}x{cols}: {e:?}"))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for pos in graph.positions().collect::<Vec<_>>() {
        if rng.next_u32() % 100 < density {
            graph.set_wall(pos, true);
        }
    }
    // Keep the player's corner usable regardless of density.
    graph.set_wall(Pos { y: 0, x: 0 }, false);
    Ok(graph)
}

/// One character per cell, `'1'` wall, `'0'` open, row-major with one
/// line per row.
fn encode_layout(graph: &GridGraph) -> String {
    let mut text = String::with_capacity(graph.rows() * (graph.cols() + 1));
    for y in 0..graph.rows() as i32 {
        for x in 0..graph.cols() as i32 {
            text.push(if graph.is_wall(Pos { y, x }) { '1' } else { '0' });
        }
        text.push('\n');
    }
    text
}

fn decode_layout(text: &str, rows: usize, cols: usize) -> Result<GridGraph> {
    let mut graph = GridGraph::new(rows, cols)
        .map_err(|e| anyhow::anyhow!("Invalid dimensions {rows}x{cols}: {e:?}"))?;
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != rows {
        bail!("expected {rows} rows, found {}", lines.len());
    }
    for (y, line) in lines.iter().enumerate() {
        if line.chars().count() != cols {
            bail!("row {y}: expected {cols} cells, found {}", line.chars().count());
        }
        for (x, cell) in line.chars().enumerate() {
            match cell {
                '1' => graph.set_wall(Pos { y: y as i32, x: x as i32 }, true),
                '0' => {}
                other => bail!("row {y}, col {x}: invalid cell {other:?}"),
            }
        }
    }
    Ok(graph)
}
