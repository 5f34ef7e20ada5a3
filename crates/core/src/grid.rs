//! Grid-graph topology: node arena, 8-directional adjacency, wall state.
//! This module exists so topology queries stay cheap while walls toggle freely.
//! It does not own search state or any per-tick gameplay logic.

use crate::types::{GameError, Pos};

/// Canonical neighbor order: upper row left-to-right, then same row,
/// then lower row. Search determinism depends on this order staying fixed.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An 8-connected rows x cols grid. Adjacency is computed once from
/// geometry at construction; walls are a view filter applied at query
/// time, so toggling a wall is O(1) and never touches the adjacency
/// table. Each node also carries an extra-cost penalty (default 0)
/// charged by the weighted searches, used by derived "danger zone"
/// graphs.
#[derive(Clone, Debug)]
pub struct GridGraph {
    rows: usize,
    cols: usize,
    adjacency: Vec<Vec<u32>>,
    walls: Vec<bool>,
    penalties: Vec<u32>,
}

impl GridGraph {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        if rows == 0 || cols == 0 {
            return Err(GameError::ZeroDimensions);
        }

        let cell_count = rows * cols;
        let mut adjacency = Vec::with_capacity(cell_count);
        for y in 0..rows as i32 {
            for x in 0..cols as i32 {
                let mut entries = Vec::with_capacity(8);
                for (dy, dx) in DIRECTIONS {
                    let ny = y + dy;
                    let nx = x + dx;
                    if ny >= 0 && nx >= 0 && (ny as usize) < rows && (nx as usize) < cols {
                        entries.push(ny as u32 * cols as u32 + nx as u32);
                    }
                }
                adjacency.push(entries);
            }
        }

        Ok(Self {
            rows,
            cols,
            adjacency,
            walls: vec![false; cell_count],
            penalties: vec![0; cell_count],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.y >= 0
            && pos.x >= 0
            && (pos.y as usize) < self.rows
            && (pos.x as usize) < self.cols
    }

    pub(crate) fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| (pos.y as usize) * self.cols + (pos.x as usize))
    }

    pub(crate) fn pos_of(&self, index: usize) -> Pos {
        Pos { y: (index / self.cols) as i32, x: (index % self.cols) as i32 }
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.index(pos).is_some_and(|idx| self.walls[idx])
    }

    pub(crate) fn is_wall_index(&self, index: usize) -> bool {
        self.walls[index]
    }

    /// Idempotent wall toggle; out-of-bounds positions are ignored.
    pub fn set_wall(&mut self, pos: Pos, present: bool) {
        if let Some(idx) = self.index(pos) {
            self.walls[idx] = present;
        }
    }

    /// Adjacent non-wall nodes, in canonical order. Empty when `pos` is
    /// out of bounds or itself a wall: walls are impassable in both
    /// directions.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let Some(idx) = self.index(pos) else {
            return Vec::new();
        };
        if self.walls[idx] {
            return Vec::new();
        }
        self.adjacency[idx]
            .iter()
            .filter(|&&n| !self.walls[n as usize])
            .map(|&n| self.pos_of(n as usize))
            .collect()
    }

    /// Raw geometric adjacency, ignoring walls. Empty out of bounds.
    pub fn adjacent(&self, pos: Pos) -> Vec<Pos> {
        match self.index(pos) {
            Some(idx) => self.adjacency[idx].iter().map(|&n| self.pos_of(n as usize)).collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn adjacency_row(&self, index: usize) -> &[u32] {
        &self.adjacency[index]
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows * self.cols).map(|idx| self.pos_of(idx))
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn penalty(&self, pos: Pos) -> u32 {
        self.index(pos).map_or(0, |idx| self.penalties[idx])
    }

    pub(crate) fn penalty_index(&self, index: usize) -> u32 {
        self.penalties[index]
    }

    /// Accumulates onto any penalty already present. No-op out of bounds.
    pub fn add_penalty(&mut self, pos: Pos, cost: u32) {
        if let Some(idx) = self.index(pos) {
            self.penalties[idx] = self.penalties[idx].saturating_add(cost);
        }
    }

    pub fn clear_penalties(&mut self) {
        self.penalties.fill(0);
    }
}
