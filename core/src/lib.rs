//! # 2048 Board Engine
//!
//! The rules of 2048 on a fixed 4x4 board: sliding and merging tiles,
//! scoring, random tile spawning, terminal-state detection and a single
//! level of undo. The PRNG is seedable so whole games are reproducible.
//!
//! ## Example
//!
//! ```rust
//! use slide48_core::{Direction, Game};
//!
//! let mut game = Game::new(42);  // Create game with seed 42
//! let result = game.step(Direction::Left);
//! println!("Score: {}, Changed: {}", game.score(), result.changed);
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub mod scoreboard;

/// Board side length. The board is always 4x4.
pub const SIZE: usize = 4;

/// Reaching this tile triggers the one-time win notice. Play continues.
pub const WINNING_TILE: u16 = 2048;

/// The four possible move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Get all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}

/// Result of sliding a single line toward its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideResult {
    /// The line after compacting and merging, zero-padded to length 4.
    pub line: [u16; SIZE],
    /// Points earned from merges in this line.
    pub gain: u32,
    /// Whether the output differs from the input at any position.
    pub changed: bool,
}

/// Slide one line toward index 0, merging each adjacent equal pair once.
///
/// Algorithm:
/// 1. Compact: move all non-zero values to the front, preserving order
/// 2. Merge: combine adjacent equal values left to right; a tile produced
///    by a merge is skipped and never merges again in the same call
/// 3. Compact again to close the gaps merging left behind
///
/// Deterministic and direction-agnostic: the four board directions are
/// produced by presenting rows, columns, or their reversals to this one
/// routine.
pub fn slide_line(input: [u16; SIZE]) -> SlideResult {
    // Compact
    let mut dense = [0u16; SIZE];
    let mut len = 0;
    for v in input {
        if v != 0 {
            dense[len] = v;
            len += 1;
        }
    }

    // Merge, skipping past each merged pair
    let mut gain = 0u32;
    let mut i = 0;
    while i + 1 < len {
        if dense[i] == dense[i + 1] {
            dense[i] *= 2;
            gain += dense[i] as u32;
            dense[i + 1] = 0;
            i += 2;
        } else {
            i += 1;
        }
    }

    // Re-compact
    let mut line = [0u16; SIZE];
    let mut out = 0;
    for &v in dense.iter().take(len) {
        if v != 0 {
            line[out] = v;
            out += 1;
        }
    }

    SlideResult {
        line,
        gain,
        changed: line != input,
    }
}

/// Result of executing a step (move) in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the board changed (and a new tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub gain: u32,
}

/// The saved (board, score) pair backing the single level of undo.
#[derive(Clone, Copy)]
struct Snapshot {
    board: [u16; SIZE * SIZE],
    score: u32,
}

/// The 2048 game state.
///
/// The board is a flat array of 16 values in row-major order (indices 0-3
/// are row 0, 4-7 are row 1, etc.). Empty cells are 0; occupied cells hold
/// the tile value (2, 4, 8, ...).
#[derive(Clone)]
pub struct Game {
    board: [u16; SIZE * SIZE],
    score: u32,
    rng: SmallRng,
    snapshot: Option<Snapshot>,
}

impl Game {
    /// Create a new game with the given seed.
    ///
    /// The game starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        let mut game = Game {
            board: [0; SIZE * SIZE],
            score: 0,
            rng: SmallRng::seed_from_u64(seed),
            snapshot: None,
        };
        game.spawn_tile();
        game.spawn_tile();
        game
    }

    /// Execute a move in the given direction.
    ///
    /// A snapshot of (board, score) is taken before the attempt so the move
    /// can be undone. If the move changed the board, the merge gain is added
    /// to the score and one new tile is spawned. If nothing moved, score and
    /// board are untouched and the pending snapshot is cleared: there is
    /// nothing meaningful to undo back to.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        self.snapshot = Some(Snapshot {
            board: self.board,
            score: self.score,
        });

        let (changed, gain) = self.slide_board(direction);

        if changed {
            self.score += gain;
            self.spawn_tile();
        } else {
            self.snapshot = None;
        }

        StepResult { changed, gain }
    }

    /// Run the slide-merge primitive over every lane of the given direction,
    /// writing changed lanes back. Returns whether any lane changed and the
    /// total merge gain. Does not touch score, snapshot or the RNG.
    fn slide_board(&mut self, direction: Direction) -> (bool, u32) {
        let mut gain = 0;
        let mut changed = false;
        for lane in 0..SIZE {
            let mut line = [0u16; SIZE];
            for slot in 0..SIZE {
                line[slot] = self.board[cell_index(direction, lane, slot)];
            }
            let result = slide_line(line);
            if result.changed {
                changed = true;
                gain += result.gain;
                for slot in 0..SIZE {
                    self.board[cell_index(direction, lane, slot)] = result.line[slot];
                }
            }
        }
        (changed, gain)
    }

    /// Restore the board and score saved before the last successful move.
    ///
    /// Returns false when no snapshot is pending (nothing to undo). The
    /// snapshot is consumed: only one level of undo is ever available, so a
    /// second consecutive undo is a no-op.
    pub fn undo(&mut self) -> bool {
        match self.snapshot.take() {
            Some(snapshot) => {
                self.board = snapshot.board;
                self.score = snapshot.score;
                true
            }
            None => false,
        }
    }

    /// Check whether the game is lost: no empty cell and no two equal
    /// orthogonal neighbors. Reaching [`WINNING_TILE`] does not end play;
    /// this is the only game-ending condition.
    pub fn is_terminal(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let v = self.board[row * SIZE + col];
                if v == 0 {
                    return false;
                }
                if col + 1 < SIZE && self.board[row * SIZE + col + 1] == v {
                    return false;
                }
                if row + 1 < SIZE && self.board[(row + 1) * SIZE + col] == v {
                    return false;
                }
            }
        }
        true
    }

    /// Check whether any tile has reached `target` (normally
    /// [`WINNING_TILE`]). Used for the one-time celebration notice only.
    pub fn has_reached(&self, target: u16) -> bool {
        self.board.iter().any(|&v| v >= target)
    }

    /// Get a reference to the board array, in row-major order.
    pub fn board(&self) -> &[u16; SIZE * SIZE] {
        &self.board
    }

    /// Get the current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Get the maximum tile value on the board.
    pub fn max_tile(&self) -> u16 {
        *self.board.iter().max().unwrap_or(&0)
    }

    /// Get the number of empty cells on the board.
    pub fn empty_count(&self) -> usize {
        self.board.iter().filter(|&&v| v == 0).count()
    }

    /// Spawn a new tile in a random empty cell.
    /// 90% chance of 2, 10% chance of 4. No-op on a full board.
    fn spawn_tile(&mut self) {
        let empty_cells: Vec<usize> = self
            .board
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect();

        if empty_cells.is_empty() {
            return;
        }

        let idx = empty_cells[self.rng.gen_range(0..empty_cells.len())];
        let value = if self.rng.gen::<f32>() < 0.9 { 2 } else { 4 };
        self.board[idx] = value;
    }
}

/// Map a logical lane position to a flat board index.
///
/// `lane` selects the row (horizontal moves) or column (vertical moves);
/// `slot` 0 is the edge the tiles slide toward, so right and down lanes are
/// read and written in reverse order and [`slide_line`] always slides toward
/// the lane's logical start.
fn cell_index(direction: Direction, lane: usize, slot: usize) -> usize {
    match direction {
        Direction::Left => lane * SIZE + slot,
        Direction::Right => lane * SIZE + (SIZE - 1 - slot),
        Direction::Up => slot * SIZE + lane,
        Direction::Down => (SIZE - 1 - slot) * SIZE + lane,
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Game {{ score: {} }}", self.score)?;
        for row in 0..SIZE {
            for col in 0..SIZE {
                let val = self.board[row * SIZE + col];
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "+------+------+------+------+")?;
        for row in 0..SIZE {
            write!(f, "|")?;
            for col in 0..SIZE {
                let val = self.board[row * SIZE + col];
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
