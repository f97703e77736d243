//! Error types for the solver

use thiserror::Error;

/// Why a board could not be built from its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidState {
    #[error("board has no tiles")]
    Empty,

    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("board is {rows}x{cols}, only square boards are supported")]
    NotSquare { rows: usize, cols: usize },

    #[error("board side {side} is larger than the supported maximum of {max}")]
    TooLarge { side: usize, max: usize },

    #[error("a {side}x{side} board needs {expected} tiles, got {got}")]
    WrongTileCount {
        side: usize,
        expected: usize,
        got: usize,
    },

    #[error("tile {tile} is out of range (must be 0-{max})")]
    TileOutOfRange { tile: usize, max: usize },

    #[error("tile {tile} appears more than once and tile {missing} is missing")]
    DuplicateTile { tile: u8, missing: u8 },

    #[error("cannot read '{token}' as a tile")]
    BadToken { token: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid board: {0}")]
    InvalidState(#[from] InvalidState),

    #[error("initial board is {initial}x{initial} but goal is {goal}x{goal}")]
    SizeMismatch { initial: usize, goal: usize },

    #[error("goal is unreachable: frontier exhausted after closing {closed} states")]
    Unreachable { closed: usize },

    #[error("search stopped after closing {limit} states without reaching the goal")]
    LimitReached { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
