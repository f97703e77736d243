//! A* solver for the 8-puzzle and its larger square siblings.
//!
//! ```no_run
//! use tile_slide::{solve, Board, Heuristic};
//!
//! let initial = tile_slide::parse_board("8 6 7\n2 5 4\n3 0 1")?;
//! let solution = solve(&initial, &Board::goal(3)?, Heuristic::Manhattan)?;
//! println!("{} moves, {} states closed", solution.len(), solution.stats.closed);
//! # Ok::<(), tile_slide::Error>(())
//! ```

pub mod board;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod scenario;
pub mod search;

pub use board::{parse_board, Action, Board, Direction};
pub use error::{Error, InvalidState, Result};
pub use heuristic::{GoalIndex, Heuristic};
pub use scenario::Scenario;
pub use search::{solve, SearchOptions, SearchStats, Solution, Solver};
