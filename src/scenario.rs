use serde::Serialize;

use crate::{board::Board, error::InvalidState};

/// Fixed 3x3 starting boards of increasing difficulty, all solved towards
/// `Board::goal(3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Two moves from the goal.
    Easy,
    /// Four moves from the goal.
    Medium,
    /// One of the two 8-puzzle positions farthest from the goal (31 moves).
    Hard,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Easy, Scenario::Medium, Scenario::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Easy => "easy",
            Scenario::Medium => "medium",
            Scenario::Hard => "hard",
        }
    }

    fn tiles(self) -> [u8; 9] {
        match self {
            Scenario::Easy => [1, 2, 3, 4, 5, 6, 0, 7, 8],
            Scenario::Medium => [1, 3, 0, 4, 2, 5, 7, 8, 6],
            Scenario::Hard => [8, 6, 7, 2, 5, 4, 3, 0, 1],
        }
    }

    pub fn board(self) -> Result<Board, InvalidState> {
        Board::from_tiles(3, self.tiles().to_vec())
    }

    pub fn goal(self) -> Result<Board, InvalidState> {
        Board::goal(3)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scenarios_are_valid_and_solvable() {
        for scenario in Scenario::ALL {
            let board = scenario.board().unwrap();
            let goal = scenario.goal().unwrap();
            assert!(board.is_solvable_to(&goal), "{}", scenario);
            assert_ne!(board, goal);
        }
    }

    #[test]
    fn easy_board_layout() {
        assert_eq!(
            Scenario::Easy.board().unwrap().to_string(),
            "1 2 3\n4 5 6\n. 7 8"
        );
    }
}
