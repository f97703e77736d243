use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::Serialize;

use crate::board::{Board, BLANK};

/// Where every tile sits in the goal board, so distance lookups are O(1)
/// per tile instead of a scan of the goal.
#[derive(Debug, Clone)]
pub struct GoalIndex {
    goal: Board,
    positions: Vec<(usize, usize)>,
}

impl GoalIndex {
    pub fn new(goal: &Board) -> GoalIndex {
        let side = goal.side();
        let mut positions = vec![(0, 0); goal.tiles().len()];
        for (ix, &tile) in goal.tiles().iter().enumerate() {
            positions[tile as usize] = (ix / side, ix % side);
        }

        GoalIndex {
            goal: goal.clone(),
            positions,
        }
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    pub fn position(&self, tile: u8) -> (usize, usize) {
        self.positions[tile as usize]
    }
}

/// The cost estimators the solver can run with.
///
/// `Uniform`, `Misplaced` and `Manhattan` never overestimate and are
/// consistent under unit move cost, so A* returns a shortest path with any
/// of them. `Inadmissible` triples the Manhattan sum: it usually closes far
/// fewer states but the path it returns is not guaranteed to be shortest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// Always 0; A* degenerates to uniform-cost search.
    Uniform,
    /// Number of non-blank tiles outside their goal cell.
    Misplaced,
    /// Sum of row and column distances of each tile to its goal cell.
    Manhattan,
    /// Manhattan distance times three. Not admissible.
    Inadmissible,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Uniform,
        Heuristic::Misplaced,
        Heuristic::Manhattan,
        Heuristic::Inadmissible,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Uniform => "uniform",
            Heuristic::Misplaced => "misplaced",
            Heuristic::Manhattan => "manhattan",
            Heuristic::Inadmissible => "inadmissible",
        }
    }

    pub fn is_admissible(self) -> bool {
        !matches!(self, Heuristic::Inadmissible)
    }

    pub fn estimate(self, board: &Board, goal: &GoalIndex) -> u32 {
        match self {
            Heuristic::Uniform => 0,
            Heuristic::Misplaced => misplaced(board, goal),
            Heuristic::Manhattan => manhattan(board, goal),
            Heuristic::Inadmissible => manhattan(board, goal) * 3,
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown heuristic '{}', expected one of: {}",
                    s,
                    Heuristic::ALL.iter().join(", ")
                )
            })
    }
}

fn misplaced(board: &Board, goal: &GoalIndex) -> u32 {
    board
        .tiles()
        .iter()
        .zip_eq(goal.goal().tiles())
        .filter(|&(&b, &g)| b != BLANK && b != g)
        .count() as u32
}

fn manhattan(board: &Board, goal: &GoalIndex) -> u32 {
    let side = board.side();
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(ix, &tile)| {
            let (row, col) = goal.position(tile);
            (ix / side).abs_diff(row) + (ix % side).abs_diff(col)
        })
        .sum::<usize>() as u32
}
