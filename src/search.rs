//! A* over board states.
//!
//! Each board moves Unseen -> Frontier -> Closed and never leaves Closed.
//! The loop pops the frontier entry with the smallest `f`, drops it if its
//! board was already closed through a cheaper entry, closes it, stops on the
//! goal, and otherwise offers every successor that is not closed to the
//! frontier.

use std::collections::HashMap;

use log::{debug, trace};
use serde::Serialize;

use crate::{
    board::{Action, Board},
    error::{Error, Result},
    frontier::{Frontier, Offer},
    heuristic::{GoalIndex, Heuristic},
    node::{Arena, Node, NodeId},
};

/// Limits checked before every pop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Give up with [`Error::LimitReached`] once this many states are closed.
    pub max_closed: Option<usize>,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// States settled, the goal included.
    pub closed: usize,
    /// Most distinct boards resident in the frontier at once.
    pub peak_frontier: usize,
    /// Successor boards produced by expansions.
    pub generated: usize,
    /// Frontier nodes moved onto a shorter path.
    pub improved: usize,
    /// Superseded frontier entries dropped on pop.
    pub stale_discarded: usize,
    /// Successors that reached an already closed board with a smaller `g`
    /// than it was closed with. Always 0 for a consistent heuristic.
    pub closed_rediscovered: usize,
}

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub heuristic: Heuristic,
    pub path_length: usize,
    /// Moves from the initial board to the goal, in order.
    pub actions: Vec<Action>,
    #[serde(flatten)]
    pub stats: SearchStats,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.path_length
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Solver {
    heuristic: Heuristic,
    options: SearchOptions,
}

impl Solver {
    pub fn new(heuristic: Heuristic) -> Solver {
        Solver {
            heuristic,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Solver {
        self.options = options;
        self
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn solve(&self, initial: &Board, goal: &Board) -> Result<Solution> {
        if initial.side() != goal.side() {
            return Err(Error::SizeMismatch {
                initial: initial.side(),
                goal: goal.side(),
            });
        }

        let index = GoalIndex::new(goal);
        let heuristic = self.heuristic;
        debug!(
            "[astar] start: heuristic={} side={} h0={}",
            heuristic,
            initial.side(),
            heuristic.estimate(initial, &index)
        );

        let mut stats = SearchStats::default();
        let result = astar(
            initial,
            goal,
            &self.options,
            |b| heuristic.estimate(b, &index),
            &mut stats,
        );

        match &result {
            Ok(actions) => debug!(
                "[astar] solved: heuristic={} length={} closed={} peak_frontier={} generated={}",
                heuristic,
                actions.len(),
                stats.closed,
                stats.peak_frontier,
                stats.generated
            ),
            Err(e) => debug!("[astar] failed: heuristic={} {}", heuristic, e),
        }

        let actions = result?;
        Ok(Solution {
            heuristic,
            path_length: actions.len(),
            actions,
            stats,
        })
    }
}

/// Solves `initial` towards `goal` with default options.
pub fn solve(initial: &Board, goal: &Board, heuristic: Heuristic) -> Result<Solution> {
    Solver::new(heuristic).solve(initial, goal)
}

fn astar<F>(
    initial: &Board,
    goal: &Board,
    options: &SearchOptions,
    mut estimate: F,
    stats: &mut SearchStats,
) -> Result<Vec<Action>>
where
    F: FnMut(&Board) -> u32,
{
    let mut arena = Arena::new();
    let mut frontier = Frontier::new();
    let mut closed: HashMap<Board, NodeId> = HashMap::new();

    let h = estimate(initial);
    frontier.offer(&mut arena, Node::root(initial.clone(), h));

    loop {
        stats.closed = closed.len();
        stats.peak_frontier = frontier.peak();

        if let Some(limit) = options.max_closed {
            if closed.len() >= limit {
                return Err(Error::LimitReached { limit });
            }
        }

        let Some(id) = frontier.pop(&arena) else {
            return Err(Error::Unreachable {
                closed: closed.len(),
            });
        };

        let node = &arena[id];
        if closed.contains_key(&node.board) {
            stats.stale_discarded += 1;
            trace!("[astar] drop stale entry g={} f={}", node.g, node.f());
            continue;
        }

        closed.insert(node.board.clone(), id);
        trace!(
            "[astar] close g={} h={} f={} closed={} open={}\n{}",
            node.g,
            node.h,
            node.f(),
            closed.len(),
            frontier.len(),
            node.board
        );

        if node.board == *goal {
            stats.closed = closed.len();
            return Ok(arena.path_to(id));
        }

        let g = node.g + 1;
        for (board, action) in node.board.successors() {
            stats.generated += 1;

            if let Some(&settled) = closed.get(&board) {
                if g < arena[settled].g {
                    stats.closed_rediscovered += 1;
                }
                continue;
            }

            let h = estimate(&board);
            let candidate = Node {
                board,
                parent: Some(id),
                action: Some(action),
                g,
                h,
            };
            if let Offer::Improved(_) = frontier.offer(&mut arena, candidate) {
                stats.improved += 1;
            }
        }
    }
}
