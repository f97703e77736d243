use std::{
    fmt::{self, Display, Write},
    ops::Index,
    str::FromStr,
};

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::InvalidState;

pub const BLANK: u8 = 0;

/// Largest side whose tile values still fit in a `u8`.
pub const MAX_SIDE: usize = 15;

/// Direction the blank travels in a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order used by the successor generator.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of the blank.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// One move: the blank travels in `direction` from `blank_from` to
/// `blank_to`, and `tile` slides the opposite way into `blank_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    pub direction: Direction,
    pub tile: u8,
    pub blank_from: (usize, usize),
    pub blank_to: (usize, usize),
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (tile {}: {:?} -> {:?})",
            self.direction, self.tile, self.blank_to, self.blank_from
        )
    }
}

/// At most four neighbours, so the buffer never spills to the heap.
pub type Successors = SmallVec<[(Board, Action); 4]>;

/// A square sliding-tile board. Tiles are stored row-major; `BLANK` marks
/// the empty cell. Boards are immutable once built: moves produce new boards.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    side: usize,
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Board, InvalidState> {
        let side = rows.len();
        let cols = rows.first().map(Vec::len).ok_or(InvalidState::Empty)?;
        for (row, tiles) in rows.iter().enumerate() {
            if tiles.len() != cols {
                return Err(InvalidState::RaggedRow {
                    row,
                    expected: cols,
                    got: tiles.len(),
                });
            }
        }

        if cols != side {
            return Err(InvalidState::NotSquare { rows: side, cols });
        }

        Board::from_tiles(side, rows.into_iter().flatten().collect())
    }

    /// Builds a board from a row-major tile list, checking that it holds
    /// every value `0..side²` exactly once.
    pub fn from_tiles(side: usize, tiles: Vec<u8>) -> Result<Board, InvalidState> {
        if side == 0 || tiles.is_empty() {
            return Err(InvalidState::Empty);
        }
        if side > MAX_SIDE {
            return Err(InvalidState::TooLarge {
                side,
                max: MAX_SIDE,
            });
        }
        if tiles.len() != side * side {
            return Err(InvalidState::WrongTileCount {
                side,
                expected: side * side,
                got: tiles.len(),
            });
        }

        let max = tiles.len() - 1;
        let mut counts = vec![0u8; tiles.len()];
        for &tile in &tiles {
            let count = counts
                .get_mut(tile as usize)
                .ok_or(InvalidState::TileOutOfRange {
                    tile: tile as usize,
                    max,
                })?;
            *count += 1;
        }

        // every value is in range and the count matches, so a repeat
        // always leaves some other value unused
        if let Some(tile) = counts.iter().position(|&c| c > 1) {
            let missing = counts.iter().position(|&c| c == 0).unwrap_or_default();
            return Err(InvalidState::DuplicateTile {
                tile: tile as u8,
                missing: missing as u8,
            });
        }

        let blank = tiles.iter().position(|&t| t == BLANK).unwrap_or_default();
        Ok(Board { side, tiles, blank })
    }

    /// The solved board: `1..side²` in reading order with the blank last.
    pub fn goal(side: usize) -> Result<Board, InvalidState> {
        let n = side * side;
        let tiles = (1..n).chain(std::iter::once(0)).map(|t| t as u8).collect();
        Board::from_tiles(side, tiles)
    }

    /// A uniformly random board from the same parity class as `goal(side)`,
    /// so it is always solvable.
    pub fn scrambled<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Board, InvalidState> {
        let goal = Board::goal(side)?;
        let mut tiles = goal.tiles.clone();
        loop {
            tiles.shuffle(rng);
            let candidate = Board::from_tiles(side, tiles.clone())?;
            if candidate.is_solvable_to(&goal) {
                return Ok(candidate);
            }
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn blank(&self) -> (usize, usize) {
        (self.blank / self.side, self.blank % self.side)
    }

    pub fn position_of(&self, tile: u8) -> Option<(usize, usize)> {
        self.tiles
            .iter()
            .position(|&t| t == tile)
            .map(|ix| (ix / self.side, ix % self.side))
    }

    /// Moves the blank one cell in `direction`, or `None` if that would
    /// leave the board.
    pub fn apply(&self, direction: Direction) -> Option<(Board, Action)> {
        let (row, col) = self.blank();
        let (dr, dc) = direction.delta();
        let target_row = row as i32 + dr;
        let target_col = col as i32 + dc;
        let bounds = 0..self.side as i32;
        if !bounds.contains(&target_row) || !bounds.contains(&target_col) {
            return None;
        }

        let target = (target_row as usize, target_col as usize);
        let target_ix = target.0 * self.side + target.1;
        let tile = self.tiles[target_ix];

        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target_ix);
        let next = Board {
            side: self.side,
            tiles,
            blank: target_ix,
        };

        let action = Action {
            direction,
            tile,
            blank_from: (row, col),
            blank_to: target,
        };
        Some((next, action))
    }

    /// Every board one move away: 2 from a corner, 3 from an edge, 4 from
    /// the interior.
    pub fn successors(&self) -> Successors {
        Direction::ALL
            .iter()
            .filter_map(|&d| self.apply(d))
            .collect()
    }

    /// Plays `actions` from this board. Returns `None` if any move is
    /// illegal or slides a different tile than the action records.
    pub fn replay<'a, I>(&self, actions: I) -> Option<Board>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        let mut board = self.clone();
        for action in actions {
            let (next, played) = board.apply(action.direction)?;
            if played != *action {
                return None;
            }
            board = next;
        }
        Some(board)
    }

    fn inversions(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != BLANK)
            .map(|(ix, &t)| {
                self.tiles[ix + 1..]
                    .iter()
                    .filter(|&&later| later != BLANK && later < t)
                    .count()
            })
            .sum()
    }

    // inversion parity is invariant on odd sides; on even sides every
    // vertical move flips it together with the blank's row
    fn parity(&self) -> usize {
        let row_term = if self.side % 2 == 0 { self.blank().0 } else { 0 };
        (self.inversions() + row_term) % 2
    }

    /// Whether `goal` lies in the same connected half of the state space.
    /// The search does not depend on this; it is for callers that want to
    /// reject hopeless inputs up front.
    pub fn is_solvable_to(&self, goal: &Board) -> bool {
        self.side == goal.side && self.parity() == goal.parity()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        let mut first = true;
        for line in self.tiles.chunks(self.side) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            let cells = line
                .iter()
                .map(|&t| {
                    if t == BLANK {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{:>width$}", t)
                    }
                })
                .join(" ");
            f.write_str(&cells)?;
        }

        Ok(())
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.tiles[index.0 * self.side + index.1]
    }
}

impl FromStr for Board {
    type Err = InvalidState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board(s)
    }
}

/// Reads a board written one row per line. Tiles are separated by
/// whitespace or commas; a row without separators is one digit per tile.
/// A single line with `/` between rows is also accepted.
pub fn parse_board(text: &str) -> Result<Board, InvalidState> {
    let rows = text
        .trim()
        .split(|c: char| c == '\n' || c == '/')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            tokens(line)
                .map(|token| {
                    token.parse::<u8>().map_err(|_| InvalidState::BadToken {
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u8>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Board::new(rows)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

#[auto_enums::auto_enum(Iterator)]
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    if line.contains(is_separator) {
        line.split(is_separator).filter(|t| !t.is_empty())
    } else {
        line.char_indices()
            .map(move |(ix, c)| &line[ix..ix + c.len_utf8()])
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn board(text: &str) -> Board {
        parse_board(text).unwrap()
    }

    #[test]
    fn parses_every_row_format() {
        let expected = Board::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]).unwrap();

        assert_eq!(board("1 2 3\n4 5 6\n7 8 0"), expected);
        assert_eq!(board("1,2,3\n4,5,6\n7,8,0"), expected);
        assert_eq!(board("\n  123\n  456\n  780\n"), expected);
        assert_eq!(board("1 2 3/4 5 6/7 8 0"), expected);
        assert_eq!("123/456/780".parse::<Board>().unwrap(), expected);
        assert_eq!(Board::goal(3).unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!(parse_board(""), Err(InvalidState::Empty));
        assert_eq!(
            parse_board("1 2 3\n4 5\n6 7 0"),
            Err(InvalidState::RaggedRow {
                row: 1,
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            parse_board("1 2 3\n4 5 0"),
            Err(InvalidState::NotSquare { rows: 2, cols: 3 })
        );
        assert_eq!(
            parse_board("1 2 3\n4 5 6\n7 9 0"),
            Err(InvalidState::TileOutOfRange { tile: 9, max: 8 })
        );
        assert_eq!(
            parse_board("1 2 3\n4 5 6\n7 7 0"),
            Err(InvalidState::DuplicateTile {
                tile: 7,
                missing: 8
            })
        );
        assert_eq!(
            parse_board("1 2 x\n4 5 6\n7 8 0"),
            Err(InvalidState::BadToken {
                token: "x".to_string()
            })
        );
        assert_eq!(
            Board::from_tiles(3, vec![1, 2, 3, 0]),
            Err(InvalidState::WrongTileCount {
                side: 3,
                expected: 9,
                got: 4
            })
        );
        assert!(matches!(
            Board::goal(16),
            Err(InvalidState::TooLarge { side: 16, .. })
        ));
    }

    #[test]
    fn successor_count_depends_on_blank_cell() {
        assert_eq!(board("0 1 2/3 4 5/6 7 8").successors().len(), 2);
        assert_eq!(board("1 0 2/3 4 5/6 7 8").successors().len(), 3);
        assert_eq!(board("1 2 3/4 0 5/6 7 8").successors().len(), 4);
        assert_eq!(board("1 2 3/4 5 6/7 8 0").successors().len(), 2);
    }

    #[test]
    fn successors_move_blank_one_step() {
        let start = board("1 2 3/4 0 5/6 7 8");
        let before = start.clone();

        for (next, action) in start.successors() {
            let (from, to) = (start.blank(), next.blank());
            let step = from.0.abs_diff(to.0) + from.1.abs_diff(to.1);
            assert_eq!(step, 1);
            assert_eq!(action.blank_from, from);
            assert_eq!(action.blank_to, to);
            assert_eq!(next[from], action.tile);
            assert_eq!(start[to], action.tile);
            assert_eq!(next[to], BLANK);
        }

        // the source board is untouched
        assert_eq!(start, before);
    }

    #[test]
    fn successors_follow_fixed_direction_order() {
        let directions = board("1 2 3/4 0 5/6 7 8")
            .successors()
            .into_iter()
            .map(|(_, a)| a.direction)
            .collect_vec();
        assert_eq!(directions, Direction::ALL.to_vec());
    }

    #[test]
    fn apply_refuses_to_leave_board() {
        let corner = board("0 1 2/3 4 5/6 7 8");
        assert!(corner.apply(Direction::Up).is_none());
        assert!(corner.apply(Direction::Left).is_none());

        let (next, action) = corner.apply(Direction::Right).unwrap();
        assert_eq!(next, board("1 0 2/3 4 5/6 7 8"));
        assert_eq!(action.tile, 1);
        assert_eq!(action.direction.opposite(), Direction::Left);
    }

    #[test]
    fn replay_checks_each_action() {
        let start = board("1 2 3/4 5 6/0 7 8");
        let (mid, first) = start.apply(Direction::Right).unwrap();
        let (end, second) = mid.apply(Direction::Right).unwrap();

        assert_eq!(start.replay(&[first, second]), Some(end.clone()));
        assert_eq!(end, Board::goal(3).unwrap());
        assert_eq!(start.replay(&[second]), None);
        assert_eq!(start.replay(&Vec::<Action>::new()), Some(start.clone()));
    }

    #[test]
    fn parity_splits_state_space() {
        let goal = Board::goal(3).unwrap();
        assert!(board("8 6 7/2 5 4/3 0 1").is_solvable_to(&goal));
        assert!(!board("2 1 3/4 5 6/7 8 0").is_solvable_to(&goal));

        let goal4 = Board::goal(4).unwrap();
        let (down, _) = goal4.apply(Direction::Up).unwrap();
        assert!(down.is_solvable_to(&goal4));
        assert!(!board("2 1 3 4/5 6 7 8/9 10 11 12/13 14 15 0").is_solvable_to(&goal4));
        assert!(!goal.is_solvable_to(&goal4));
    }

    #[test]
    fn scrambled_boards_are_solvable() {
        let mut rng = StdRng::seed_from_u64(7);
        for side in 2..=4 {
            let goal = Board::goal(side).unwrap();
            for _ in 0..20 {
                let b = Board::scrambled(side, &mut rng).unwrap();
                assert_eq!(b.side(), side);
                assert!(b.is_solvable_to(&goal));
            }
        }
    }

    #[test]
    fn display_aligns_columns() {
        assert_eq!(board("1 2 3/4 5 6/7 8 0").to_string(), "1 2 3\n4 5 6\n7 8 .");
        let four = Board::goal(4).unwrap().to_string();
        assert_eq!(four.lines().last(), Some("13 14 15  ."));
    }
}
