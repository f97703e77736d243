//! The open set: a min-heap on `f` plus a board index for membership and
//! cost-improvement checks.
//!
//! Decrease-key is lazy. An improved node is rewritten in place in the
//! arena and pushed again under its new key; the old heap entry stays
//! behind and is dropped by the search's closed-set check when it surfaces.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use crate::{
    board::Board,
    node::{Arena, Node, NodeId},
};

/// Heap key. `seq` breaks ties on `f` in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    f: u32,
    seq: u64,
    id: NodeId,
}

/// What `Frontier::offer` did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The board was new to the frontier.
    Inserted(NodeId),
    /// The board was resident with a larger `g`; that node now carries the
    /// candidate's path.
    Improved(NodeId),
    /// The board was resident with an equal or smaller `g`.
    Kept(NodeId),
}

#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<Entry>>,
    index: HashMap<Board, NodeId>,
    next_seq: u64,
    peak: usize,
}

impl Frontier {
    pub fn new() -> Frontier {
        Frontier::default()
    }

    /// Adds `candidate` unless its board is already resident at least as
    /// cheaply. The caller must have checked the closed set first.
    pub fn offer(&mut self, arena: &mut Arena, candidate: Node) -> Offer {
        if let Some(&id) = self.index.get(&candidate.board) {
            if arena[id].g <= candidate.g {
                return Offer::Kept(id);
            }

            arena.improve(id, &candidate);
            self.enqueue(id, arena[id].f());
            return Offer::Improved(id);
        }

        let board = candidate.board.clone();
        let f = candidate.f();
        let id = arena.push(candidate);
        self.index.insert(board, id);
        self.enqueue(id, f);
        self.peak = self.peak.max(self.index.len());
        Offer::Inserted(id)
    }

    fn enqueue(&mut self, id: NodeId, f: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { f, seq, id }));
    }

    /// Removes the entry with the smallest `f`, oldest first on ties.
    /// May return a node whose board was already popped under a better key;
    /// the caller filters those against its closed set.
    pub fn pop(&mut self, arena: &Arena) -> Option<NodeId> {
        let Reverse(entry) = self.heap.pop()?;
        let board = &arena[entry.id].board;
        if self.index.get(board) == Some(&entry.id) {
            self.index.remove(board);
        }
        Some(entry.id)
    }

    /// `f` of the entry `pop` would return next.
    pub fn peek_f(&self) -> Option<u32> {
        self.heap.peek().map(|Reverse(entry)| entry.f)
    }

    pub fn get(&self, board: &Board) -> Option<NodeId> {
        self.index.get(board).copied()
    }

    /// Distinct boards currently waiting in the frontier.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Heap entries, stale ones included.
    pub fn entries(&self) -> usize {
        self.heap.len()
    }

    /// True once every heap entry, stale ones included, has been popped.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest `len()` seen so far.
    pub fn peak(&self) -> usize {
        self.peak
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::{parse_board, Direction};

    fn offer_child(
        frontier: &mut Frontier,
        arena: &mut Arena,
        parent: NodeId,
        direction: Direction,
        g: u32,
        h: u32,
    ) -> Offer {
        let (board, action) = arena[parent].board.apply(direction).unwrap();
        let candidate = Node {
            board,
            parent: Some(parent),
            action: Some(action),
            g,
            h,
        };
        frontier.offer(arena, candidate)
    }

    fn inserted(offer: Offer) -> NodeId {
        match offer {
            Offer::Inserted(id) => id,
            other => panic!("expected insert, got {:?}", other),
        }
    }

    fn center() -> Board {
        parse_board("1 2 3/4 0 5/6 7 8").unwrap()
    }

    #[test]
    fn pops_lowest_f_then_oldest() {
        let mut arena = Arena::new();
        let mut frontier = Frontier::new();
        let root = inserted(frontier.offer(&mut arena, Node::root(center(), 9)));
        assert_eq!(frontier.pop(&arena), Some(root));

        let f = &mut frontier;
        let up = inserted(offer_child(f, &mut arena, root, Direction::Up, 1, 3));
        let down = inserted(offer_child(f, &mut arena, root, Direction::Down, 1, 1));
        let left = inserted(offer_child(f, &mut arena, root, Direction::Left, 1, 3));
        let right = inserted(offer_child(f, &mut arena, root, Direction::Right, 1, 1));

        let order: Vec<NodeId> = std::iter::from_fn(|| frontier.pop(&arena)).collect();
        assert_eq!(order, vec![down, right, up, left]);
        assert!(frontier.is_empty());
        assert_eq!(frontier.peak(), 4);
    }

    #[test]
    fn keeps_cheaper_resident() {
        let mut arena = Arena::new();
        let mut frontier = Frontier::new();
        let root = arena.push(Node::root(center(), 0));

        let f = &mut frontier;
        let id = inserted(offer_child(f, &mut arena, root, Direction::Up, 1, 2));
        let again = offer_child(f, &mut arena, root, Direction::Up, 1, 2);
        let worse = offer_child(f, &mut arena, root, Direction::Up, 4, 2);

        assert_eq!(again, Offer::Kept(id));
        assert_eq!(worse, Offer::Kept(id));
        assert_eq!(arena[id].g, 1);
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.entries(), 1);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn improvement_leaves_stale_entry() {
        let mut arena = Arena::new();
        let mut frontier = Frontier::new();
        let root = arena.push(Node::root(center(), 0));

        let id = inserted(offer_child(&mut frontier, &mut arena, root, Direction::Up, 7, 2));
        assert_eq!(frontier.peek_f(), Some(9));

        let improved = offer_child(&mut frontier, &mut arena, root, Direction::Up, 1, 2);
        assert_eq!(improved, Offer::Improved(id));
        assert_eq!(arena[id].g, 1);
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.entries(), 2);
        assert_eq!(frontier.peek_f(), Some(3));

        // the improved key surfaces first and clears the index
        assert_eq!(frontier.pop(&arena), Some(id));
        assert_eq!(frontier.get(&arena[id].board), None);
        assert_eq!(frontier.len(), 0);

        // then the superseded entry, pointing at the same node
        assert!(!frontier.is_empty());
        assert_eq!(frontier.pop(&arena), Some(id));
        assert!(frontier.is_empty());
        assert_eq!(frontier.pop(&arena), None);
    }
}
