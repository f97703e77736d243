//! Search-tree nodes, stored in an arena and linked to their parents by index.

use crate::board::{Action, Board};

/// Index of a node in its [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub board: Board,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    /// The move that produced `board` from the parent's board.
    pub action: Option<Action>,
    /// Moves from the root.
    pub g: u32,
    /// Heuristic estimate of the moves still needed.
    pub h: u32,
}

impl Node {
    pub fn root(board: Board, h: u32) -> Node {
        Node {
            board,
            parent: None,
            action: None,
            g: 0,
            h,
        }
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Owns every node created during one search. Nodes are never removed, so
/// a `NodeId` stays valid until the arena is dropped.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Arena {
        Arena::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Re-parents `id` onto the cheaper path `candidate` took to the same
    /// board. The board and `h` stay as they were; only the path-dependent
    /// fields change.
    pub fn improve(&mut self, id: NodeId, candidate: &Node) {
        let node = &mut self.nodes[id.0];
        debug_assert_eq!(node.board, candidate.board);
        debug_assert!(candidate.g < node.g);
        node.parent = candidate.parent;
        node.action = candidate.action;
        node.g = candidate.g;
    }

    /// The moves leading from the root to `id`, first move first. Empty when
    /// `id` is the root.
    pub fn path_to(&self, id: NodeId) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self[id].g as usize);
        let mut current = id;
        while let Some(parent) = self[current].parent {
            actions.extend(self[current].action);
            current = parent;
        }

        actions.reverse();
        actions
    }
}

impl std::ops::Index<NodeId> for Arena {
    type Output = Node;
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
