use bitvec::prelude::*;
use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::LogicError;
use crate::frequency::ByteFrequency;
use crate::table::CodeTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Terminal(u8),
    /// `one` is only absent below the root of a single-symbol tree.
    Internal {
        zero: Box<Node>,
        one: Option<Box<Node>>,
    },
}

impl Node {
    fn join(zero: Node, one: Node) -> Self {
        Node::Internal {
            zero: Box::new(zero),
            one: Some(Box::new(one)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(_))
    }

    pub fn byte(&self) -> Option<u8> {
        match self {
            Node::Terminal(b) => Some(*b),
            Node::Internal { .. } => None,
        }
    }

    pub fn child(&self, bit: bool) -> Result<&Node, LogicError> {
        match (self, bit) {
            (Node::Internal { zero, .. }, false) => Ok(&**zero),
            (Node::Internal { one: Some(one), .. }, true) => Ok(&**one),
            _ => Err(LogicError::MissingChild { bit }),
        }
    }
}

/// A subtree waiting in the merge queue. Ordered by weight, then by the
/// order it was created in, so equal weights always merge the same way.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    order: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree for a frequency sequence, or `None` if it is empty.
    ///
    /// Construction depends only on the counts and their order in
    /// `frequencies`, so the decoder rebuilds exactly the encoder's tree.
    pub fn new(frequencies: &[ByteFrequency]) -> Option<Self> {
        if let [only] = frequencies {
            return Some(Self {
                root: Node::Internal {
                    zero: Box::new(Node::Terminal(only.byte)),
                    one: None,
                },
            });
        }

        let mut pq: BinaryHeap<_> = frequencies
            .iter()
            .enumerate()
            .map(|(order, f)| {
                Reverse(Pending {
                    weight: f.count,
                    order,
                    node: Node::Terminal(f.byte),
                })
            })
            .collect();

        let mut order = frequencies.len();
        while pq.len() > 1 {
            let (Some(Reverse(zero)), Some(Reverse(one))) = (pq.pop(), pq.pop()) else {
                break;
            };
            pq.push(Reverse(Pending {
                weight: zero.weight.saturating_add(one.weight),
                order,
                node: Node::join(zero.node, one.node),
            }));
            order += 1;
        }

        pq.pop().map(|Reverse(p)| Self { root: p.node })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_root(&self, node: &Node) -> bool {
        std::ptr::eq(node, &self.root)
    }

    /// One traversal step from `node`.
    pub fn go<'t>(&'t self, node: &'t Node, bit: bool) -> Result<&'t Node, LogicError> {
        node.child(bit)
    }

    /// Derives the codeword of every terminal from its path from the root.
    pub fn table(&self) -> CodeTable {
        fn traverse(node: &Node, path: &mut BitVec, table: &mut CodeTable) {
            match node {
                Node::Terminal(byte) => table.set(*byte, path.clone()),
                Node::Internal { zero, one } => {
                    path.push(false);
                    traverse(zero, path, table);
                    path.pop();

                    if let Some(one) = one {
                        path.push(true);
                        traverse(one, path, table);
                        path.pop();
                    }
                }
            }
        }

        let mut path = BitVec::new();
        let mut table = CodeTable::new();
        traverse(&self.root, &mut path, &mut table);
        table
    }

    /// Length of the longest codeword.
    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Terminal(_) => 0,
                Node::Internal { zero, one } => {
                    1 + depth(zero).max(one.as_deref().map_or(0, depth))
                }
            }
        }
        depth(&self.root)
    }

    pub fn terminal_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Terminal(_) => 1,
                Node::Internal { zero, one } => count(zero) + one.as_deref().map_or(0, count),
            }
        }
        count(&self.root)
    }
}
