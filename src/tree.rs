use std::cmp::Reverse;
use std::collections::BinaryHeap;

use derivative::Derivative;
use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::model::FrequencyModel;
use crate::symbol::Symbol;

#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    fn merge(zero: Node, one: Node) -> Self {
        Node::Internal {
            weight: zero.weight() + one.weight(),
            zero: Box::new(zero),
            one: Box::new(one),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Child reached by following `bit`, `None` on a leaf.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { zero, one, .. } => {
                Some(if bit { one.as_ref() } else { zero.as_ref() })
            }
        }
    }
}

/// Queue entry. Only `(weight, seq)` takes part in the ordering, so equal
/// weights pop in insertion order.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Queued {
    weight: u64,
    seq: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

#[derive(Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    pub fn build(model: &FrequencyModel) -> Result<Self> {
        Self::from_weights(model)
    }

    /// Builds a tree from `(symbol, weight)` pairs. Leaves enter the queue in
    /// iteration order; the first of two popped nodes becomes the 0-branch.
    pub fn from_weights(weights: impl IntoIterator<Item = (Symbol, u64)>) -> Result<Self> {
        let mut queue: BinaryHeap<Reverse<Queued>> = weights
            .into_iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| {
                Reverse(Queued {
                    weight,
                    seq,
                    node: Node::Leaf { symbol, weight },
                })
            })
            .collect();
        let mut seq = queue.len();

        loop {
            let Reverse(zero) = queue.pop().ok_or(HuffmanError::EmptyModel)?;
            let Some(Reverse(one)) = queue.pop() else {
                let tree = Self { root: zero.node };
                debug!(
                    leaves = tree.leaf_count(),
                    depth = tree.depth(),
                    "built huffman tree"
                );
                return Ok(tree);
            };

            let node = Node::merge(zero.node, one.node);
            queue.push(Reverse(Queued {
                weight: node.weight(),
                seq,
                node,
            }));
            seq += 1;
        }
    }

    #[cfg(test)]
    pub(crate) fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.walk().filter(|(n, _)| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path. Zero for a lone leaf.
    pub fn depth(&self) -> usize {
        self.walk().map(|(_, d)| d).max().unwrap_or(0)
    }

    /// Checks that every internal node weighs the sum of its children.
    pub fn is_weight_consistent(&self) -> bool {
        self.walk().all(|(n, _)| match n {
            Node::Leaf { .. } => true,
            Node::Internal { weight, zero, one } => *weight == zero.weight() + one.weight(),
        })
    }

    /// Pre-order walk, 0-branch first, yielding each node with its depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(&self.root, 0)],
        }
    }
}

impl Drop for HuffmanTree {
    fn drop(&mut self) {
        let root = std::mem::replace(
            &mut self.root,
            Node::Leaf {
                symbol: Symbol::Eof,
                weight: 0,
            },
        );

        // unlink every node before it is freed so dropping never recurses
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Node::Internal { zero, one, .. } = node {
                stack.push(*zero);
                stack.push(*one);
            }
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if let Node::Internal { zero, one, .. } = node {
            self.stack.push((one.as_ref(), depth + 1));
            self.stack.push((zero.as_ref(), depth + 1));
        }
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(c: u8, weight: u64) -> Node {
        Node::Leaf {
            symbol: Symbol::Byte(c),
            weight,
        }
    }

    #[test]
    fn node_merge() {
        let n = Node::merge(leaf(b'a', 3), leaf(b'b', 2));

        assert_eq!(n.weight(), 5);
        assert!(!n.is_leaf());
        assert_eq!(n.child(false), Some(&leaf(b'a', 3)));
        assert_eq!(n.child(true), Some(&leaf(b'b', 2)));
        assert_eq!(leaf(b'a', 3).child(false), None);
    }

    #[test]
    fn queue_orders_by_weight_then_seq() {
        let a = Queued {
            weight: 4,
            seq: 0,
            node: leaf(b'a', 4),
        };
        let b = Queued {
            weight: 4,
            seq: 1,
            node: leaf(b'z', 4),
        };
        let c = Queued {
            weight: 3,
            seq: 9,
            node: leaf(b'a', 3),
        };

        assert!(a < b);
        assert!(c < a);
    }

    #[test]
    fn scenario_aaabbc() {
        let tree = HuffmanTree::build(&FrequencyModel::from_text("aaabbc")).unwrap();

        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.weight(), 7);
        assert!(tree.is_weight_consistent());
    }

    #[test]
    fn equal_weights_pop_in_insertion_order() {
        // c:1 and EOF:1 merge first, c on the 0-branch; then leaf b:2 pops
        // ahead of the merged node of the same weight
        let tree = HuffmanTree::build(&FrequencyModel::from_text("aaabbc")).unwrap();
        let expected = Node::merge(
            leaf(b'a', 3),
            Node::merge(
                leaf(b'b', 2),
                Node::merge(
                    leaf(b'c', 1),
                    Node::Leaf {
                        symbol: Symbol::Eof,
                        weight: 1,
                    },
                ),
            ),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn single_entry_is_lone_leaf() {
        let tree = HuffmanTree::build(&FrequencyModel::from_bytes(b"")).unwrap();

        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn repeated_symbol_has_two_leaves() {
        let tree = HuffmanTree::build(&FrequencyModel::from_text("aaaa")).unwrap();

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn empty_weights_rejected() {
        assert!(matches!(
            HuffmanTree::from_weights(std::iter::empty()),
            Err(HuffmanError::EmptyModel)
        ));
    }

    #[test]
    fn skewed_tree_builds_and_drops() {
        // fibonacci weights give a maximally unbalanced tree
        let mut fib = vec![1u64, 1];
        while fib.len() < 90 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let weights = fib
            .iter()
            .enumerate()
            .map(|(i, w)| (Symbol::Byte(i as u8), *w));

        let tree = HuffmanTree::from_weights(weights).unwrap();
        assert_eq!(tree.depth(), 89);
        assert_eq!(tree.leaf_count(), 90);
        assert!(tree.is_weight_consistent());
    }

    #[test]
    fn rebuild_is_identical() {
        let text = "she sells sea shells by the sea shore";
        let a = HuffmanTree::build(&FrequencyModel::from_text(text)).unwrap();
        let b = HuffmanTree::build(&FrequencyModel::from_text(text)).unwrap();
        assert_eq!(a, b);
    }
}
