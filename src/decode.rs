use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node};

#[derive(Debug, Clone, Copy)]
enum State<'t> {
    AtRoot,
    Descending(&'t Node),
    Done,
}

/// Walks a tree bit by bit, emitting a byte at every leaf until the
/// end-of-stream leaf is reached.
#[derive(Debug)]
pub struct Decoder {
    tree: HuffmanTree,
}

impl Decoder {
    pub fn new(tree: HuffmanTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Decodes until the end-of-stream code. Bits after it, such as the
    /// padding of the last byte, are never read.
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>> {
        let root = self.tree.root();
        let mut input = bits.iter().by_vals();
        let mut consumed = 0;
        let mut out = Vec::new();
        let mut state = State::AtRoot;

        loop {
            let current = match state {
                State::AtRoot => root,
                State::Descending(node) => node,
                State::Done => return Ok(out),
            };

            let bit = input
                .next()
                .ok_or(HuffmanError::MalformedStream { consumed })?;
            consumed += 1;

            // only a lone root leaf has no children; one bit selects it
            let next = current.child(bit).unwrap_or(current);

            state = match next {
                Node::Leaf {
                    symbol: Symbol::Eof,
                    ..
                } => State::Done,
                Node::Leaf {
                    symbol: Symbol::Byte(b),
                    ..
                } => {
                    out.push(*b);
                    State::AtRoot
                }
                Node::Internal { .. } => State::Descending(next),
            };
        }
    }
}

impl From<HuffmanTree> for Decoder {
    fn from(tree: HuffmanTree) -> Self {
        Self::new(tree)
    }
}
