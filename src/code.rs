use std::collections::{btree_map, BTreeMap};
use std::io::{BufReader, Read};

use bitvec::prelude::*;
use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node};

/// Bits packed most-significant first, the layout written to disk.
pub type Bits = BitVec<u8, Msb0>;

/// Prefix-free code for every leaf of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, BitBox<u8, Msb0>>,
}

impl CodeTable {
    /// Walks the tree with `0` for the 0-branch and `1` for the 1-branch.
    /// A lone root leaf gets the code `0` so every occurrence still costs
    /// one bit.
    pub fn derive(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(&Node, Bits)> = vec![(tree.root(), Bits::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    let code = if path.is_empty() {
                        bitvec![u8, Msb0; 0]
                    } else {
                        path
                    };
                    trace!(%symbol, code = %render_bits(&code), "assigned code");
                    codes.insert(*symbol, code.into_boxed_bitslice());
                }
                Node::Internal { zero, one, .. } => {
                    let mut one_path = path.clone();
                    one_path.push(true);
                    let mut zero_path = path;
                    zero_path.push(false);

                    stack.push((one.as_ref(), one_path));
                    stack.push((zero.as_ref(), zero_path));
                }
            }
        }

        debug!(codes = codes.len(), "derived code table");
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(&symbol).map(|c| c.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Symbol, BitBox<u8, Msb0>> {
        self.codes.iter()
    }

    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(a, code_a)| {
            self.codes.iter().all(|(b, code_b)| {
                a == b
                    || code_b.len() < code_a.len()
                    || code_b[..code_a.len()] != *code_a.as_bitslice()
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct Encoder {
    table: CodeTable,
}

impl Encoder {
    pub fn new(table: CodeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Concatenates the code of every byte, then the end-of-stream code.
    /// The bit count is the length of the result.
    pub fn encode(&self, bytes: impl IntoIterator<Item = u8>) -> Result<Bits> {
        let mut out = Bits::new();
        for b in bytes {
            self.push(&mut out, Symbol::Byte(b))?;
        }
        self.push(&mut out, Symbol::Eof)?;

        Ok(out)
    }

    /// Same as [`Encoder::encode`], reading bytes from a stream.
    pub fn encode_reader(&self, reader: impl Read) -> Result<Bits> {
        let mut out = Bits::new();
        for b in BufReader::new(reader).bytes() {
            self.push(&mut out, Symbol::Byte(b?))?;
        }
        self.push(&mut out, Symbol::Eof)?;

        Ok(out)
    }

    fn push(&self, out: &mut Bits, symbol: Symbol) -> Result<()> {
        let code = self
            .table
            .get(symbol)
            .ok_or(HuffmanError::TableMismatch { symbol })?;
        out.extend_from_bitslice(code);
        Ok(())
    }
}

impl From<&HuffmanTree> for Encoder {
    fn from(tree: &HuffmanTree) -> Self {
        Self::new(CodeTable::derive(tree))
    }
}

/// Renders bits as a string of `0` and `1` characters.
pub fn render_bits(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter()
        .by_vals()
        .map(|b| if b { '1' } else { '0' })
        .collect()
}
