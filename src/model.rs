use std::collections::btree_map::{self, BTreeMap};
use std::io::{self, BufReader, Read};

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;

/// Occurrence counts for every symbol seen in an input, plus exactly one
/// unit for [`Symbol::Eof`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    counts: BTreeMap<Symbol, u64>,
}

impl FrequencyModel {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::count(bytes.iter().copied())
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Counts every byte the reader yields. Fails only when reading fails,
    /// in which case no model is produced.
    pub fn from_reader(reader: impl Read) -> io::Result<Self> {
        let mut counts = BTreeMap::new();
        for byte in BufReader::new(reader).bytes() {
            *counts.entry(Symbol::Byte(byte?)).or_default() += 1;
        }
        Ok(Self::finish(counts))
    }

    fn count(bytes: impl Iterator<Item = u8>) -> Self {
        let mut counts = BTreeMap::new();
        for b in bytes {
            *counts.entry(Symbol::Byte(b)).or_default() += 1;
        }
        Self::finish(counts)
    }

    fn finish(mut counts: BTreeMap<Symbol, u64>) -> Self {
        counts.insert(Symbol::Eof, 1);
        debug!(distinct = counts.len(), "built frequency model");
        Self { counts }
    }

    /// Rebuilds a model from header records.
    pub fn from_records(records: impl IntoIterator<Item = (Symbol, u64)>) -> Result<Self> {
        let mut counts = BTreeMap::new();
        for (symbol, count) in records {
            if count == 0 {
                return Err(HuffmanError::invalid_header(format!(
                    "symbol {symbol} has a zero count"
                )));
            }
            if counts.insert(symbol, count).is_some() {
                return Err(HuffmanError::invalid_header(format!(
                    "symbol {symbol} appears twice"
                )));
            }
        }

        match counts.get(&Symbol::Eof) {
            Some(1) => Ok(Self { counts }),
            Some(n) => Err(HuffmanError::invalid_header(format!(
                "end-of-stream count is {n}, expected 1"
            ))),
            None => Err(HuffmanError::invalid_header("missing end-of-stream record")),
        }
    }

    pub fn count_of(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols, the end-of-stream marker included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of input bytes the model was counted from.
    pub fn literal_total(&self) -> u64 {
        self.iter()
            .filter(|(s, _)| *s != Symbol::Eof)
            .map(|(_, c)| c)
            .sum()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.counts.iter(),
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Symbol, u64>,
}

impl Iterator for Iter<'_> {
    type Item = (Symbol, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(s, c)| (*s, *c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a FrequencyModel {
    type Item = (Symbol, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
