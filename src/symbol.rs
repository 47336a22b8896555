use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HuffmanError;

/// Wire value of [`Symbol::Eof`]. Outside the byte range by construction.
pub const EOF_SYMBOL: i32 = 256;

/// Wire value reserved for nodes that carry no symbol. Never written to a
/// header; internal nodes are a separate variant of the tree node type.
pub const NOT_A_SYMBOL: i32 = 257;

/// One literal byte, or the end-of-stream marker appended once per model.
///
/// Ordering puts every byte (ascending) before `Eof`, which fixes the order
/// leaves enter the priority queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Symbol {
    Byte(u8),
    Eof,
}

impl Symbol {
    pub fn wire_value(self) -> i32 {
        match self {
            Symbol::Byte(b) => i32::from(b),
            Symbol::Eof => EOF_SYMBOL,
        }
    }
}

impl From<u8> for Symbol {
    fn from(b: u8) -> Self {
        Symbol::Byte(b)
    }
}

impl From<Symbol> for i32 {
    fn from(s: Symbol) -> Self {
        s.wire_value()
    }
}

impl TryFrom<i32> for Symbol {
    type Error = HuffmanError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            EOF_SYMBOL => Ok(Symbol::Eof),
            _ => u8::try_from(v)
                .map(Symbol::Byte)
                .map_err(|_| HuffmanError::invalid_header(format!("unknown symbol {v}"))),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "{:?}", *b as char),
            Symbol::Byte(b) => write!(f, "0x{b:02x}"),
            Symbol::Eof => f.write_str("EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_outside_byte_range() {
        assert!(!(0..=255).contains(&EOF_SYMBOL));
        assert!(!(0..=255).contains(&NOT_A_SYMBOL));
        assert_ne!(EOF_SYMBOL, NOT_A_SYMBOL);
    }

    #[test]
    fn eof_sorts_after_bytes() {
        assert!(Symbol::Byte(255) < Symbol::Eof);
        assert!(Symbol::Byte(0) < Symbol::Byte(1));
    }

    #[test]
    fn wire_values() {
        assert_eq!(Symbol::try_from(97).unwrap(), Symbol::Byte(b'a'));
        assert_eq!(Symbol::try_from(EOF_SYMBOL).unwrap(), Symbol::Eof);
        assert_eq!(i32::from(Symbol::Eof), 256);
        assert!(Symbol::try_from(NOT_A_SYMBOL).is_err());
        assert!(Symbol::try_from(-1).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Symbol::Byte(b'a').to_string(), "'a'");
        assert_eq!(Symbol::Byte(b'\n').to_string(), "0x0a");
        assert_eq!(Symbol::Eof.to_string(), "EOF");
    }
}
