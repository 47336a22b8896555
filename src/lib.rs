//! Huffman compression of byte streams.
//!
//! A [`FrequencyModel`] counts every byte plus one end-of-stream marker, a
//! [`HuffmanTree`] is built from it, and the tree's [`CodeTable`] turns the
//! input into a bit stream. Compressed files carry the model as a header so
//! the decompressor rebuilds the identical tree.
//!
//! ```no_run
//! let bits = huffpack::compress("notes.txt")?; // writes notes.txt.huf
//! let text = huffpack::decompress("notes.txt.huf")?; // writes notes_unc.txt
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod code;
pub mod container;
pub mod decode;
pub mod error;
pub mod model;
pub mod symbol;
pub mod tree;

pub use code::{render_bits, Bits, CodeTable, Encoder};
pub use container::{
    compress, compress_bytes, compress_with, decompress, decompress_bytes, decompress_with,
    Compressed, Naming,
};
pub use decode::Decoder;
pub use error::{HuffmanError, Result};
pub use model::FrequencyModel;
pub use symbol::{Symbol, EOF_SYMBOL, NOT_A_SYMBOL};
pub use tree::{HuffmanTree, Node};

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(text: &str) -> Vec<(Symbol, String)> {
        let tree = HuffmanTree::build(&FrequencyModel::from_text(text)).unwrap();
        CodeTable::derive(&tree)
            .iter()
            .map(|(s, c)| (*s, render_bits(c)))
            .collect()
    }

    #[test]
    fn test_encode_decode() {
        let s = String::from(
            "This is a really long message, I sure do hope it encodes and decodes properly.",
        );
        let tree = HuffmanTree::build(&FrequencyModel::from_text(&s)).unwrap();
        let e = Encoder::from(&tree);
        let d = Decoder::from(tree);

        let out = e.encode(s.bytes()).unwrap();
        let dec = String::from_utf8(d.decode(&out).unwrap()).unwrap();

        assert_eq!(dec, s);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let text = "It was the best of times, it was the worst of times";
        assert_eq!(codes(text), codes(text));
    }

    #[test]
    fn frequent_symbols_get_short_codes() {
        let table = codes("eeeeeeeeeeeeeeeettttttaaaz");
        let len = |c: u8| {
            table
                .iter()
                .find(|(s, _)| *s == Symbol::Byte(c))
                .map(|(_, code)| code.len())
                .unwrap()
        };

        assert!(len(b'e') <= len(b't'));
        assert!(len(b't') <= len(b'a'));
        assert!(len(b'a') <= len(b'z'));
    }

    #[test]
    fn compressed_is_smaller_for_skewed_text() {
        let input = "a".repeat(1000) + &"b".repeat(10);
        let compressed = compress_bytes(input.as_bytes()).unwrap();

        assert!(compressed.bytes.len() < input.len() / 4);
        assert_eq!(decompress_bytes(&compressed.bytes).unwrap(), input.as_bytes());
    }
}
