use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::symbol::Symbol;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The input file could not be opened or read.
    #[error("unable to open '{}'", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot build a tree from an empty frequency model")]
    EmptyModel,

    /// A symbol was encoded that the code table has no entry for. Only
    /// reachable when the table was derived from a different model.
    #[error("symbol {symbol} has no code in the table")]
    TableMismatch { symbol: Symbol },

    #[error("bit stream ended after {consumed} bits without an end-of-stream code")]
    MalformedStream { consumed: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("failed to decode header")]
    HeaderDecode(#[from] rmp_serde::decode::Error),

    #[error("failed to encode header")]
    HeaderEncode(#[from] rmp_serde::encode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HuffmanError {
    pub(crate) fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
        }
    }
}
