//! File framing: a MessagePack header holding the frequency model, followed
//! by the encoded bits packed most-significant bit first.
//!
//! The header is an array of `[symbol, count]` records in ascending symbol
//! order. Its length prefix tells the reader where the body starts; the body
//! runs to the end of the file and its final byte is zero-padded.

use std::fs::{self, File};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::code::{render_bits, Bits, Encoder};
use crate::decode::Decoder;
use crate::error::{HuffmanError, Result};
use crate::model::FrequencyModel;
use crate::symbol::Symbol;
use crate::tree::HuffmanTree;

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    symbol: Symbol,
    count: u64,
}

pub fn write_header(model: &FrequencyModel, writer: &mut impl Write) -> Result<()> {
    let records: Vec<Record> = model
        .iter()
        .map(|(symbol, count)| Record { symbol, count })
        .collect();
    rmp_serde::encode::write(writer, &records)?;
    Ok(())
}

/// Reads header records until the announced count is consumed, leaving the
/// reader at the first body byte.
pub fn read_header(reader: &mut impl Read) -> Result<FrequencyModel> {
    let records: Vec<Record> = rmp_serde::from_read(reader)?;
    FrequencyModel::from_records(records.into_iter().map(|r| (r.symbol, r.count)))
}

/// A compressed file image together with the bits of its body.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub bits: Bits,
}

impl Compressed {
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    pub fn bit_string(&self) -> String {
        render_bits(&self.bits)
    }
}

fn frame(model: &FrequencyModel, bits: Bits) -> Result<Compressed> {
    let mut bytes = Vec::new();
    write_header(model, &mut bytes)?;
    let header_len = bytes.len();

    let mut packed = bits.clone();
    packed.resize(bits.len().next_multiple_of(8), false);
    bytes.extend_from_slice(packed.as_raw_slice());

    debug!(
        header_len,
        bit_count = bits.len(),
        total = bytes.len(),
        "framed compressed data"
    );
    Ok(Compressed { bytes, bits })
}

fn encoder_for(model: &FrequencyModel) -> Result<Encoder> {
    // the tree is only needed to derive the table
    let tree = HuffmanTree::build(model)?;
    Ok(Encoder::from(&tree))
}

pub fn compress_bytes(input: &[u8]) -> Result<Compressed> {
    let model = FrequencyModel::from_bytes(input);
    let bits = encoder_for(&model)?.encode(input.iter().copied())?;
    frame(&model, bits)
}

pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(data);
    let model = read_header(&mut cursor)?;
    let body = &data[cursor.position() as usize..];
    debug!(
        symbols = model.len(),
        body_len = body.len(),
        "read compressed header"
    );

    let decoder = Decoder::new(HuffmanTree::build(&model)?);
    decoder.decode(body.view_bits::<Msb0>())
}

/// Output file naming for both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Appended to a source name to form the compressed name.
    pub suffix: String,
    /// Inserted after the first segment of a decompressed name.
    pub marker: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            suffix: ".huf".to_owned(),
            marker: "_unc".to_owned(),
        }
    }
}

impl Naming {
    /// `notes.txt` becomes `notes.txt.huf`.
    pub fn compressed_path(&self, source: &Path) -> PathBuf {
        let mut name = source.as_os_str().to_owned();
        name.push(&self.suffix);
        PathBuf::from(name)
    }

    /// `dir/example.txt.huf` becomes `dir/example_unc.txt`: the file name
    /// up to its first `.`, the marker, then the remaining extensions
    /// without the compressed suffix.
    pub fn decompressed_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = name.strip_suffix(self.suffix.as_str()).unwrap_or(&name);
        let (stem, ext) = name.split_at(name.find('.').unwrap_or(name.len()));

        source.with_file_name(format!("{stem}{}{ext}", self.marker))
    }
}

fn unreadable(path: &Path, source: io::Error) -> HuffmanError {
    HuffmanError::SourceUnreadable {
        path: path.to_owned(),
        source,
    }
}

/// Compresses `path` into [`Naming::compressed_path`] and returns the body
/// as a string of `0` and `1` characters.
pub fn compress(path: impl AsRef<Path>) -> Result<String> {
    compress_with(path, &Naming::default())
}

pub fn compress_with(path: impl AsRef<Path>, naming: &Naming) -> Result<String> {
    let path = path.as_ref();

    let open = || File::open(path).map_err(|e| unreadable(path, e));

    // counting and encoding each take a pass over the source
    let model = FrequencyModel::from_reader(open()?).map_err(|e| unreadable(path, e))?;
    let bits = encoder_for(&model)?.encode_reader(open()?)?;
    let compressed = frame(&model, bits)?;

    let dest = naming.compressed_path(path);
    fs::write(&dest, &compressed.bytes)?;
    info!(
        source = %path.display(),
        dest = %dest.display(),
        bytes = compressed.bytes.len(),
        "compressed"
    );

    Ok(compressed.bit_string())
}

/// Decompresses `path` into [`Naming::decompressed_path`] and returns the
/// decoded content, with invalid UTF-8 replaced.
pub fn decompress(path: impl AsRef<Path>) -> Result<String> {
    decompress_with(path, &Naming::default())
}

pub fn decompress_with(path: impl AsRef<Path>, naming: &Naming) -> Result<String> {
    let path = path.as_ref();

    let data = fs::read(path).map_err(|e| unreadable(path, e))?;
    let decoded = decompress_bytes(&data)?;

    let dest = naming.decompressed_path(path);
    fs::write(&dest, &decoded)?;
    info!(
        source = %path.display(),
        dest = %dest.display(),
        bytes = decoded.len(),
        "decompressed"
    );

    Ok(String::from_utf8_lossy(&decoded).into_owned())
}
