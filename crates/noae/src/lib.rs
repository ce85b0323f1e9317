//! Decoder for the encrypted NoA asset container (`*.xml.e`).
//!
//! A container is a 16-byte big-endian header followed by a payload that went
//! through two bit-permutation passes, a word stream cipher, a three-lane
//! block cipher with a checksummed trailer and an LZ compressor whose control
//! stream is itself bit-packed. [`decode`] undoes all of it in memory.

pub mod checksum;
pub mod cipher;
pub mod compress;
pub mod error;
pub mod header;

use crate::cipher::block::decrypt_blocks;
use crate::cipher::permute::{head_pass, permute_bits, TAIL_PASS, WINDOW_SIZE};
use crate::cipher::stream::decrypt_words;
use crate::compress::Layout;
use common::OutputBuffer;
use log::{debug, warn};
use std::fs;
use std::path::Path;

pub use crate::cipher::TrailerKeys;
pub use crate::error::Error;
pub use crate::header::{Header, FORMAT_TAG, HEADER_SIZE};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Compare the trailer checksums against the decrypted payload.
    pub verify_checksums: bool,
    /// Fail instead of warning when the header size hint disagrees with the
    /// size stored in the compressed stream.
    pub strict_size_hint: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            strict_size_hint: false,
        }
    }
}

/// Decode a whole container with default options.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode a whole container with explicit options.
pub fn decode_with(bytes: &[u8], opts: &DecodeOptions) -> Result<Vec<u8>> {
    let header = Header::parse(bytes)?;
    let mut data = bytes[HEADER_SIZE..].to_vec();
    debug!(
        "container: {} payload bytes, size hint {}",
        data.len(),
        header.decompressed_size
    );

    let tail = data.len() - data.len().min(WINDOW_SIZE);
    permute_bits(&mut data[tail..], TAIL_PASS);
    decrypt_words(&mut data);

    let keys = decrypt_blocks(&mut data)?;
    debug!(
        "trailer: {} payload bytes, multiplier offset {:#010x}",
        data.len(),
        keys.multiplier_offset
    );

    if opts.verify_checksums {
        checksum::validate(&data, &keys)?;
    }

    let head = data.len().min(WINDOW_SIZE);
    permute_bits(&mut data[..head], head_pass(keys.multiplier_offset));

    let layout = Layout::parse(&data)?;
    if layout.decompressed_size != header.decompressed_size {
        if opts.strict_size_hint {
            return Err(Error::SizeHintMismatch {
                header: header.decompressed_size,
                stream: layout.decompressed_size,
            });
        }
        warn!(
            "size hint {} differs from stream size {}",
            header.decompressed_size, layout.decompressed_size
        );
    }
    debug!(
        "layout: {} flag bytes, {} raw bytes, {} length bytes",
        layout.flags.len(),
        layout.raw.len(),
        layout.lengths.len()
    );

    layout.decompress()
}

/// Read a container from disk and decode it.
pub fn decode_path(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let bytes = fs::read(path.as_ref())?;
    decode(&bytes)
}

/// Decode into `out`, returning the number of bytes written.
pub fn decode_into(bytes: &[u8], out: &mut dyn OutputBuffer) -> Result<usize> {
    let decoded = decode(bytes)?;
    out.write_exact(&decoded)?;
    Ok(decoded.len())
}
