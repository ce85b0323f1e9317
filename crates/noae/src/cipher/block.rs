use super::prng::Lcg;
use crate::error::Error;
use crate::Result;
use byteorder::{BigEndian, ByteOrder};

/// Bytes after the terminator: checksum2, checksum1, multiplier offset.
const KEY_FIELDS_SIZE: usize = 12;
const TERMINATOR: u8 = 0xFF;

const SEEDS: [i32; 3] = [0xA9BB, 0x892D, 0x8939];
const BASE_SIZES: [usize; 3] = [0x1F, 0x1D, 0x17];

/// Values recovered from the trailer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrailerKeys {
    pub multiplier_offset: u32,
    pub checksum1: u32,
    pub checksum2: u32,
}

/// Locate the terminator, decrypt everything before it and drop the trailer.
pub(crate) fn decrypt_blocks(data: &mut Vec<u8>) -> Result<TrailerKeys> {
    let payload_size = find_terminator(data)?;

    let len = data.len();
    let keys = TrailerKeys {
        multiplier_offset: BigEndian::read_u32(&data[len - 4..]),
        checksum1: BigEndian::read_u32(&data[len - 8..]),
        checksum2: BigEndian::read_u32(&data[len - 12..]),
    };

    xor_lanes(&mut data[..payload_size], keys.multiplier_offset);

    let pos = payload_size;
    if data[pos] != TERMINATOR {
        return Err(Error::RoundIntegrity {
            offset: pos,
            got: data[pos],
        });
    }
    data[pos] = 0x00;

    data.truncate(payload_size);
    Ok(keys)
}

/// XOR `data` with the three interleaved generator lanes.
///
/// Block `i` belongs to lane `i % 3` and grows by one byte per round of
/// lanes. Each lane keeps its generator state across all of its blocks.
pub(crate) fn xor_lanes(data: &mut [u8], multiplier_offset: u32) {
    let mut generators = SEEDS.map(|seed| Lcg::with_offset(seed, multiplier_offset));

    let mut pos = 0usize;
    let mut block_idx = 0usize;
    while pos < data.len() {
        let lane = block_idx % 3;
        let block_size = BASE_SIZES[lane] + block_idx / 3;
        let end = data.len().min(pos + block_size);

        let generator = &mut generators[lane];
        for byte in &mut data[pos..end] {
            *byte ^= (generator.next_high() & 0xFF) as u8;
        }

        pos = end;
        block_idx += 1;
    }
}

fn find_terminator(data: &[u8]) -> Result<usize> {
    let Some(mut pos) = data.len().checked_sub(KEY_FIELDS_SIZE + 1) else {
        return Err(Error::InvalidTrailer {
            offset: data.len(),
            got: 0,
        });
    };

    while data[pos] == 0x00 {
        if pos == 0 {
            return Err(Error::InvalidTrailer { offset: 0, got: 0 });
        }
        pos -= 1;
    }

    if data[pos] != TERMINATOR {
        return Err(Error::InvalidTrailer {
            offset: pos,
            got: data[pos],
        });
    }
    Ok(pos)
}
