use crate::cipher::TrailerKeys;
use crate::error::Error;
use crate::Result;
use byteorder::{BigEndian, ByteOrder};

/// Running checksums over big-endian words; a trailing partial word is ignored.
pub fn compute(data: &[u8]) -> (u32, u32) {
    data.chunks_exact(4)
        .map(BigEndian::read_u32)
        .fold((0u32, 0u32), |(xor, sub), word| {
            (xor ^ !word, sub.wrapping_sub(word))
        })
}

pub(crate) fn validate(data: &[u8], keys: &TrailerKeys) -> Result<()> {
    let (checksum1, checksum2) = compute(data);

    if checksum1 != keys.checksum1 {
        return Err(Error::ChecksumMismatch {
            which: 1,
            expected: keys.checksum1,
            got: checksum1,
        });
    }

    if checksum2 != keys.checksum2 {
        return Err(Error::ChecksumMismatch {
            which: 2,
            expected: keys.checksum2,
            got: checksum2,
        });
    }

    Ok(())
}
