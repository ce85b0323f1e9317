use crate::error::Error;
use crate::Result;
use byteorder::{BigEndian, ByteOrder};

const REGION: &str = "flags";
const COUNT_SIZE: usize = 4;

/// Zero run length that stands for the escape value.
const MAX_ZERO_RUN: u32 = 8;
/// Emitted for a full run of zero bits.
pub const ESCAPE: u8 = 0xFF;

/// Decode the bit-packed flag region into opcode and operand bytes.
///
/// The region starts with a big-endian symbol count followed by the bit
/// stream, read MSB-first.
pub fn decode_flags(region: &[u8]) -> Result<Vec<u8>> {
    if region.len() < COUNT_SIZE {
        return Err(Error::TruncatedStream {
            region: REGION,
            position: 0,
            needed: COUNT_SIZE,
            size: region.len(),
        });
    }

    let count =
        usize::try_from(BigEndian::read_u32(region)).map_err(|_| Error::IntegerOverflow)?;
    let bits = &region[COUNT_SIZE..];

    // Every symbol takes at least one bit.
    let available = bits.len().checked_mul(8).ok_or(Error::IntegerOverflow)?;
    if count > available {
        return Err(Error::TruncatedStream {
            region: REGION,
            position: COUNT_SIZE,
            needed: count.div_ceil(8),
            size: region.len(),
        });
    }

    let mut reader = BitReader::new(bits);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(reader.read_symbol()?);
    }
    Ok(out)
}

struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    fn read_symbol(&mut self) -> Result<u8> {
        if self.read_bit()? == 1 {
            return Ok(1);
        }

        let mut zeros = 1u32;
        while zeros < MAX_ZERO_RUN {
            if self.read_bit()? == 1 {
                // The stop bit is the leading bit of the value.
                self.step_back();
                break;
            }
            zeros += 1;
        }

        if zeros == MAX_ZERO_RUN {
            return Ok(ESCAPE);
        }

        let value = self.read_bits(zeros + 1)?;
        Ok(value as u8)
    }

    fn read_bit(&mut self) -> Result<u8> {
        let byte_pos = self.bit_pos >> 3;
        let Some(byte) = self.data.get(byte_pos).copied() else {
            return Err(Error::TruncatedStream {
                region: REGION,
                position: COUNT_SIZE + byte_pos,
                needed: 1,
                size: COUNT_SIZE + self.data.len(),
            });
        };

        let shift = 7 - (self.bit_pos & 7);
        self.bit_pos += 1;
        Ok((byte >> shift) & 1)
    }

    fn step_back(&mut self) {
        self.bit_pos -= 1;
    }

    fn read_bits(&mut self, bits: u32) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..bits {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }
}
