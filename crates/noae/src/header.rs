use crate::error::Error;
use crate::Result;
use byteorder::{BigEndian, ByteOrder};

/// Size of the plain header in front of the encoded payload.
pub const HEADER_SIZE: usize = 0x10;
/// The only format tag this decoder understands.
pub const FORMAT_TAG: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: u32,
    /// Size of the final output as announced by the header.
    pub decompressed_size: u32,
    pub reserved: [u32; 2],
}

impl Header {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::TooSmall {
                expected: HEADER_SIZE,
                received: bytes.len(),
            });
        }

        let header = Self {
            format: BigEndian::read_u32(&bytes[0..4]),
            decompressed_size: BigEndian::read_u32(&bytes[4..8]),
            reserved: [
                BigEndian::read_u32(&bytes[8..12]),
                BigEndian::read_u32(&bytes[12..16]),
            ],
        };

        if header.format != FORMAT_TAG {
            return Err(Error::UnsupportedFormat { got: header.format });
        }

        Ok(header)
    }
}
