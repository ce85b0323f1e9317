use super::flags::decode_flags;
use crate::error::Error;
use crate::Result;
use byteorder::{BigEndian, ByteOrder};

const SIZE_FIELD: usize = 4;
/// Offset of the `flagsEncodedSize` field.
const FLAGS_FIELD_OFFSET: usize = 4;

const MIN_SHORT_RUN: usize = 8;
const MIN_LONG_RUN: usize = 14;

// Upper bound for the up-front allocation; the output still grows to its
// declared size.
const MAX_PREALLOC: usize = 1 << 24;

/// Regions of a decompressor input buffer.
#[derive(Copy, Clone, Debug)]
pub struct Layout<'a> {
    pub decompressed_size: u32,
    pub flags: &'a [u8],
    pub raw: &'a [u8],
    pub lengths: &'a [u8],
}

impl<'a> Layout<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < FLAGS_FIELD_OFFSET {
            return Err(Error::TruncatedStream {
                region: "layout",
                position: 0,
                needed: FLAGS_FIELD_OFFSET,
                size: data.len(),
            });
        }
        let decompressed_size = BigEndian::read_u32(data);

        let (flags, raw_offset) = sized_region(data, FLAGS_FIELD_OFFSET, "flags")?;
        let (raw, lengths_offset) = sized_region(data, raw_offset, "raw")?;

        // Streams that never use a long run may stop right after the raw bytes.
        let lengths = if lengths_offset == data.len() {
            &data[lengths_offset..]
        } else {
            sized_region(data, lengths_offset, "length table")?.0
        };

        Ok(Self {
            decompressed_size,
            flags,
            raw,
            lengths,
        })
    }

    /// Run the opcode stream and rebuild the output.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let size =
            usize::try_from(self.decompressed_size).map_err(|_| Error::IntegerOverflow)?;
        let opcodes = decode_flags(self.flags)?;

        let mut flags = Cursor::new(&opcodes, "opcode");
        let mut raw = Cursor::new(self.raw, "raw");
        let mut lengths = Cursor::new(self.lengths, "length table");
        let mut out = Vec::with_capacity(size.min(MAX_PREALLOC));

        while out.len() < size {
            let opcode = flags.byte()?;
            match opcode {
                1 => out.push(raw.byte()?),
                2 => {
                    let distance = usize::from(flags.byte()?);
                    copy_back(&mut out, size, distance, 1)?;
                }
                3 => {
                    let a = usize::from(flags.byte()?);
                    let b = usize::from(flags.byte()?);
                    copy_back(&mut out, size, a + b, b + 1)?;
                }
                4 => {
                    let extra = usize::from(raw.byte()?);
                    let b = usize::from(flags.byte()?);
                    copy_back(&mut out, size, extra + b, b + 1)?;
                }
                5 => {
                    let extra = usize::from(raw.byte()?);
                    let a = usize::from(flags.byte()?);
                    let b = usize::from(flags.byte()?);
                    copy_back(&mut out, size, (a << 8) + b + extra, b + 1)?;
                }
                6 => {
                    let length = usize::from(flags.byte()?) + MIN_SHORT_RUN;
                    copy_raw(&mut out, size, &mut raw, length)?;
                }
                7 => {
                    let length = usize::from(lengths.byte()?) + MIN_LONG_RUN;
                    copy_raw(&mut out, size, &mut raw, length)?;
                }
                other => {
                    return Err(Error::InvalidOpcode {
                        opcode: other,
                        position: flags.pos - 1,
                    })
                }
            }
        }

        Ok(out)
    }
}

/// Read a big-endian size at `offset` and return the bytes it covers plus the
/// offset just past them.
fn sized_region<'a>(
    data: &'a [u8],
    offset: usize,
    region: &'static str,
) -> Result<(&'a [u8], usize)> {
    let start = offset.checked_add(SIZE_FIELD).ok_or(Error::IntegerOverflow)?;
    if start > data.len() {
        return Err(Error::TruncatedStream {
            region,
            position: offset,
            needed: SIZE_FIELD,
            size: data.len(),
        });
    }

    let len = usize::try_from(BigEndian::read_u32(&data[offset..start]))
        .map_err(|_| Error::IntegerOverflow)?;
    let end = start.checked_add(len).ok_or(Error::IntegerOverflow)?;
    let Some(bytes) = data.get(start..end) else {
        return Err(Error::TruncatedStream {
            region,
            position: start,
            needed: len,
            size: data.len(),
        });
    };
    Ok((bytes, end))
}

fn copy_back(out: &mut Vec<u8>, size: usize, distance: usize, length: usize) -> Result<()> {
    let position = out.len();
    if distance == 0 || distance > position {
        return Err(Error::InvalidBackReference { distance, position });
    }
    check_room(position, length, size)?;

    // Byte by byte: the source may overlap bytes written by this copy.
    let start = position - distance;
    for idx in start..start + length {
        let byte = out[idx];
        out.push(byte);
    }
    Ok(())
}

fn copy_raw(out: &mut Vec<u8>, size: usize, raw: &mut Cursor<'_>, length: usize) -> Result<()> {
    check_room(out.len(), length, size)?;
    out.extend_from_slice(raw.take(length)?);
    Ok(())
}

fn check_room(position: usize, length: usize, size: usize) -> Result<()> {
    if position + length > size {
        return Err(Error::OutputOverrun {
            position,
            length,
            size,
        });
    }
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    region: &'static str,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], region: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            region,
        }
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos + len;
        let Some(bytes) = self.data.get(self.pos..end) else {
            return Err(Error::TruncatedStream {
                region: self.region,
                position: self.pos,
                needed: len,
                size: self.data.len(),
            });
        };
        self.pos = end;
        Ok(bytes)
    }
}
