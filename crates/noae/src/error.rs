use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("container reading error")]
    #[diagnostic(code(noae::io_error))]
    Io(#[from] std::io::Error),

    #[error("container is too small (must be at least {expected} bytes, received {received} bytes)")]
    #[diagnostic(code(noae::too_small))]
    TooSmall { expected: usize, received: usize },

    #[error("unsupported container format {got} (expected 2)")]
    #[diagnostic(code(noae::unsupported_format))]
    UnsupportedFormat { got: u32 },

    #[error("invalid trailer: expected terminator 0xFF at offset {offset}, found {got:#04x}")]
    #[diagnostic(code(noae::invalid_trailer))]
    InvalidTrailer { offset: usize, got: u8 },

    #[error("terminator at offset {offset} lost after block decrypt (found {got:#04x})")]
    #[diagnostic(code(noae::round_integrity))]
    RoundIntegrity { offset: usize, got: u8 },

    #[error("checksum {which} mismatch (expected {expected:#010x}, computed {got:#010x})")]
    #[diagnostic(code(noae::checksum_mismatch))]
    ChecksumMismatch { which: u8, expected: u32, got: u32 },

    #[error("truncated {region} stream: need {needed} more at position {position} of {size}")]
    #[diagnostic(code(noae::truncated_stream))]
    TruncatedStream {
        region: &'static str,
        position: usize,
        needed: usize,
        size: usize,
    },

    #[error("copy of {length} bytes at {position} overruns output of {size} bytes")]
    #[diagnostic(code(noae::output_overrun))]
    OutputOverrun {
        position: usize,
        length: usize,
        size: usize,
    },

    #[error("back-reference distance {distance} is invalid at output position {position}")]
    #[diagnostic(code(noae::invalid_back_reference))]
    InvalidBackReference { distance: usize, position: usize },

    #[error("invalid opcode {opcode:#04x} at flag position {position}")]
    #[diagnostic(code(noae::invalid_opcode))]
    InvalidOpcode { opcode: u8, position: usize },

    #[error("decompressed size mismatch (header says {header} bytes, stream says {stream} bytes)")]
    #[diagnostic(code(noae::size_hint_mismatch))]
    SizeHintMismatch { header: u32, stream: u32 },

    #[error("integer overflow")]
    #[diagnostic(code(noae::integer_overflow))]
    IntegerOverflow,
}
