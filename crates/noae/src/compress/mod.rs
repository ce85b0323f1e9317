pub mod flags;
pub mod lz;

pub use flags::decode_flags;
pub use lz::Layout;
