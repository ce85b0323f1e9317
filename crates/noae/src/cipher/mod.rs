pub mod block;
pub mod permute;
pub mod prng;
pub mod stream;

pub use block::TrailerKeys;
pub use prng::Lcg;
