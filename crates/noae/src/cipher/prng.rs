const BASE_MULTIPLIER: i32 = 0x3B9A_73C9;
const INCREMENT: i32 = 0x2F09;

/// Linear congruential generator feeding every keyed round.
#[derive(Clone, Debug)]
pub struct Lcg {
    current: i32,
    multiplier: i32,
}

impl Lcg {
    /// Create a generator with the base multiplier.
    pub fn new(seed: i32) -> Self {
        Self::with_offset(seed, 0)
    }

    /// Create a generator whose multiplier is shifted by `offset`.
    pub fn with_offset(seed: i32, offset: u32) -> Self {
        Self {
            current: seed,
            multiplier: BASE_MULTIPLIER.wrapping_add(offset as i32),
        }
    }

    /// Advance the state and return it.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> i32 {
        self.current = self
            .multiplier
            .wrapping_mul(self.current)
            .wrapping_add(INCREMENT);
        self.current
    }

    /// Advance and return bits 16..30 of the new state.
    pub fn next_high(&mut self) -> u16 {
        ((self.next() as u32 >> 16) & 0x7FFF) as u16
    }
}
