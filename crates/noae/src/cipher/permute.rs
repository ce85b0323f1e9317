use super::prng::Lcg;

/// Largest window touched by one permutation pass.
pub(crate) const WINDOW_SIZE: usize = 0x800;

/// Parameters of one bit-permutation pass.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PermutePass {
    pub seed: i32,
    pub multiplier_offset: u32,
    pub block_size: usize,
}

/// Pass over the tail of the raw payload, undone before the stream cipher.
pub(crate) const TAIL_PASS: PermutePass = PermutePass {
    seed: 0x6D73,
    multiplier_offset: 0,
    block_size: 0x100,
};

/// Pass over the head of the checksummed payload; keyed by the trailer.
pub(crate) fn head_pass(multiplier_offset: u32) -> PermutePass {
    PermutePass {
        seed: 0x728F,
        multiplier_offset,
        block_size: 0x80,
    }
}

/// Swap bit pairs in `window` block by block.
///
/// Every pair is disjoint, so running the same pass twice restores the input.
pub(crate) fn permute_bits(window: &mut [u8], pass: PermutePass) {
    let mut random = Lcg::with_offset(pass.seed, pass.multiplier_offset);
    let mut candidates: Vec<u16> = Vec::with_capacity(pass.block_size * 8);
    let mut order: Vec<u16> = Vec::with_capacity(pass.block_size * 8);

    for block in window.chunks_mut(pass.block_size) {
        let bit_count = block.len() * 8;

        candidates.clear();
        candidates.extend(0..bit_count as u16);

        // Removal keeps the remaining candidates in order; the draw depends on it.
        order.clear();
        while !candidates.is_empty() {
            let index = usize::from(random.next_high()) % candidates.len();
            order.push(candidates.remove(index));
        }

        for pair in order.chunks_exact(2) {
            swap_bits(block, pair[0], pair[1]);
        }
    }
}

fn swap_bits(block: &mut [u8], first: u16, second: u16) {
    let (pos1, shift1) = (usize::from(first >> 3), first & 7);
    let (pos2, shift2) = (usize::from(second >> 3), second & 7);

    let mask1 = 1u8 << shift1;
    let bit1 = (block[pos1] & mask1) >> shift1;
    block[pos1] &= !mask1;

    let mask2 = 1u8 << shift2;
    let bit2 = (block[pos2] & mask2) >> shift2;
    block[pos2] &= !mask2;

    block[pos1] |= bit2 << shift1;
    block[pos2] |= bit1 << shift2;
}
