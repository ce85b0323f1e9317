use super::prng::Lcg;
use byteorder::{BigEndian, ByteOrder};

const SEED: i32 = 0xC979;
const THRESHOLD: u32 = 0x9A9;

/// Key word and whether it is XORed in, for one 16-bit position.
#[inline]
pub(crate) fn word_key(random: &mut Lcg) -> (u16, bool) {
    let t0 = random.next_high();
    let t1 = ((u64::from(t0) * 0x6A00_9F01) >> 32) as u32;
    let t1 = (t1 >> 11).wrapping_mul(0x1352);
    (t0, u32::from(t0).wrapping_sub(t1) >= THRESHOLD)
}

/// Decrypt big-endian 16-bit words in place. An odd trailing byte is kept.
pub(crate) fn decrypt_words(data: &mut [u8]) {
    let mut random = Lcg::new(SEED);
    for word in data.chunks_exact_mut(2) {
        let (key, mix) = word_key(&mut random);
        let mut value = BigEndian::read_u16(word);
        if mix {
            value ^= key;
        }
        value = value.wrapping_sub(key);
        BigEndian::write_u16(word, value);
    }
}
