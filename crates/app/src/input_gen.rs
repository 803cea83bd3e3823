//! Sample data for the `demo` subcommand.
//!
//! Generated data mixes sections with very different symbol distributions, so
//! the resulting code has a wide spread of codeword lengths:
//! - Text-like sections drawn from a small alphabet with skewed weights
//! - Long runs of a single byte
//! - Uniformly random bytes, which Huffman coding can't shrink

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters roughly in English frequency order, most common first.
const TEXT_ALPHABET: &[u8] = b" etaoinshrdlcumwfgypbvkjxqz.,\n";

/// Generate `size_bytes` of sample data, fully determined by `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(256..=4096));

        match rng.gen_range(0..10u8) {
            // 60% text-like
            0..=5 => data.extend((0..section).map(|_| skewed_letter(&mut rng))),

            // 20% runs
            6..=7 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }

            // 20% random bytes
            _ => data.extend((0..section).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

/// Pick a letter with roughly geometric weights over `TEXT_ALPHABET`.
fn skewed_letter(rng: &mut ChaCha8Rng) -> u8 {
    let mut idx = 0;
    while idx + 1 < TEXT_ALPHABET.len() && rng.gen_bool(0.2) {
        idx += 1;
    }
    TEXT_ALPHABET[idx]
}
