use crate::curriculum::Difficulty;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const VOCABULARY_SALT: u64 = 0x766f_6361_6200_0001;
pub const SENTENCE_SALT: u64 = 0x7365_6e74_0000_0002;
pub const READING_SALT: u64 = 0x7265_6164_0000_0003;
pub const SCRAMBLE_SALT: u64 = 0x7363_7261_0000_0004;
pub const CHOICE_SALT: u64 = 0x6368_6f69_0000_0005;

/// Seed for one generated item
pub fn item_seed(salt: u64, difficulty: Difficulty, index: u64) -> u64 {
    index.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt ^ ((difficulty as u64) << 56)
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Shuffle `options` and report where `options[correct]` ended up.
pub fn shuffle_options(
    mut options: Vec<String>,
    correct: usize,
    seed: u64,
) -> (Vec<String>, usize) {
    let answer = options.get(correct).cloned();
    options.shuffle(&mut seeded_rng(seed));
    let index = answer
        .and_then(|a| options.iter().position(|o| *o == a))
        .unwrap_or(0);
    (options, index)
}

/// Uppercase letter scramble that differs from the word whenever the
/// letters allow it.
pub fn scramble_letters(word: &str, seed: u64) -> String {
    let upper = word.to_uppercase();
    let mut letters: Vec<char> = upper.chars().collect();
    letters.shuffle(&mut seeded_rng(seed));

    let mut scrambled: String = letters.iter().collect();
    if scrambled == upper {
        letters.rotate_left(1);
        scrambled = letters.iter().collect();
    }
    scrambled
}

/// Fresh random order for presentation, e.g. the tiles of a word-order drill
pub fn display_shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(&mut rand::thread_rng());
    out
}
