use super::policy::{CuratedOnly, Selection, SelectionPolicy};
use super::sentence::{self, BlankPosition};
use super::shuffle::{item_seed, scramble_letters, SCRAMBLE_SALT};
use super::vocabulary::word_entries;
use crate::curriculum::{curated, Difficulty, ListeningItem, MatchingSet, ScrambleItem, Served};
use itertools::Itertools;
use log::debug;

/// Pairs in one matching round
pub const MATCH_SET_SIZE: usize = 5;

/// Listening cycles through the curated sentences only.
pub(crate) fn listening(difficulty: Difficulty, index: u64) -> Served<ListeningItem> {
    let sentences = curated().listening.tier(difficulty);
    let words = curated().vocabulary.tier(difficulty);
    let target_word = if words.is_empty() {
        String::new()
    } else {
        words[(index % words.len() as u64) as usize].word.clone()
    };

    match CuratedOnly.select(index, sentences.len()) {
        Selection::Curated(i) => {
            debug!("listening/{difficulty} #{index}: curated #{i}");
            Served::curated(ListeningItem {
                sentence: sentences[i].clone(),
                target_word,
            })
        }
        Selection::Generated(n) => {
            debug!("listening/{difficulty} #{index}: generated #{n}");
            let item = sentence::generate(difficulty, n, BlankPosition::Midpoint);
            Served::generated(ListeningItem {
                sentence: format!("{}.", item.correct),
                target_word,
            })
        }
    }
}

pub(crate) fn scramble(
    policy: &dyn SelectionPolicy,
    difficulty: Difficulty,
    index: u64,
) -> Served<ScrambleItem> {
    let bank = curated().scramble.tier(difficulty);
    match policy.select(index, bank.len()) {
        Selection::Curated(i) => {
            debug!("scramble/{difficulty} #{index}: curated #{i}");
            Served::curated(bank[i].clone())
        }
        Selection::Generated(n) => {
            debug!("scramble/{difficulty} #{index}: generated #{n}");
            Served::generated(generate_scramble(difficulty, n))
        }
    }
}

pub fn generate_scramble(difficulty: Difficulty, index: u64) -> ScrambleItem {
    let entries = word_entries(difficulty);
    let entry = &entries[(index % entries.len() as u64) as usize];
    ScrambleItem {
        word: entry.word.to_uppercase(),
        scrambled: scramble_letters(&entry.word, item_seed(SCRAMBLE_SALT, difficulty, index)),
        hint: entry.meaning.clone(),
    }
}

/// The curated pairs form a single set, so the tail alternates that set with
/// generated ones on the policy's cycle.
pub(crate) fn matching(
    policy: &dyn SelectionPolicy,
    difficulty: Difficulty,
    index: u64,
) -> Served<MatchingSet> {
    let pairs = curated().matching.tier(difficulty);
    let sets = usize::from(!pairs.is_empty());
    match policy.select(index, sets) {
        Selection::Curated(_) => {
            debug!("matching/{difficulty} #{index}: curated");
            Served::curated(MatchingSet { pairs: pairs.to_vec() })
        }
        Selection::Generated(n) => {
            debug!("matching/{difficulty} #{index}: generated #{n}");
            Served::generated(generate_matching(difficulty, n))
        }
    }
}

/// Consecutive template words starting at `index mod N`, wrapping around.
pub fn generate_matching(difficulty: Difficulty, index: u64) -> MatchingSet {
    let entries = word_entries(difficulty);
    let start = (index % entries.len() as u64) as usize;
    let pairs = entries
        .iter()
        .cycle()
        .skip(start)
        .take(MATCH_SET_SIZE.min(entries.len()))
        .cloned()
        .collect_vec();
    MatchingSet { pairs }
}
