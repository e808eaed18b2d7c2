use super::difficulty::Difficulty;
use super::records::{MatchPair, ReadingItem, ScrambleItem, SentenceItem, VocabularyItem};
use crate::generator::sentence::with_practice;
use crate::generator::shuffle::{item_seed, CHOICE_SALT};
use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/curriculum/data");

/// One array of items per difficulty tier. Order matters: the hybrid policy
/// serves a bank front to back before any generated content appears.
#[derive(Deserialize, Clone, Debug)]
pub struct TieredBank<T> {
    pub basic: Vec<T>,
    pub intermediate: Vec<T>,
    pub medium: Vec<T>,
}

impl<T> TieredBank<T> {
    pub fn tier(&self, difficulty: Difficulty) -> &[T] {
        match difficulty {
            Difficulty::Basic => &self.basic,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Medium => &self.medium,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Vec<T>) -> Vec<U>) -> TieredBank<U> {
        TieredBank {
            basic: f(self.basic),
            intermediate: f(self.intermediate),
            medium: f(self.medium),
        }
    }

    pub fn map_tiers<U>(self, mut f: impl FnMut(Difficulty, Vec<T>) -> Vec<U>) -> TieredBank<U> {
        TieredBank {
            basic: f(Difficulty::Basic, self.basic),
            intermediate: f(Difficulty::Intermediate, self.intermediate),
            medium: f(Difficulty::Medium, self.medium),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CuratedBanks {
    pub vocabulary: TieredBank<VocabularyItem>,
    pub sentences: TieredBank<SentenceItem>,
    pub reading: TieredBank<ReadingItem>,
    pub listening: TieredBank<String>,
    pub scramble: TieredBank<ScrambleItem>,
    pub matching: TieredBank<MatchPair>,
}

impl CuratedBanks {
    fn load() -> Self {
        Self {
            vocabulary: read_bank("vocabulary.json"),
            sentences: read_bank::<SentenceItem>("sentences.json").map_tiers(|difficulty, items| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        with_practice(item, item_seed(CHOICE_SALT, difficulty, i as u64))
                    })
                    .collect()
            }),
            reading: read_bank("reading.json"),
            listening: read_bank("listening.json"),
            scramble: read_bank("scramble.json"),
            matching: read_bank("matching.json"),
        }
    }
}

/// Shared, lazily parsed curated content. Never mutated after first use.
pub fn curated() -> &'static CuratedBanks {
    static BANKS: OnceLock<CuratedBanks> = OnceLock::new();
    BANKS.get_or_init(CuratedBanks::load)
}

fn read_bank<T: DeserializeOwned>(file_name: &str) -> TieredBank<T> {
    let file = DATA_DIR
        .get_file(file_name)
        .unwrap_or_else(|| panic!("Curated bank {file_name} not embedded"));

    let contents = file
        .contents_utf8()
        .expect("Unable to interpret curated bank as a string");

    serde_json::from_str(contents)
        .unwrap_or_else(|e| panic!("Unable to deserialize curated bank {file_name}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_content() {
        let banks = curated();
        for d in Difficulty::ALL {
            assert!(!banks.vocabulary.tier(d).is_empty());
            assert!(!banks.sentences.tier(d).is_empty());
            assert!(!banks.reading.tier(d).is_empty());
            assert!(!banks.listening.tier(d).is_empty());
            assert!(!banks.scramble.tier(d).is_empty());
            assert!(banks.matching.tier(d).len() >= 2);
        }
    }

    #[test]
    fn basic_sentence_bank_starts_with_known_item() {
        let first = &curated().sentences.tier(Difficulty::Basic)[0];
        assert_eq!(first.correct, "I am happy today");
        assert_eq!(first.fill_blank.answer, "am");
        assert_eq!(curated().sentences.tier(Difficulty::Basic).len(), 5);
    }

    #[test]
    fn curated_quiz_answers_point_at_an_option() {
        for d in Difficulty::ALL {
            for item in curated().vocabulary.tier(d) {
                assert!(item.quiz.correct_option().is_some(), "{}", item.word);
            }
        }
    }

    #[test]
    fn curated_words_and_surface_agree() {
        for d in Difficulty::ALL {
            for item in curated().sentences.tier(d) {
                assert_eq!(item.words.join(" "), item.correct);
                assert!(item.fill_blank.options.contains(&item.fill_blank.answer));
            }
        }
    }

    #[test]
    fn scrambles_are_anagrams() {
        for d in Difficulty::ALL {
            for s in curated().scramble.tier(d) {
                let mut a: Vec<char> = s.word.chars().collect();
                let mut b: Vec<char> = s.scrambled.chars().collect();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b, "{}", s.word);
            }
        }
    }
}
