use super::formatter::{capitalize_first_letter, SentenceFormatter, TextFormatter};
use super::policy::{Selection, SelectionPolicy};
use super::pool::fill_template;
use super::shuffle::{item_seed, shuffle_options, VOCABULARY_SALT};
use super::radix;
use super::template::templates;
use crate::curriculum::{curated, Difficulty, MatchPair, Question, Served, VocabularyItem};
use log::debug;

pub const QUIZ_DISTRACTORS: [&str; 3] = [
    "Something unrelated",
    "The opposite meaning",
    "A different concept",
];

pub(crate) fn serve(
    policy: &dyn SelectionPolicy,
    difficulty: Difficulty,
    index: u64,
) -> Served<VocabularyItem> {
    let bank = curated().vocabulary.tier(difficulty);
    match policy.select(index, bank.len()) {
        Selection::Curated(i) => {
            debug!("vocabulary/{difficulty} #{index}: curated #{i}");
            Served::curated(bank[i].clone())
        }
        Selection::Generated(n) => {
            debug!("vocabulary/{difficulty} #{index}: generated #{n}");
            Served::generated(generate(difficulty, n))
        }
    }
}

/// Build a vocabulary card from the word-type templates.
///
/// The word type rotates with `index` (three types on the basic tier, two
/// above it); the remaining quotient picks the word and the example context.
pub fn generate(difficulty: Difficulty, index: u64) -> VocabularyItem {
    let (template, within) = templates().vocabulary_bucket(difficulty).pick(index);
    // `word` is the least significant slot
    let word_slot = radix::decode(within, &template.slots.radices())[0];

    let spec = &template.spec;
    let word = capitalize_first_letter(&spec.entries.words[word_slot]);
    let gloss = spec.glosses[word_slot].as_str();
    let definition = fill_template(&spec.definition, &[("gloss", gloss)]);

    let example = fill_template(&spec.example, &template.slots.tokens(within));
    let example = SentenceFormatter.format(&[&example]);

    let mut options = vec![definition.clone()];
    options.extend(QUIZ_DISTRACTORS.iter().map(|d| d.to_string()));
    let seed = item_seed(VOCABULARY_SALT, difficulty, index);
    let (options, correct_index) = shuffle_options(options, 0, seed);

    VocabularyItem {
        pronunciation: spec.pronunciations[word_slot].clone(),
        quiz: Question {
            question: fill_template(&spec.question, &[("word", &word)]),
            options,
            correct_index,
        },
        word,
        definition,
        example,
    }
}

/// Every template word of a tier with its definition, word types in bucket order
pub(crate) fn word_entries(difficulty: Difficulty) -> Vec<MatchPair> {
    templates()
        .vocabulary
        .tier(difficulty)
        .iter()
        .flat_map(|t| {
            let spec = &t.spec;
            spec.entries.words.iter().zip(&spec.glosses).map(move |(word, gloss)| MatchPair {
                word: capitalize_first_letter(word),
                meaning: fill_template(&spec.definition, &[("gloss", gloss)]),
            })
        })
        .collect()
}
