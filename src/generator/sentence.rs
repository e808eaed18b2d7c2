use super::formatter::capitalize_first_letter;
use super::policy::{Selection, SelectionPolicy};
use super::shuffle::{item_seed, seeded_rng, shuffle_options, CHOICE_SALT, SENTENCE_SALT};
use super::template::templates;
use crate::curriculum::{
    curated, Difficulty, FillBlank, Question, SentenceHint, SentenceItem, Served, BLANK,
};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const DISTRACTORS: [&str; 6] = ["other", "word", "test", "thing", "place", "time"];

/// Options in the word-order multiple choice, the correct sentence included
pub const CHOICE_COUNT: usize = 4;
const CHOICE_PROMPT: &str = "Choose the correct sentence:";

/// Which token a generated sentence blanks out
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlankPosition {
    /// `floor(len / 2)`
    #[default]
    Midpoint,
    /// Always the second token, as the simple legacy drills did
    Second,
}

impl BlankPosition {
    pub fn position(self, word_count: usize) -> usize {
        let pos = match self {
            BlankPosition::Midpoint => word_count / 2,
            BlankPosition::Second => 1,
        };
        pos.min(word_count.saturating_sub(1))
    }
}

pub(crate) fn serve(
    policy: &dyn SelectionPolicy,
    blank: BlankPosition,
    difficulty: Difficulty,
    index: u64,
) -> Served<SentenceItem> {
    let bank = curated().sentences.tier(difficulty);
    match policy.select(index, bank.len()) {
        Selection::Curated(i) => {
            debug!("sentences/{difficulty} #{index}: curated #{i}");
            Served::curated(bank[i].clone())
        }
        Selection::Generated(n) => {
            debug!("sentences/{difficulty} #{index}: generated #{n}");
            Served::generated(generate(difficulty, n, blank))
        }
    }
}

/// Build a sentence drill from the templates, ignoring the curated bank.
pub fn generate(difficulty: Difficulty, index: u64, blank: BlankPosition) -> SentenceItem {
    let (variant, within) = templates().sentence_bucket(difficulty).pick(index);
    let surface = capitalize_first_letter(&variant.render(within));
    let seed = item_seed(SENTENCE_SALT, difficulty, index);
    let item = build_item(&surface, blank.position(surface.split_whitespace().count()), seed);
    with_practice(item, item_seed(CHOICE_SALT, difficulty, index))
}

/// Fill in the word-order multiple choice and the word hint.
pub fn with_practice(mut item: SentenceItem, seed: u64) -> SentenceItem {
    let mut rng = seeded_rng(seed);
    item.multiple_choice = order_choices(&item.words, &item.correct, &mut rng);
    item.hint = if item.words.is_empty() {
        SentenceHint::default()
    } else {
        let at = rng.gen_range(0..item.words.len());
        SentenceHint {
            position: at + 1,
            word: item.words[at].clone(),
        }
    };
    item
}

/// The correct sentence against reversed, shuffled and rotated word orders.
/// Orders that coincide are replaced by adjacent-word swaps.
fn order_choices(words: &[String], correct: &str, rng: &mut impl Rng) -> Question {
    let mut reversed = words.to_vec();
    reversed.reverse();
    let mut shuffled = words.to_vec();
    shuffled.shuffle(rng);
    let mut rotated = words.to_vec();
    if !rotated.is_empty() {
        rotated.rotate_left(1);
    }
    let swaps = (1..words.len()).map(|k| {
        let mut swapped = words.to_vec();
        swapped.swap(k - 1, k);
        swapped
    });

    let mut options = vec![correct.to_string()];
    for candidate in [reversed, shuffled, rotated].into_iter().chain(swaps) {
        if options.len() == CHOICE_COUNT {
            break;
        }
        let text = candidate.join(" ");
        if !options.contains(&text) {
            options.push(text);
        }
    }

    let (options, correct_index) = shuffle_options(options, 0, rng.gen());
    Question {
        question: CHOICE_PROMPT.to_string(),
        options,
        correct_index,
    }
}

fn build_item(surface: &str, blank_at: usize, seed: u64) -> SentenceItem {
    let words: Vec<String> = surface.split_whitespace().map(str::to_string).collect();
    let answer = words.get(blank_at).cloned().unwrap_or_default();

    let blanked = words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == blank_at { BLANK } else { w.as_str() })
        .collect::<Vec<_>>()
        .join(" ");

    let mut options = vec![answer.clone()];
    options.extend(
        DISTRACTORS
            .iter()
            .filter(|d| !d.eq_ignore_ascii_case(&answer))
            .take(3)
            .map(|d| d.to_string()),
    );
    let (options, _) = shuffle_options(options, 0, seed);

    SentenceItem {
        correct: words.join(" "),
        words,
        fill_blank: FillBlank {
            sentence: format!("{blanked}."),
            answer,
            options,
        },
        multiple_choice: Question::default(),
        hint: SentenceHint::default(),
    }
}
