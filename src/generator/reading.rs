use super::formatter::{capitalize_first_letter, SentenceFormatter, TextFormatter, TitleFormatter};
use super::policy::{Selection, SelectionPolicy};
use super::pool::fill_template;
use super::radix;
use super::shuffle::{item_seed, shuffle_options, READING_SALT};
use super::template::{templates, ReadingTemplate};
use crate::curriculum::{curated, Difficulty, Question, ReadingItem, Served};
use log::debug;

/// Options per comprehension question, the answer included
const OPTION_COUNT: usize = 4;

pub(crate) fn serve(
    policy: &dyn SelectionPolicy,
    difficulty: Difficulty,
    index: u64,
) -> Served<ReadingItem> {
    let bank = curated().reading.tier(difficulty);
    match policy.select(index, bank.len()) {
        Selection::Curated(i) => {
            debug!("reading/{difficulty} #{index}: curated #{i}");
            Served::curated(bank[i].clone())
        }
        Selection::Generated(n) => {
            debug!("reading/{difficulty} #{index}: generated #{n}");
            Served::generated(generate(difficulty, n))
        }
    }
}

/// Compose a short passage with comprehension questions.
pub fn generate(difficulty: Difficulty, index: u64) -> ReadingItem {
    let (template, within) = templates().reading_bucket(difficulty).pick(index);
    let tokens = template.slots.tokens(within);
    let spec = &template.spec;

    let title = TitleFormatter.format(&[&fill_template(&spec.title, &tokens)]);
    let sentences: Vec<String> = spec
        .sentences
        .iter()
        .map(|s| SentenceFormatter.format(&[&fill_template(s, &tokens)]))
        .collect();

    let digits = radix::decode(within, &template.slots.radices());
    let base_seed = item_seed(READING_SALT, difficulty, index);
    let questions = spec
        .questions
        .iter()
        .enumerate()
        .filter_map(|(n, q)| {
            let options = answer_options(template, &digits, &q.slot)?;
            let seed = base_seed.wrapping_add(n as u64);
            let (options, correct_index) = shuffle_options(options, 0, seed);
            Some(Question {
                question: fill_template(&q.prompt, &tokens),
                options,
                correct_index,
            })
        })
        .collect();

    let dictation = sentences
        .get(spec.dictation)
        .or_else(|| sentences.first())
        .cloned()
        .unwrap_or_default();

    ReadingItem {
        title,
        text: sentences.join(" "),
        questions,
        dictation,
    }
}

/// Correct token for `slot` followed by its neighbours in the same pool.
fn answer_options(template: &ReadingTemplate, digits: &[usize], slot: &str) -> Option<Vec<String>> {
    let position = template.slots.slots.iter().position(|p| p.name == slot)?;
    let pool = &template.slots.slots[position];
    let digit = digits[position];
    Some(
        (0..OPTION_COUNT)
            .map(|k| capitalize_first_letter(pool.token(digit + k)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::policy::CyclicReplay;
    use std::collections::HashSet;

    #[test]
    fn passage_is_assembled_from_one_tuple() {
        let item = generate(Difficulty::Basic, 0);
        assert_eq!(item.title, "Why Walking in the Park Is Good");
        assert!(item.text.starts_with("Many people enjoy walking in the park."));
        assert_eq!(item.dictation, "It makes us feel happy.");
        assert_eq!(item.questions.len(), 3);
    }

    #[test]
    fn questions_are_answerable_from_the_text() {
        for d in Difficulty::ALL {
            for i in 0..30 {
                let item = generate(d, i);
                for q in &item.questions {
                    let answer = q.options[q.correct_index].to_lowercase();
                    assert!(item.text.to_lowercase().contains(&answer), "{d} #{i}: {answer}");
                    let unique: HashSet<&String> = q.options.iter().collect();
                    assert_eq!(unique.len(), OPTION_COUNT);
                }
                assert!(item.text.contains(&item.dictation));
                assert!(!item.title.contains('{'));
            }
        }
    }

    #[test]
    fn variants_rotate_before_tokens_advance() {
        let a = generate(Difficulty::Medium, 0);
        let b = generate(Difficulty::Medium, 1);
        assert_ne!(a.title, b.title);
    }

    #[test]
    fn tail_mixes_curated_and_generated() {
        let count = curated().reading.tier(Difficulty::Basic).len() as u64;
        let policy = CyclicReplay::default();
        assert!(serve(&policy, Difficulty::Basic, count).is_curated());
        assert!(!serve(&policy, Difficulty::Basic, count + 1).is_curated());
    }
}
