use crate::curriculum::{
    ExerciseRecord, ListeningItem, MatchingSet, Question, ScrambleItem, SentenceItem,
};
use crate::error::{Error, Result};
use itertools::Itertools;
use serde::Serialize;

pub const MAX_ANSWER_CHARS: usize = 500;

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        if ok {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// Result of grading one answer, with the expected answer for feedback
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub outcome: Outcome,
    pub expected: String,
}

/// Reject blank or oversized input before it is compared or stored.
pub fn validate_user_answer(answer: &str) -> Result<&str> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidAnswer("answer is empty".into()));
    }
    if trimmed.chars().count() > MAX_ANSWER_CHARS {
        return Err(Error::InvalidAnswer(format!(
            "answer is longer than {MAX_ANSWER_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

fn normalize(text: &str) -> String {
    text.split_whitespace().map(str::to_lowercase).join(" ")
}

/// Lowercase words with surrounding punctuation removed
fn normalize_loose(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .join(" ")
}

pub fn check_sentence(item: &SentenceItem, answer: &str) -> Outcome {
    (normalize(answer) == normalize(&item.correct)).into()
}

pub fn check_fill_blank(item: &SentenceItem, answer: &str) -> Outcome {
    answer.trim().eq_ignore_ascii_case(item.fill_blank.answer.trim()).into()
}

pub fn check_choice(quiz: &Question, index: usize) -> Outcome {
    (index == quiz.correct_index).into()
}

pub fn check_scramble(item: &ScrambleItem, answer: &str) -> Outcome {
    answer.trim().eq_ignore_ascii_case(item.word.trim()).into()
}

/// Dictation is graded on words only; case and punctuation are ignored.
pub fn check_dictation(item: &ListeningItem, answer: &str) -> Outcome {
    (normalize_loose(answer) == normalize_loose(&item.sentence)).into()
}

/// Every pair must be matched; order does not matter.
pub fn check_matching(set: &MatchingSet, pairs: &[(String, String)]) -> Outcome {
    if pairs.len() != set.pairs.len() {
        return Outcome::Incorrect;
    }
    set.pairs
        .iter()
        .all(|expected| {
            pairs.iter().any(|(word, meaning)| {
                word.trim().eq_ignore_ascii_case(&expected.word)
                    && normalize(meaning) == normalize(&expected.meaning)
            })
        })
        .into()
}

/// Grade free-form CLI input against any record.
///
/// - vocabulary: option number (1-based) or the definition text
/// - sentences: the number of the correctly ordered sentence, the missing
///   word, or the full sentence
/// - reading: comma separated option numbers, one per question
/// - listening: the transcribed sentence
/// - scramble: the unscrambled word
/// - matching: `word=meaning` pairs separated by `;`
pub fn grade(record: &ExerciseRecord, answer: &str) -> Result<Grade> {
    let answer = validate_user_answer(answer)?;
    let grade = match record {
        ExerciseRecord::Vocabulary(v) => Grade {
            outcome: choice_outcome(&v.quiz, answer),
            expected: v.quiz.correct_option().unwrap_or_default().to_string(),
        },
        ExerciseRecord::Sentences(s) => {
            if answer.parse::<usize>().is_ok() {
                Grade {
                    outcome: choice_outcome(&s.multiple_choice, answer),
                    expected: s.correct.clone(),
                }
            } else if answer.split_whitespace().count() > 1 {
                Grade {
                    outcome: check_sentence(s, answer),
                    expected: s.correct.clone(),
                }
            } else {
                Grade {
                    outcome: check_fill_blank(s, answer),
                    expected: s.fill_blank.answer.clone(),
                }
            }
        }
        ExerciseRecord::Reading(r) => {
            let picks = answer.split(',').map(str::trim).collect_vec();
            if picks.len() != r.questions.len() {
                return Err(Error::InvalidAnswer(format!(
                    "expected {} answers, got {}",
                    r.questions.len(),
                    picks.len()
                )));
            }
            let all = r
                .questions
                .iter()
                .zip(&picks)
                .all(|(q, pick)| choice_outcome(q, pick) == Outcome::Correct);
            Grade {
                outcome: all.into(),
                expected: r.questions.iter().map(|q| (q.correct_index + 1).to_string()).join(","),
            }
        }
        ExerciseRecord::Listening(l) => Grade {
            outcome: check_dictation(l, answer),
            expected: l.sentence.clone(),
        },
        ExerciseRecord::Scramble(s) => Grade {
            outcome: check_scramble(s, answer),
            expected: s.word.clone(),
        },
        ExerciseRecord::Matching(m) => {
            let pairs = answer
                .split(';')
                .filter(|p| !p.trim().is_empty())
                .map(|p| {
                    p.split_once('=')
                        .map(|(w, m)| (w.trim().to_string(), m.trim().to_string()))
                        .ok_or_else(|| {
                            Error::InvalidAnswer(format!("expected word=meaning, got {p:?}"))
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            Grade {
                outcome: check_matching(m, &pairs),
                expected: m.pairs.iter().map(|p| format!("{}={}", p.word, p.meaning)).join("; "),
            }
        }
    };
    Ok(grade)
}

/// A number picks the 1-based option; anything else is compared as text.
fn choice_outcome(quiz: &Question, answer: &str) -> Outcome {
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 => check_choice(quiz, n - 1),
        Ok(_) => Outcome::Incorrect,
        Err(_) => quiz
            .correct_option()
            .is_some_and(|o| normalize(o) == normalize(answer))
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{FillBlank, MatchPair, ReadingItem, SentenceHint};
    use assert_matches::assert_matches;

    fn sentence() -> SentenceItem {
        SentenceItem {
            words: vec!["I".into(), "am".into(), "happy".into(), "today".into()],
            correct: "I am happy today".into(),
            fill_blank: FillBlank {
                sentence: "I ___ happy today.".into(),
                answer: "am".into(),
                options: vec!["am".into(), "is".into(), "are".into(), "be".into()],
            },
            multiple_choice: Question {
                question: "Choose the correct sentence:".into(),
                options: vec!["today happy am I".into(), "I am happy today".into()],
                correct_index: 1,
            },
            hint: SentenceHint {
                position: 3,
                word: "happy".into(),
            },
        }
    }

    fn quiz() -> Question {
        Question {
            question: "What does 'Happy' mean?".into(),
            options: vec!["Sad".into(), "Feeling joy".into()],
            correct_index: 1,
        }
    }

    #[test]
    fn sentence_ignores_case_and_spacing() {
        assert_eq!(check_sentence(&sentence(), "  i AM   happy today "), Outcome::Correct);
        assert_eq!(check_sentence(&sentence(), "I happy am today"), Outcome::Incorrect);
    }

    #[test]
    fn fill_blank_trims() {
        assert_eq!(check_fill_blank(&sentence(), " AM "), Outcome::Correct);
        assert_eq!(check_fill_blank(&sentence(), "is"), Outcome::Incorrect);
    }

    #[test]
    fn choice_by_number_or_text() {
        assert_eq!(check_choice(&quiz(), 1), Outcome::Correct);
        assert_eq!(choice_outcome(&quiz(), "2"), Outcome::Correct);
        assert_eq!(choice_outcome(&quiz(), "0"), Outcome::Incorrect);
        assert_eq!(choice_outcome(&quiz(), "feeling JOY"), Outcome::Correct);
    }

    #[test]
    fn dictation_ignores_punctuation() {
        let item = ListeningItem {
            sentence: "Hello, how are you today?".into(),
            target_word: "Happy".into(),
        };
        assert_eq!(check_dictation(&item, "hello how are you today"), Outcome::Correct);
        assert_eq!(check_dictation(&item, "hello how are you"), Outcome::Incorrect);
    }

    #[test]
    fn answer_validation() {
        assert_matches!(validate_user_answer("   "), Err(Error::InvalidAnswer(_)));
        assert_matches!(validate_user_answer(&"a".repeat(501)), Err(Error::InvalidAnswer(_)));
        assert_eq!(validate_user_answer(" ok ").unwrap(), "ok");
    }

    #[test]
    fn grade_reading_needs_one_answer_per_question() {
        let record = ExerciseRecord::Reading(ReadingItem {
            title: "T".into(),
            text: "Some text here.".into(),
            questions: vec![quiz(), quiz()],
            dictation: "Some text here.".into(),
        });
        assert_matches!(grade(&record, "2"), Err(Error::InvalidAnswer(_)));
        let g = grade(&record, "2, 2").unwrap();
        assert_eq!(g.outcome, Outcome::Correct);
        assert_eq!(g.expected, "2,2");
        assert_eq!(grade(&record, "2,1").unwrap().outcome, Outcome::Incorrect);
    }

    #[test]
    fn grade_matching_pairs() {
        let record = ExerciseRecord::Matching(MatchingSet {
            pairs: vec![
                MatchPair {
                    word: "Happy".into(),
                    meaning: "Feeling joyful".into(),
                },
                MatchPair {
                    word: "Book".into(),
                    meaning: "Pages bound together".into(),
                },
            ],
        });
        let g = grade(&record, "book=pages bound together; happy=Feeling joyful").unwrap();
        assert_eq!(g.outcome, Outcome::Correct);
        assert_matches!(grade(&record, "happy"), Err(Error::InvalidAnswer(_)));
        assert_eq!(grade(&record, "happy=Feeling joyful").unwrap().outcome, Outcome::Incorrect);
    }

    #[test]
    fn grade_sentence_picks_mode_by_word_count() {
        let record = ExerciseRecord::Sentences(sentence());
        assert_eq!(grade(&record, "am").unwrap().outcome, Outcome::Correct);
        assert_eq!(grade(&record, "I am happy today").unwrap().outcome, Outcome::Correct);
        assert_eq!(grade(&record, "I am sad today").unwrap().expected, "I am happy today");
    }

    #[test]
    fn grade_sentence_choice_by_number() {
        let record = ExerciseRecord::Sentences(sentence());
        let g = grade(&record, "2").unwrap();
        assert_eq!(g.outcome, Outcome::Correct);
        assert_eq!(g.expected, "I am happy today");
        assert_eq!(grade(&record, "1").unwrap().outcome, Outcome::Incorrect);
        assert_eq!(grade(&record, "7").unwrap().outcome, Outcome::Incorrect);
    }
}
