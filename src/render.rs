use crate::curriculum::{ExerciseId, ExerciseRecord, MatchingSet, Question, Served};
use crate::generator::shuffle::display_shuffle;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Write;

/// JSON shape of `show`, `next` and `prev`
#[derive(Debug, Serialize)]
pub struct ShownExercise<'a> {
    pub id: String,
    pub completed: bool,
    #[serde(flatten)]
    pub exercise: &'a Served<ExerciseRecord>,
}

pub fn header(id: &ExerciseId, served: &Served<ExerciseRecord>, completed: bool) -> String {
    let mark = if completed { " [completed]" } else { "" };
    format!("{id} ({}){mark}", served.provenance)
}

pub fn render_record(record: &ExerciseRecord) -> String {
    let mut out = String::new();
    match record {
        ExerciseRecord::Vocabulary(v) => {
            let _ = writeln!(out, "{} {}", v.word, v.pronunciation);
            let _ = writeln!(out, "  {}", v.definition);
            let _ = writeln!(out, "  e.g. {}", v.example);
            out.push('\n');
            write_question(&mut out, &v.quiz);
        }
        ExerciseRecord::Sentences(s) => {
            let tiles = display_shuffle(&s.words);
            let _ = writeln!(out, "Put the words in order: {}", tiles.iter().join(" / "));
            out.push('\n');
            let _ = writeln!(out, "Fill in the blank: {}", s.fill_blank.sentence);
            let _ = writeln!(out, "  options: {}", s.fill_blank.options.iter().join(", "));
            out.push('\n');
            write_question(&mut out, &s.multiple_choice);
            out.push('\n');
            let _ = writeln!(out, "Hint: word #{} is \"{}\"", s.hint.position, s.hint.word);
        }
        ExerciseRecord::Reading(r) => {
            let _ = writeln!(out, "{}", r.title);
            let _ = writeln!(out, "{}", "=".repeat(r.title.chars().count()));
            let _ = writeln!(out, "{}", r.text);
            for (i, q) in r.questions.iter().enumerate() {
                out.push('\n');
                let _ = write!(out, "{}. ", i + 1);
                write_question(&mut out, q);
            }
            out.push('\n');
            let _ = writeln!(out, "Dictation: {}", r.dictation);
        }
        ExerciseRecord::Listening(l) => {
            let _ = writeln!(out, "Listen and type: {}", l.sentence);
            let _ = writeln!(out, "Word to practise: {}", l.target_word);
        }
        ExerciseRecord::Scramble(s) => {
            let _ = writeln!(out, "Unscramble: {}", s.scrambled);
            let _ = writeln!(out, "  hint: {}", s.hint);
        }
        ExerciseRecord::Matching(m) => write_matching(&mut out, m),
    }
    out
}

fn write_question(out: &mut String, q: &Question) {
    let _ = writeln!(out, "{}", q.question);
    for (i, option) in q.options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {option}", i + 1);
    }
}

fn write_matching(out: &mut String, set: &MatchingSet) {
    let meanings = display_shuffle(&set.pairs.iter().map(|p| p.meaning.as_str()).collect_vec());
    let width = set.pairs.iter().map(|p| p.word.chars().count()).max().unwrap_or(0);
    let _ = writeln!(out, "Match each word with its meaning:");
    for (pair, meaning) in set.pairs.iter().zip(meanings) {
        let _ = writeln!(out, "  {:<width$}   {meaning}", pair.word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{Difficulty, ExerciseKind};
    use crate::generator::Generator;

    #[test]
    fn vocabulary_lists_numbered_options() {
        let served = Generator::default().record(ExerciseKind::Vocabulary, Difficulty::Basic, 0);
        let text = render_record(&served.item);
        assert!(text.starts_with("Happy"));
        assert!(text.contains("  1) "));
        assert!(text.contains("  4) "));
    }

    #[test]
    fn sentence_shows_blank_and_tiles() {
        let served = Generator::default().record(ExerciseKind::Sentences, Difficulty::Basic, 0);
        let text = render_record(&served.item);
        assert!(text.contains("Fill in the blank: I ___ happy today."));
        assert!(text.contains("happy"));
        assert!(text.contains("Choose the correct sentence:"));
        assert!(text.contains("  4) "));
        assert!(text.contains("Hint: word #"));
    }

    #[test]
    fn header_marks_completion() {
        let generator = Generator::default();
        let served = generator.record(ExerciseKind::Reading, Difficulty::Medium, 0);
        let id = ExerciseId::new(ExerciseKind::Reading, Difficulty::Medium, 0);
        assert_eq!(header(&id, &served, true), "reading_medium_0 (curated) [completed]");
        assert_eq!(header(&id, &served, false), "reading_medium_0 (curated)");
    }

    #[test]
    fn shown_exercise_json_is_flat() {
        let served = Generator::default().record(ExerciseKind::Scramble, Difficulty::Basic, 0);
        let shown = ShownExercise {
            id: "scramble_basic_0".into(),
            completed: false,
            exercise: &served,
        };
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["id"], "scramble_basic_0");
        assert_eq!(json["kind"], "scramble");
        assert_eq!(json["provenance"], "curated");
        assert_eq!(json["word"], "HAPPY");
    }
}
