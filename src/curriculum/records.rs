use super::difficulty::ExerciseKind;
use serde::{Deserialize, Serialize};

/// Multiple-choice question; used for vocabulary quizzes, reading
/// comprehension and sentence word order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "correct")]
    pub correct_index: usize,
}

impl Question {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    pub pronunciation: String,
    pub definition: String,
    pub example: String,
    pub quiz: Question,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlank {
    /// Sentence with the removed token replaced by [`BLANK`]
    pub sentence: String,
    pub answer: String,
    pub options: Vec<String>,
}

pub const BLANK: &str = "___";

/// Word #`position` (1-based) of the sentence is `word`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceHint {
    pub position: usize,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceItem {
    pub words: Vec<String>,
    pub correct: String,
    pub fill_blank: FillBlank,
    /// The correct sentence among wrongly ordered ones. Curated data leaves
    /// this and `hint` out; they are filled in when the bank loads.
    #[serde(default)]
    pub multiple_choice: Question,
    #[serde(default)]
    pub hint: SentenceHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingItem {
    pub title: String,
    pub text: String,
    pub questions: Vec<Question>,
    pub dictation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningItem {
    pub sentence: String,
    pub target_word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambleItem {
    pub word: String,
    pub scrambled: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub word: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSet {
    pub pairs: Vec<MatchPair>,
}

/// Which branch of the hybrid policy produced an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    Curated,
    Generated,
}

/// An item together with the branch that served it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Served<T> {
    pub provenance: Provenance,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Served<T> {
    pub fn curated(item: T) -> Self {
        Self {
            provenance: Provenance::Curated,
            item,
        }
    }

    pub fn generated(item: T) -> Self {
        Self {
            provenance: Provenance::Generated,
            item,
        }
    }

    pub fn is_curated(&self) -> bool {
        self.provenance == Provenance::Curated
    }

    pub fn into_inner(self) -> T {
        self.item
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Served<U> {
        Served {
            provenance: self.provenance,
            item: f(self.item),
        }
    }
}

/// Any exercise the generator can hand to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseRecord {
    Vocabulary(VocabularyItem),
    Sentences(SentenceItem),
    Reading(ReadingItem),
    Listening(ListeningItem),
    Scramble(ScrambleItem),
    Matching(MatchingSet),
}

impl ExerciseRecord {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseRecord::Vocabulary(_) => ExerciseKind::Vocabulary,
            ExerciseRecord::Sentences(_) => ExerciseKind::Sentences,
            ExerciseRecord::Reading(_) => ExerciseKind::Reading,
            ExerciseRecord::Listening(_) => ExerciseKind::Listening,
            ExerciseRecord::Scramble(_) => ExerciseKind::Scramble,
            ExerciseRecord::Matching(_) => ExerciseKind::Matching,
        }
    }

    /// Structural problems with the record; empty when well formed.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        match self {
            ExerciseRecord::Vocabulary(v) => {
                require_text(&mut problems, "word", &v.word);
                require_text(&mut problems, "definition", &v.definition);
                if v.word.chars().count() > 50 {
                    problems.push("word: longer than 50 characters".into());
                }
                check_question(&mut problems, "quiz", &v.quiz);
            }
            ExerciseRecord::Sentences(s) => {
                if s.words.is_empty() {
                    problems.push("words: empty".into());
                }
                require_text(&mut problems, "correct", &s.correct);
                let fb = &s.fill_blank;
                if !fb.sentence.contains(BLANK) {
                    problems.push("fillBlank.sentence: no placeholder".into());
                }
                let hits = fb.options.iter().filter(|o| **o == fb.answer).count();
                if hits != 1 {
                    problems.push(format!("fillBlank.options: answer present {hits} times"));
                }
                if s.multiple_choice.correct_option() != Some(s.correct.as_str()) {
                    problems
                        .push("multipleChoice: correctIndex is not the correct sentence".into());
                }
                let hinted = s.hint.position.checked_sub(1).and_then(|i| s.words.get(i));
                if hinted != Some(&s.hint.word) {
                    problems.push("hint: word does not match its position".into());
                }
            }
            ExerciseRecord::Reading(r) => {
                require_text(&mut problems, "title", &r.title);
                if r.text.chars().count() < 10 {
                    problems.push("text: shorter than 10 characters".into());
                }
                if r.questions.is_empty() {
                    problems.push("questions: empty".into());
                }
                for (i, q) in r.questions.iter().enumerate() {
                    check_question(&mut problems, &format!("questions[{i}]"), q);
                }
            }
            ExerciseRecord::Listening(l) => {
                require_text(&mut problems, "sentence", &l.sentence);
                require_text(&mut problems, "targetWord", &l.target_word);
            }
            ExerciseRecord::Scramble(s) => {
                require_text(&mut problems, "word", &s.word);
                let mut a: Vec<char> = s.word.to_uppercase().chars().collect();
                let mut b: Vec<char> = s.scrambled.to_uppercase().chars().collect();
                a.sort_unstable();
                b.sort_unstable();
                if a != b {
                    problems.push("scrambled: not an anagram of word".into());
                }
            }
            ExerciseRecord::Matching(m) => {
                if m.pairs.len() < 2 {
                    problems.push("pairs: fewer than 2".into());
                }
                for (i, p) in m.pairs.iter().enumerate() {
                    require_text(&mut problems, &format!("pairs[{i}].word"), &p.word);
                    require_text(&mut problems, &format!("pairs[{i}].meaning"), &p.meaning);
                }
            }
        }
        problems
    }
}

fn require_text(problems: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{field}: empty"));
    }
}

fn check_question(problems: &mut Vec<String>, field: &str, q: &Question) {
    require_text(problems, &format!("{field}.question"), &q.question);
    if q.options.len() < 2 {
        problems.push(format!("{field}.options: fewer than 2"));
    }
    if q.correct_index >= q.options.len() {
        problems.push(format!("{field}.correctIndex: out of range"));
    }
}
