pub mod formatter;
pub mod policy;
pub mod pool;
pub mod puzzles;
pub mod radix;
pub mod reading;
pub mod sentence;
pub mod shuffle;
pub mod template;
pub mod vocabulary;

pub use policy::{CuratedOnly, CyclicReplay, Selection, SelectionPolicy};
pub use sentence::BlankPosition;

use crate::curriculum::{
    Difficulty, ExerciseKind, ExerciseRecord, ListeningItem, MatchingSet, ReadingItem, ScrambleItem,
    SentenceItem, Served, VocabularyItem,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub blank_position: BlankPosition,
    /// Every `replay_period`-th item past the curated bank replays it
    pub replay_period: u64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            blank_position: BlankPosition::Midpoint,
            replay_period: CyclicReplay::default().period,
        }
    }
}

/// Every item is a pure function of `(kind, difficulty, index)`, so one
/// generator can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
    policy: CyclicReplay,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            policy: CyclicReplay {
                period: options.replay_period,
            },
        }
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    pub fn vocabulary(&self, difficulty: Difficulty, index: u64) -> Served<VocabularyItem> {
        vocabulary::serve(&self.policy, difficulty, index)
    }

    pub fn sentence(&self, difficulty: Difficulty, index: u64) -> Served<SentenceItem> {
        sentence::serve(&self.policy, self.options.blank_position, difficulty, index)
    }

    pub fn reading(&self, difficulty: Difficulty, index: u64) -> Served<ReadingItem> {
        reading::serve(&self.policy, difficulty, index)
    }

    pub fn listening(&self, difficulty: Difficulty, index: u64) -> Served<ListeningItem> {
        puzzles::listening(difficulty, index)
    }

    pub fn scramble(&self, difficulty: Difficulty, index: u64) -> Served<ScrambleItem> {
        puzzles::scramble(&self.policy, difficulty, index)
    }

    pub fn matching(&self, difficulty: Difficulty, index: u64) -> Served<MatchingSet> {
        puzzles::matching(&self.policy, difficulty, index)
    }

    /// Any kind, wrapped in the common record type
    pub fn record(
        &self,
        kind: ExerciseKind,
        difficulty: Difficulty,
        index: u64,
    ) -> Served<ExerciseRecord> {
        let (d, i) = (difficulty, index);
        match kind {
            ExerciseKind::Vocabulary => self.vocabulary(d, i).map(ExerciseRecord::Vocabulary),
            ExerciseKind::Sentences => self.sentence(d, i).map(ExerciseRecord::Sentences),
            ExerciseKind::Reading => self.reading(d, i).map(ExerciseRecord::Reading),
            ExerciseKind::Listening => self.listening(d, i).map(ExerciseRecord::Listening),
            ExerciseKind::Scramble => self.scramble(d, i).map(ExerciseRecord::Scramble),
            ExerciseKind::Matching => self.matching(d, i).map(ExerciseRecord::Matching),
        }
    }
}

pub fn vocabulary_item(difficulty: Difficulty, index: u64) -> VocabularyItem {
    Generator::default().vocabulary(difficulty, index).into_inner()
}

pub fn sentence_item(difficulty: Difficulty, index: u64) -> SentenceItem {
    Generator::default().sentence(difficulty, index).into_inner()
}

pub fn reading_item(difficulty: Difficulty, index: u64) -> ReadingItem {
    Generator::default().reading(difficulty, index).into_inner()
}
