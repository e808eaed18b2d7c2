mod banks;
mod difficulty;
mod id;
mod records;

pub use banks::{curated, CuratedBanks, TieredBank};
pub use difficulty::{Difficulty, ExerciseKind};
pub use id::{ExerciseId, GenerationIndex};
pub use records::{
    ExerciseRecord, FillBlank, ListeningItem, MatchPair, MatchingSet, Provenance, Question,
    ReadingItem, ScrambleItem, SentenceHint, SentenceItem, Served, VocabularyItem, BLANK,
};
