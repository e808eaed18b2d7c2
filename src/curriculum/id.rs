use super::difficulty::{Difficulty, ExerciseKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position in the per-(kind, difficulty) exercise stream.
/// The caller owns and advances it; the generator only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationIndex(pub u64);

impl GenerationIndex {
    /// Largest index that fits an SQLite integer
    pub const MAX: GenerationIndex = GenerationIndex(i64::MAX as u64);

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        GenerationIndex(self.0.saturating_add(1).min(Self::MAX.0))
    }

    /// Stays at zero rather than wrapping
    pub fn prev(self) -> Self {
        GenerationIndex(self.0.saturating_sub(1))
    }
}

impl From<u64> for GenerationIndex {
    fn from(v: u64) -> Self {
        GenerationIndex(v)
    }
}

impl TryFrom<i64> for GenerationIndex {
    type Error = Error;

    fn try_from(v: i64) -> Result<Self> {
        u64::try_from(v)
            .map(GenerationIndex)
            .map_err(|_| Error::InvalidIndex(v.to_string()))
    }
}

impl FromStr for GenerationIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .ok()
            .filter(|&v| v <= Self::MAX.0)
            .map(GenerationIndex)
            .ok_or_else(|| Error::InvalidIndex(s.to_string()))
    }
}

impl fmt::Display for GenerationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion key, rendered as `{kind}_{difficulty}_{index}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExerciseId {
    pub kind: ExerciseKind,
    pub difficulty: Difficulty,
    pub index: GenerationIndex,
}

impl ExerciseId {
    pub fn new(
        kind: ExerciseKind,
        difficulty: Difficulty,
        index: impl Into<GenerationIndex>,
    ) -> Self {
        Self {
            kind,
            difficulty,
            index: index.into(),
        }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.kind, self.difficulty, self.index)
    }
}

impl FromStr for ExerciseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidExerciseId(s.to_string());
        let mut parts = s.splitn(3, '_');
        let (Some(kind), Some(difficulty), Some(index)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(ExerciseId {
            kind: kind.parse().map_err(|_| invalid())?,
            difficulty: difficulty.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for ExerciseId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExerciseId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
