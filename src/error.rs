use thiserror::Error;

/// Errors surfaced at the edges of the generator: parsing caller input and
/// talking to the local progress store. Synthesis itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown difficulty tier: {0:?} (expected basic, intermediate or medium)")]
    UnknownDifficulty(String),

    #[error("unknown exercise kind: {0:?}")]
    UnknownKind(String),

    #[error("invalid generation index: {0:?}")]
    InvalidIndex(String),

    #[error("invalid exercise id: {0:?}")]
    InvalidExerciseId(String),

    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    #[error("progress store error")]
    Storage(#[from] rusqlite::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("json error")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
