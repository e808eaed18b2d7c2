pub mod app_dirs;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod generator;
pub mod grading;
pub mod progress;
pub mod render;

pub use curriculum::{
    Difficulty, ExerciseId, ExerciseKind, ExerciseRecord, GenerationIndex, Provenance, Served,
};
pub use error::{Error, Result};
pub use generator::{
    reading_item, sentence_item, vocabulary_item, BlankPosition, Generator, GeneratorOptions,
};

use config::Config;

/// Settings in effect for one invocation: the saved config with any
/// command-line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub difficulty: Difficulty,
    pub blank_position: BlankPosition,
    pub replay_period: u64,
    pub json_output: bool,
}

impl From<&Config> for RuntimeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            difficulty: cfg.difficulty,
            blank_position: cfg.blank_position,
            replay_period: cfg.replay_period,
            json_output: cfg.json_output,
        }
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            difficulty: rs.difficulty,
            blank_position: rs.blank_position,
            replay_period: rs.replay_period,
            json_output: rs.json_output,
        }
    }
}

impl RuntimeSettings {
    pub fn generator(&self) -> Generator {
        Generator::new(GeneratorOptions {
            blank_position: self.blank_position,
            replay_period: self.replay_period,
        })
    }
}
