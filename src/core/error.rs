//! Error types for the typing engine and script loading.

use std::path::PathBuf;

use thiserror::Error;

use super::typing::RunHandle;

/// Errors reported by the typing sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("step interval must be >= 0 ms, got {0}")]
    NegativeStepInterval(i64),

    #[error("start delay must be >= 0 ms, got {0}")]
    NegativeStartDelay(i64),

    #[error("no run is tracked for {0}")]
    UnknownRun(RunHandle),
}

impl SequencerError {
    /// `true` for errors caused by a bad [`SequencerConfig`](super::typing::SequencerConfig).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NegativeStepInterval(_) | Self::NegativeStartDelay(_)
        )
    }
}

/// Errors raised while reading a terminal script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("block {block} has no `text` entry")]
    MissingText { block: usize },

    #[error("line {line}: `{key}` expects a number, got `{value}`")]
    InvalidNumber {
        line: usize,
        key: String,
        value: String,
    },

    #[error("line {line}: expected `key = value`, got `{content}`")]
    MalformedEntry { line: usize, content: String },

    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: invalid value `{value}` for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}
