//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use trivia_core::model::{GameResultError, PlayerNameError, QuestionError};

use crate::sessions::GameState;

/// Errors emitted while fetching or parsing the question document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionLoadError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Malformed(#[from] QuestionError),
}

/// Errors emitted by `ScoreStore` writes. Reads never fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoreStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Caller supplied a value the session cannot use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidInput {
    #[error(transparent)]
    PlayerName(#[from] PlayerNameError),
    #[error("no questions available for the game")]
    NoQuestions,
    #[error("answer {index} is out of range, expected 0..{len}")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// Errors emitted by the game session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("cannot {operation} while the game is {state}")]
    InvalidState {
        operation: &'static str,
        state: GameState,
    },
    #[error("this question has already been answered")]
    AlreadyAnswered,
    #[error(transparent)]
    Result(#[from] GameResultError),
}

impl From<PlayerNameError> for SessionError {
    fn from(err: PlayerNameError) -> Self {
        Self::InvalidInput(InvalidInput::PlayerName(err))
    }
}

/// Errors emitted by `GameLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameLoopError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Scores(#[from] ScoreStoreError),
}
