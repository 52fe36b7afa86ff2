#![forbid(unsafe_code)]

pub mod error;
pub mod questions;
pub mod score_store;
pub mod sessions;

pub use trivia_core::Clock;

pub use error::{GameLoopError, InvalidInput, QuestionLoadError, ScoreStoreError, SessionError};
pub use questions::{
    FileQuestionSource, HttpQuestionSource, QuestionSource, StaticQuestionSource, load_bank,
    source_for, try_load_bank,
};
pub use score_store::{LEADERBOARD_KEY, ScoreStore};

pub use sessions::{
    Advance, AdvanceOutcome, AnswerJudgement, EventBus, GameEvent, GameLoopService, GameSession,
    GameState, GameSummary, LeaderboardEntry, SessionProgress,
};
