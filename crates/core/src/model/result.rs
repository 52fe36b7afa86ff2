use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use thiserror::Error;

use crate::model::PlayerName;
use crate::summary::{self, MessageTier};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("a game result needs at least one question")]
    NoQuestions,

    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of one completed play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    player_name: PlayerName,
    score: u32,
    correct_count: u32,
    total_questions: NonZeroU32,
    completed_at: DateTime<Utc>,
}

impl GameResult {
    /// # Errors
    ///
    /// Returns `GameResultError::NoQuestions` if `total_questions` is zero and
    /// `GameResultError::CorrectExceedsTotal` if more answers were correct than asked.
    pub fn new(
        player_name: PlayerName,
        score: u32,
        correct_count: u32,
        total_questions: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        let total = NonZeroU32::new(total_questions).ok_or(GameResultError::NoQuestions)?;
        if correct_count > total_questions {
            return Err(GameResultError::CorrectExceedsTotal {
                correct: correct_count,
                total: total_questions,
            });
        }

        Ok(Self {
            player_name,
            score,
            correct_count,
            total_questions: total,
            completed_at,
        })
    }

    #[must_use]
    pub fn player_name(&self) -> &PlayerName {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions.get()
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Share of correct answers, rounded to a whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        summary::accuracy_percent(self.correct_count, self.total_questions)
    }

    #[must_use]
    pub fn tier(&self) -> MessageTier {
        summary::classify(self.correct_count, self.total_questions)
    }
}
