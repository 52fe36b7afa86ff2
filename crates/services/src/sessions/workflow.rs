use rand::Rng;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

use trivia_core::model::{GameResult, GameSettings};
use trivia_core::{Clock, QuestionBank};

use super::events::{EventBus, GameEvent};
use super::progress::SessionProgress;
use super::service::{Advance, AnswerJudgement, GameSession};
use super::view::{GameSummary, LeaderboardEntry, leaderboard_entries};
use crate::error::{GameLoopError, SessionError};
use crate::score_store::ScoreStore;

/// Where a game stands after `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next(SessionProgress),
    Finished(GameSummary),
}

/// Orchestrates a game: draws questions, drives the session, records the
/// result on the leaderboard, and publishes events along the way.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    settings: GameSettings,
    bank: Arc<QuestionBank>,
    scores: Arc<ScoreStore>,
    events: EventBus,
}

impl GameLoopService {
    /// Game events share the bus `scores` publishes leaderboard changes on.
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: GameSettings,
        bank: Arc<QuestionBank>,
        scores: Arc<ScoreStore>,
    ) -> Self {
        let events = scores.events().clone();
        Self {
            clock,
            settings,
            bank,
            scores,
            events,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start a new game with questions drawn by the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `player_name` is blank.
    pub fn start_game(&self, player_name: &str) -> Result<GameSession, SessionError> {
        self.start_game_with(player_name, &mut rand::rng())
    }

    /// Start a new game with questions drawn by `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `player_name` is blank.
    pub fn start_game_with<R: Rng + ?Sized>(
        &self,
        player_name: &str,
        rng: &mut R,
    ) -> Result<GameSession, SessionError> {
        let mut session = GameSession::new(&self.settings);
        self.restart_game_with(&mut session, player_name, rng)?;
        Ok(session)
    }

    /// Reset `session` and play again with a fresh draw.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `player_name` is blank. The session
    /// is left untouched in that case.
    pub fn restart_game(
        &self,
        session: &mut GameSession,
        player_name: &str,
    ) -> Result<(), SessionError> {
        self.restart_game_with(session, player_name, &mut rand::rng())
    }

    /// Like [`restart_game`](Self::restart_game) with questions drawn by `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if `player_name` is blank.
    pub fn restart_game_with<R: Rng + ?Sized>(
        &self,
        session: &mut GameSession,
        player_name: &str,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let count = usize::try_from(self.settings.questions_per_game()).unwrap_or(usize::MAX);
        let questions = self.bank.sample_with(count, rng);
        session.start(player_name, questions, self.clock.now())?;

        let total = session.total_questions();
        if let Some(name) = session.player_name() {
            info!(player = name.as_str(), total, "game started");
            self.events.publish(GameEvent::Started {
                player_name: name.as_str().to_owned(),
                total_questions: total,
            });
        }
        self.publish_question(session);
        Ok(())
    }

    /// Judge an answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session does not accept an answer now.
    pub fn submit_answer(
        &self,
        session: &mut GameSession,
        index: usize,
    ) -> Result<AnswerJudgement, SessionError> {
        let judgement = session.submit_answer(index)?;
        self.events.publish(GameEvent::AnswerJudged(judgement.clone()));
        Ok(judgement)
    }

    /// Move to the next question, or finish the game and record the result.
    ///
    /// # Errors
    ///
    /// Returns `GameLoopError::Session` if the current question has not been
    /// answered, and `GameLoopError::Scores` if the finished result could not be
    /// stored. In the latter case the game is still complete and
    /// [`finalize_result`](Self::finalize_result) retries the write.
    pub async fn advance(
        &self,
        session: &mut GameSession,
    ) -> Result<AdvanceOutcome, GameLoopError> {
        match session.advance(self.clock.now())? {
            Advance::Next { .. } => {
                self.publish_question(session);
                Ok(AdvanceOutcome::Next(session.progress()))
            }
            Advance::Completed(result) => {
                let summary = self.record(session, result).await?;
                Ok(AdvanceOutcome::Finished(summary))
            }
        }
    }

    /// Make sure a finished game's result is on the leaderboard.
    ///
    /// Returns the summary without writing again if the result was already
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the game is not complete and
    /// `GameLoopError::Scores` if the write fails again.
    pub async fn finalize_result(
        &self,
        session: &mut GameSession,
    ) -> Result<GameSummary, GameLoopError> {
        let result = session
            .result()
            .cloned()
            .ok_or_else(|| SessionError::InvalidState {
                operation: "finalize the result",
                state: session.state(),
            })?;

        if let Some(rank) = session.recorded_rank() {
            return Ok(GameSummary::from_result(result).with_rank(rank));
        }
        self.record(session, result).await
    }

    /// Leaderboard rows, best first.
    pub async fn top_scores(&self, limit: usize) -> Vec<LeaderboardEntry> {
        leaderboard_entries(&self.scores.top_scores(limit).await)
    }

    pub async fn high_score(&self) -> u32 {
        self.scores.high_score().await
    }

    /// # Errors
    ///
    /// Returns `GameLoopError::Scores` if the leaderboard cannot be deleted.
    pub async fn clear_scores(&self) -> Result<(), GameLoopError> {
        self.scores.clear().await?;
        Ok(())
    }

    async fn record(
        &self,
        session: &mut GameSession,
        result: GameResult,
    ) -> Result<GameSummary, GameLoopError> {
        let rank = self.scores.record(&result).await?;
        session.mark_recorded(rank);

        let summary = GameSummary::from_result(result).with_rank(rank);
        info!(
            player = summary.result.player_name().as_str(),
            score = summary.result.score(),
            accuracy = summary.accuracy_percent,
            ?rank,
            "game completed"
        );
        self.events.publish(GameEvent::Completed(summary.clone()));
        Ok(summary)
    }

    fn publish_question(&self, session: &GameSession) {
        if let Ok(question) = session.current_question() {
            self.events.publish(GameEvent::QuestionChanged {
                index: session.current_index(),
                total: session.total_questions(),
                question: question.clone(),
            });
        }
    }
}
