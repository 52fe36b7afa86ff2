use chrono::{DateTime, Utc};
use std::fmt;

use trivia_core::model::{
    ANSWERS_PER_QUESTION, GameResult, GameSettings, PlayerName, Question, QuestionId,
};

use super::progress::SessionProgress;
use super::state::GameState;
use crate::error::{InvalidInput, SessionError};

//
// ─── ANSWER JUDGEMENT ──────────────────────────────────────────────────────────
//

/// Outcome of judging the answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerJudgement {
    pub question_id: QuestionId,
    pub question_index: usize,
    pub selected: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub points_awarded: u32,
    /// Running score after this answer.
    pub score: u32,
}

/// What `advance` moved the game to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Completed(GameResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through, free of any rendering or storage concern.
///
/// The question list is fixed at `start`. Each question accepts exactly one answer,
/// after which the game waits for `advance`. Timestamps come from the caller so the
/// services layer clock stays the only time source.
pub struct GameSession {
    points_per_correct: u32,
    state: GameState,
    player_name: Option<PlayerName>,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    correct_count: u32,
    pending_answer: Option<usize>,
    judgements: Vec<AnswerJudgement>,
    started_at: Option<DateTime<Utc>>,
    result: Option<GameResult>,
    recorded_rank: Option<Option<usize>>,
}

impl GameSession {
    /// A session in `NotStarted`.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        Self::with_points(settings.points_per_correct())
    }

    fn with_points(points_per_correct: u32) -> Self {
        Self {
            points_per_correct,
            state: GameState::NotStarted,
            player_name: None,
            questions: Vec::new(),
            current: 0,
            score: 0,
            correct_count: 0,
            pending_answer: None,
            judgements: Vec::new(),
            started_at: None,
            result: None,
            recorded_rank: None,
        }
    }

    /// Begin a new game, discarding anything left from a previous one.
    ///
    /// Allowed from any state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if the trimmed name is empty or
    /// `questions` is empty. The session is left untouched in that case.
    pub fn start(
        &mut self,
        player_name: &str,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let player_name = PlayerName::parse(player_name)?;
        if questions.is_empty() {
            return Err(InvalidInput::NoQuestions.into());
        }

        *self = Self {
            state: GameState::InProgress,
            player_name: Some(player_name),
            questions,
            started_at: Some(started_at),
            ..Self::with_points(self.points_per_correct)
        };
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn player_name(&self) -> Option<&PlayerName> {
        self.player_name.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Answer recorded for the question on screen, if any.
    #[must_use]
    pub fn pending_answer(&self) -> Option<usize> {
        self.pending_answer
    }

    #[must_use]
    pub fn judgements(&self) -> &[AnswerJudgement] {
        &self.judgements
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Snapshot produced when the last question was left behind.
    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == GameState::Completed
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        let answered = self.judgements.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_index: self.current,
            is_complete: self.is_complete(),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the game is `InProgress` or
    /// `AwaitingNext`.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        if !self.state.is_active() {
            return Err(self.invalid_state("read the current question"));
        }
        self.questions
            .get(self.current)
            .ok_or_else(|| self.invalid_state("read the current question"))
    }

    /// Judge `index` against the current question and award points if correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` if the current question already has
    /// an answer, `SessionError::InvalidState` outside an active game, and
    /// `SessionError::InvalidInput` if `index` is not one of the four answers.
    pub fn submit_answer(&mut self, index: usize) -> Result<AnswerJudgement, SessionError> {
        match self.state {
            GameState::InProgress => {}
            GameState::AwaitingNext => return Err(SessionError::AlreadyAnswered),
            GameState::NotStarted | GameState::Completed => {
                return Err(self.invalid_state("submit an answer"));
            }
        }
        if index >= ANSWERS_PER_QUESTION {
            return Err(InvalidInput::AnswerOutOfRange {
                index,
                len: ANSWERS_PER_QUESTION,
            }
            .into());
        }

        let question = self.current_question()?;
        let question_id = question.id();
        let correct_index = question.correct_index();
        let is_correct = question.is_correct(index);

        let points_awarded = if is_correct { self.points_per_correct } else { 0 };
        if is_correct {
            self.score = self.score.saturating_add(points_awarded);
            self.correct_count += 1;
        }

        let judgement = AnswerJudgement {
            question_id,
            question_index: self.current,
            selected: index,
            correct_index,
            is_correct,
            points_awarded,
            score: self.score,
        };
        self.pending_answer = Some(index);
        self.judgements.push(judgement.clone());
        self.state = GameState::AwaitingNext;

        Ok(judgement)
    }

    /// Move past the answered question. Leaving the last one completes the game.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the game is `AwaitingNext`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if self.state != GameState::AwaitingNext {
            return Err(self.invalid_state("advance"));
        }
        let Some(player_name) = self.player_name.clone() else {
            return Err(self.invalid_state("advance"));
        };

        let next = self.current + 1;
        if next < self.questions.len() {
            self.current = next;
            self.pending_answer = None;
            self.state = GameState::InProgress;
            return Ok(Advance::Next { index: next });
        }

        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let result = GameResult::new(player_name, self.score, self.correct_count, total, now)?;

        self.current = next;
        self.pending_answer = None;
        self.state = GameState::Completed;
        self.result = Some(result.clone());
        Ok(Advance::Completed(result))
    }

    /// Rank assigned when the result reached the leaderboard, if it was recorded.
    pub(crate) fn recorded_rank(&self) -> Option<Option<usize>> {
        self.recorded_rank
    }

    pub(crate) fn mark_recorded(&mut self, rank: Option<usize>) {
        self.recorded_rank = Some(rank);
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(&GameSettings::default())
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("player_name", &self.player_name)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("correct_count", &self.correct_count)
            .field("pending_answer", &self.pending_answer)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
