use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameSettingsError {
    #[error("questions per game must be > 0")]
    InvalidQuestionsPerGame,

    #[error("points per correct answer must be > 0")]
    InvalidPointsPerCorrect,

    #[error("leaderboard capacity must be > 0")]
    InvalidLeaderboardCapacity,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for a game and its leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    questions_per_game: u32,
    points_per_correct: u32,
    leaderboard_capacity: u32,
}

impl GameSettings {
    pub const DEFAULT_QUESTIONS_PER_GAME: u32 = 10;
    pub const DEFAULT_POINTS_PER_CORRECT: u32 = 100;
    pub const DEFAULT_LEADERBOARD_CAPACITY: u32 = 10;

    /// # Errors
    ///
    /// Returns error if any parameter is zero.
    pub fn new(
        questions_per_game: u32,
        points_per_correct: u32,
        leaderboard_capacity: u32,
    ) -> Result<Self, GameSettingsError> {
        if questions_per_game == 0 {
            return Err(GameSettingsError::InvalidQuestionsPerGame);
        }
        if points_per_correct == 0 {
            return Err(GameSettingsError::InvalidPointsPerCorrect);
        }
        if leaderboard_capacity == 0 {
            return Err(GameSettingsError::InvalidLeaderboardCapacity);
        }

        Ok(Self {
            questions_per_game,
            points_per_correct,
            leaderboard_capacity,
        })
    }

    /// Copy of these settings with a different game length.
    ///
    /// # Errors
    ///
    /// Returns `GameSettingsError::InvalidQuestionsPerGame` if `n` is zero.
    pub fn with_questions_per_game(&self, n: u32) -> Result<Self, GameSettingsError> {
        Self::new(n, self.points_per_correct, self.leaderboard_capacity)
    }

    #[must_use]
    pub fn questions_per_game(&self) -> u32 {
        self.questions_per_game
    }

    /// Flat award for each correct answer; there is no time or difficulty bonus.
    #[must_use]
    pub fn points_per_correct(&self) -> u32 {
        self.points_per_correct
    }

    #[must_use]
    pub fn leaderboard_capacity(&self) -> u32 {
        self.leaderboard_capacity
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            questions_per_game: Self::DEFAULT_QUESTIONS_PER_GAME,
            points_per_correct: Self::DEFAULT_POINTS_PER_CORRECT,
            leaderboard_capacity: Self::DEFAULT_LEADERBOARD_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_game() {
        let settings = GameSettings::default();
        assert_eq!(settings.questions_per_game(), 10);
        assert_eq!(settings.points_per_correct(), 100);
        assert_eq!(settings.leaderboard_capacity(), 10);
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            GameSettings::new(0, 100, 10),
            Err(GameSettingsError::InvalidQuestionsPerGame)
        );
        assert_eq!(
            GameSettings::new(10, 0, 10),
            Err(GameSettingsError::InvalidPointsPerCorrect)
        );
        assert_eq!(
            GameSettings::new(10, 100, 0),
            Err(GameSettingsError::InvalidLeaderboardCapacity)
        );
    }

    #[test]
    fn game_length_can_be_overridden() {
        let settings = GameSettings::default().with_questions_per_game(3).unwrap();
        assert_eq!(settings.questions_per_game(), 3);
        assert_eq!(settings.points_per_correct(), 100);
    }
}
