use chrono::{DateTime, Utc};

use trivia_core::MessageTier;
use trivia_core::model::GameResult;

/// Presentation-agnostic end-of-game summary.
///
/// Carries numbers and the tier, not formatted strings. `message` gives the
/// stock feedback line for callers that want it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub result: GameResult,
    pub accuracy_percent: u32,
    pub tier: MessageTier,
    /// 1-based leaderboard position, if the result made the cut.
    pub rank: Option<usize>,
}

impl GameSummary {
    #[must_use]
    pub fn from_result(result: GameResult) -> Self {
        Self {
            accuracy_percent: result.accuracy_percent(),
            tier: result.tier(),
            result,
            rank: None,
        }
    }

    #[must_use]
    pub fn with_rank(mut self, rank: Option<usize>) -> Self {
        self.rank = rank;
        self
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_name: String,
    pub score: u32,
    pub correct_count: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
}

/// Rows for `results`, ranked from 1 in the given order.
#[must_use]
pub fn leaderboard_entries(results: &[GameResult]) -> Vec<LeaderboardEntry> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| LeaderboardEntry {
            rank: i + 1,
            player_name: result.player_name().as_str().to_owned(),
            score: result.score(),
            correct_count: result.correct_count(),
            total_questions: result.total_questions(),
            completed_at: result.completed_at(),
        })
        .collect()
}
