use tokio::sync::broadcast;
use tracing::trace;

use trivia_core::model::Question;

use super::service::AnswerJudgement;
use super::view::{GameSummary, LeaderboardEntry};

/// Notifications for whatever renders the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started {
        player_name: String,
        total_questions: usize,
    },
    /// A question was put on screen. `index` is zero-based.
    QuestionChanged {
        index: usize,
        total: usize,
        question: Question,
    },
    AnswerJudged(AnswerJudgement),
    Completed(GameSummary),
    /// The stored leaderboard was written or cleared.
    LeaderboardChanged {
        entries: Vec<LeaderboardEntry>,
        high_score: u32,
    },
}

/// Fan-out of `GameEvent`s to any number of subscribers.
///
/// Publishing never blocks and never fails. Subscribers that fall behind the
/// buffer see `RecvError::Lagged` and skip ahead.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: GameEvent) {
        if self.sender.send(event).is_err() {
            trace!("no subscribers for game event");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
