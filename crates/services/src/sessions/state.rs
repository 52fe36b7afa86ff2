use std::fmt;

/// Lifecycle of one game.
///
/// `NotStarted -> InProgress -> AwaitingNext -> InProgress ... -> Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    NotStarted,
    /// A question is shown and no answer has been recorded for it.
    InProgress,
    /// The current question was answered; waiting for `advance`.
    AwaitingNext,
    Completed,
}

impl GameState {
    /// True while a question is on screen.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::AwaitingNext)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::AwaitingNext => "awaiting the next question",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}
