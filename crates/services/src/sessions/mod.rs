mod events;
mod progress;
mod service;
mod state;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{GameLoopError, InvalidInput, SessionError};
pub use events::{EventBus, GameEvent};
pub use progress::SessionProgress;
pub use service::{Advance, AnswerJudgement, GameSession};
pub use state::GameState;
pub use view::{GameSummary, LeaderboardEntry, leaderboard_entries};
pub use workflow::{AdvanceOutcome, GameLoopService};
