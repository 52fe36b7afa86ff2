mod ids;
mod player;
mod question;
mod result;
mod settings;

pub use ids::QuestionId;
pub use player::{PlayerName, PlayerNameError};
pub use question::{ANSWERS_PER_QUESTION, Question, QuestionError, QuestionRecord};
pub(crate) use question::QuestionDocument;
pub use result::{GameResult, GameResultError};
pub use settings::{GameSettings, GameSettingsError};
