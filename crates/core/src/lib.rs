#![forbid(unsafe_code)]

pub mod bank;
pub mod model;
pub mod summary;
pub mod time;

pub use bank::QuestionBank;
pub use summary::{MessageTier, accuracy_percent, classify};
pub use time::Clock;
