//! Performance classification for a finished game.

use std::fmt;
use std::num::NonZeroU32;

/// Feedback band derived from the share of correct answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTier {
    /// 90% and above.
    Outstanding,
    /// 70% to 89%.
    Great,
    /// 50% to 69%.
    Good,
    /// Below 50%.
    NeedsPractice,
}

impl MessageTier {
    /// Band for an accuracy given in whole percent.
    #[must_use]
    pub fn from_accuracy(percent: u32) -> Self {
        if percent >= 90 {
            Self::Outstanding
        } else if percent >= 70 {
            Self::Great
        } else if percent >= 50 {
            Self::Good
        } else {
            Self::NeedsPractice
        }
    }

    /// Text shown on the results screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding! You're a trivia master!",
            Self::Great => "Great job! Well done!",
            Self::Good => "Good effort! Keep practicing!",
            Self::NeedsPractice => "Keep learning and try again!",
        }
    }
}

impl fmt::Display for MessageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Outstanding => "outstanding",
            Self::Great => "great",
            Self::Good => "good",
            Self::NeedsPractice => "needs practice",
        };
        f.write_str(label)
    }
}

/// `correct / total` as a percentage, rounded half up to the nearest integer.
#[must_use]
pub fn accuracy_percent(correct: u32, total: NonZeroU32) -> u32 {
    let correct = u64::from(correct);
    let total = u64::from(total.get());
    let rounded = (correct * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[must_use]
pub fn classify(correct: u32, total: NonZeroU32) -> MessageTier {
    MessageTier::from_accuracy(accuracy_percent(correct, total))
}
