/// Aggregated view of game progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub current_index: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// 1-based number of the question on screen, for "Question 3 of 10".
    #[must_use]
    pub fn question_number(&self) -> Option<usize> {
        (!self.is_complete && self.current_index < self.total).then_some(self.current_index + 1)
    }

    /// Share of questions already left behind, in whole percent.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.current_index.min(self.total) * 100 / self.total;
        u32::try_from(pct).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_number_is_one_based() {
        let progress = SessionProgress {
            total: 10,
            answered: 2,
            remaining: 8,
            current_index: 2,
            is_complete: false,
        };
        assert_eq!(progress.question_number(), Some(3));
        assert_eq!(progress.percent(), 20);
    }

    #[test]
    fn completed_progress_has_no_question_number() {
        let progress = SessionProgress {
            total: 4,
            answered: 4,
            remaining: 0,
            current_index: 4,
            is_complete: true,
        };
        assert_eq!(progress.question_number(), None);
        assert_eq!(progress.percent(), 100);
    }
}
