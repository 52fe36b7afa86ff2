use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Question, QuestionDocument, QuestionError, QuestionId};

/// The full set of questions available to games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `QuestionError::NoQuestions` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::NoQuestions);
        }
        Ok(Self { questions })
    }

    /// Parse a `{ "questions": [...] }` document.
    ///
    /// A single malformed record fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidDocument` if the text is not a question document,
    /// the record's own error if any record is malformed, or
    /// `QuestionError::NoQuestions` if the list is empty.
    pub fn from_json(source: &str) -> Result<Self, QuestionError> {
        let document: QuestionDocument = serde_json::from_str(source)
            .map_err(|e| QuestionError::InvalidDocument(e.to_string()))?;

        let questions = document
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.validate(position))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(questions)
    }

    /// Minimal built-in bank used when the question source cannot be loaded.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            questions: vec![Question::fallback()],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Distinct categories in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.category()) {
                seen.push(q.category());
            }
        }
        seen
    }

    /// Random selection of `min(n, len)` distinct questions, using the thread RNG.
    #[must_use]
    pub fn sample(&self, n: usize) -> Vec<Question> {
        self.sample_with(n, &mut rand::rng())
    }

    /// Random selection of `min(n, len)` distinct questions.
    ///
    /// Shuffles the whole bank with Fisher-Yates, so every ordering is equally likely,
    /// then keeps the first `n`.
    #[must_use]
    pub fn sample_with<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Question> {
        let mut picked = self.questions.clone();
        picked.shuffle(rng);
        picked.truncate(n);
        picked
    }
}
