use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many answers.
pub const ANSWERS_PER_QUESTION: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Malformed question data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question document is not valid: {0}")]
    InvalidDocument(String),

    #[error("question record #{position} is missing `{field}`")]
    MissingField {
        position: usize,
        field: &'static str,
    },

    #[error("question {id} has {len} answers, expected 4")]
    WrongAnswerCount { id: QuestionId, len: usize },

    #[error("question {id} marks answer {index} as correct, expected 0..=3")]
    CorrectIndexOutOfRange { id: QuestionId, index: i64 },

    #[error("question document contains no questions")]
    NoQuestions,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    category: String,
    prompt: String,
    answers: [String; ANSWERS_PER_QUESTION],
    correct_index: usize,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError::CorrectIndexOutOfRange` if `correct_index` does not
    /// point at one of the four answers.
    pub fn new(
        id: QuestionId,
        category: impl Into<String>,
        prompt: impl Into<String>,
        answers: [String; ANSWERS_PER_QUESTION],
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        if correct_index >= ANSWERS_PER_QUESTION {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id,
                index: i64::try_from(correct_index).unwrap_or(i64::MAX),
            });
        }

        Ok(Self {
            id,
            category: category.into(),
            prompt: prompt.into(),
            answers,
            correct_index,
        })
    }

    pub(crate) fn fallback() -> Self {
        Self {
            id: QuestionId::new(1),
            category: "General".to_owned(),
            prompt: "What is 2 + 2?".to_owned(),
            answers: ["3", "4", "5", "6"].map(String::from),
            correct_index: 1,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answers(&self) -> &[String; ANSWERS_PER_QUESTION] {
        &self.answers
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

/// One entry of the question document as it appears on the wire.
///
/// Every field is optional so a missing field can be reported by name instead of
/// surfacing as an opaque parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionRecord {
    pub id: Option<u64>,
    pub category: Option<String>,
    #[serde(rename = "question")]
    pub prompt: Option<String>,
    pub answers: Option<Vec<String>>,
    #[serde(rename = "correct")]
    pub correct_index: Option<i64>,
}

/// `{ "questions": [ ... ] }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuestionDocument {
    pub questions: Vec<QuestionRecord>,
}

impl QuestionRecord {
    /// Convert the record into a `Question`.
    ///
    /// `position` is the record's index in the document and only feeds error messages.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a field is missing, the answer count is not four,
    /// or the correct index is outside `0..=3`.
    pub fn validate(self, position: usize) -> Result<Question, QuestionError> {
        let missing = |field: &'static str| QuestionError::MissingField { position, field };

        let id = QuestionId::new(self.id.ok_or_else(|| missing("id"))?);
        let category = self.category.ok_or_else(|| missing("category"))?;
        let prompt = self.prompt.ok_or_else(|| missing("question"))?;
        let answers = self.answers.ok_or_else(|| missing("answers"))?;
        let correct = self.correct_index.ok_or_else(|| missing("correct"))?;

        let len = answers.len();
        let answers: [String; ANSWERS_PER_QUESTION] = answers
            .try_into()
            .map_err(|_| QuestionError::WrongAnswerCount { id, len })?;

        let correct_index = usize::try_from(correct)
            .ok()
            .filter(|i| *i < ANSWERS_PER_QUESTION)
            .ok_or(QuestionError::CorrectIndexOutOfRange { id, index: correct })?;

        Question::new(id, category, prompt, answers, correct_index)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: Some(3),
            category: Some("Science".into()),
            prompt: Some("H2O is?".into()),
            answers: Some(vec!["Water".into(), "Salt".into(), "Air".into(), "Gold".into()]),
            correct_index: Some(0),
        }
    }

    #[test]
    fn valid_record_becomes_question() {
        let q = record().validate(0).unwrap();
        assert_eq!(q.id(), QuestionId::new(3));
        assert_eq!(q.category(), "Science");
        assert_eq!(q.correct_answer(), "Water");
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn missing_prompt_is_reported_by_wire_name() {
        let rec = QuestionRecord {
            prompt: None,
            ..record()
        };
        let err = rec.validate(4).unwrap_err();
        assert_eq!(
            err,
            QuestionError::MissingField {
                position: 4,
                field: "question"
            }
        );
    }

    #[test]
    fn three_answers_are_rejected() {
        let rec = QuestionRecord {
            answers: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..record()
        };
        assert!(matches!(
            rec.validate(0),
            Err(QuestionError::WrongAnswerCount { len: 3, .. })
        ));
    }

    #[test]
    fn correct_index_outside_range_is_rejected() {
        for bad in [-1, 4, 99] {
            let rec = QuestionRecord {
                correct_index: Some(bad),
                ..record()
            };
            assert!(matches!(
                rec.validate(0),
                Err(QuestionError::CorrectIndexOutOfRange { index, .. }) if index == bad
            ));
        }
    }

    #[test]
    fn record_deserializes_from_wire_names() {
        let json = r#"{"id":1,"category":"General","question":"2+2?","answers":["3","4","5","6"],"correct":1}"#;
        let rec: QuestionRecord = serde_json::from_str(json).unwrap();
        let q = rec.validate(0).unwrap();
        assert_eq!(q.prompt(), "2+2?");
        assert_eq!(q.correct_answer(), "4");
    }
}
