use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, warn};

use trivia_core::QuestionBank;

use crate::error::QuestionLoadError;

/// Where the question document comes from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw `{ "questions": [...] }` document.
    ///
    /// # Errors
    ///
    /// Returns `QuestionLoadError` if the document cannot be retrieved.
    async fn fetch(&self) -> Result<String, QuestionLoadError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Question document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn fetch(&self) -> Result<String, QuestionLoadError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Question document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: Client,
    url: String,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self) -> Result<String, QuestionLoadError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(QuestionLoadError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Question document held in memory. Handy for tests and embedded banks.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    document: String,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch(&self) -> Result<String, QuestionLoadError> {
        Ok(self.document.clone())
    }

    fn describe(&self) -> String {
        "<inline>".to_owned()
    }
}

/// Pick a source for `location`: `http://` and `https://` go over the network,
/// anything else is a file path.
#[must_use]
pub fn source_for(location: &str) -> Box<dyn QuestionSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpQuestionSource::new(location))
    } else {
        Box::new(FileQuestionSource::new(location))
    }
}

/// Fetch and parse the question bank.
///
/// # Errors
///
/// Returns `QuestionLoadError` if the source cannot be read or the document is
/// malformed or empty.
pub async fn try_load_bank(source: &dyn QuestionSource) -> Result<QuestionBank, QuestionLoadError> {
    let document = source.fetch().await?;
    Ok(QuestionBank::from_json(&document)?)
}

/// Fetch and parse the question bank, falling back to the built-in set on any
/// failure.
pub async fn load_bank(source: &dyn QuestionSource) -> QuestionBank {
    match try_load_bank(source).await {
        Ok(bank) => {
            info!(source = %source.describe(), questions = bank.len(), "loaded question bank");
            bank
        }
        Err(err) => {
            warn!(
                source = %source.describe(),
                error = %err,
                "failed to load questions, using built-in set"
            );
            QuestionBank::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::model::QuestionError;

    const DOCUMENT: &str = r#"{
        "questions": [
            {"id": 1, "category": "Science", "question": "H2O is?",
             "answers": ["Water", "Salt", "Air", "Gold"], "correct": 0},
            {"id": 2, "category": "History", "question": "Year 1066 battle?",
             "answers": ["Waterloo", "Hastings", "Agincourt", "Bosworth"], "correct": 1}
        ]
    }"#;

    #[tokio::test]
    async fn static_source_loads_bank() {
        let bank = try_load_bank(&StaticQuestionSource::new(DOCUMENT))
            .await
            .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.categories(), vec!["Science", "History"]);
    }

    #[tokio::test]
    async fn malformed_document_is_an_error_and_falls_back() {
        let source = StaticQuestionSource::new(r#"{"questions": [{"id": 1}]}"#);
        assert!(matches!(
            try_load_bank(&source).await,
            Err(QuestionLoadError::Malformed(QuestionError::MissingField { .. }))
        ));
        assert_eq!(load_bank(&source).await, QuestionBank::fallback());
    }

    #[tokio::test]
    async fn empty_document_falls_back() {
        let source = StaticQuestionSource::new(r#"{"questions": []}"#);
        assert_eq!(load_bank(&source).await, QuestionBank::fallback());
    }

    #[tokio::test]
    async fn missing_file_falls_back() {
        let source = FileQuestionSource::new("/nonexistent/trivia/questions.json");
        assert!(matches!(
            try_load_bank(&source).await,
            Err(QuestionLoadError::Io(_))
        ));
        assert_eq!(load_bank(&source).await, QuestionBank::fallback());
    }

    #[tokio::test]
    async fn file_source_reads_document() {
        let path =
            std::env::temp_dir().join(format!("trivia-questions-{}.json", std::process::id()));
        tokio::fs::write(&path, DOCUMENT).await.unwrap();

        let bank = try_load_bank(&FileQuestionSource::new(&path)).await.unwrap();
        assert_eq!(bank.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn locations_pick_a_source() {
        assert_eq!(
            source_for("https://example.com/q.json").describe(),
            "https://example.com/q.json"
        );
        assert_eq!(source_for("data/questions.json").describe(), "data/questions.json");
    }
}
