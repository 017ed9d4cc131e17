//! Question sources
//!
//! The remote question service is an external collaborator: `GET
//! <base>/<topic key>` answers with a question payload. Offline play reads
//! the same payloads from `<dir>/<topic key>.json`.

use crate::question::{parse_question_payload, parse_question_value, Question};
use butterfly_core::{ButterflyError, Result, Topic};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Anything that can produce the questions for a topic
pub trait QuestionSource {
    /// Source name for logging (e.g. "http", "directory", "memory")
    fn name(&self) -> &str;

    fn fetch(&self, topic: Topic) -> Result<Vec<Question>>;
}

/// Blocking HTTP client for the question service
pub struct HttpQuestionSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpQuestionSource {
    pub fn new(base_url: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: config.into(),
        }
    }

    pub fn url_for(&self, topic: Topic) -> String {
        format!("{}/{}", self.base_url, topic.key())
    }
}

impl QuestionSource for HttpQuestionSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, topic: Topic) -> Result<Vec<Question>> {
        let url = self.url_for(topic);
        log::info!("Fetching questions for '{}' from {}", topic, url);

        let mut response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| {
                ButterflyError::QuestionsUnavailable(format!("request to {} failed: {}", url, e))
            })?;

        let status = response.status();
        let body: Option<serde_json::Value> = response.body_mut().read_json().ok();

        if !status.is_success() {
            // Prefer the service's own `{error}` message when it sent one
            if let Some(Err(e)) = body
                .as_ref()
                .filter(|v| v.get("error").is_some())
                .map(parse_question_value)
            {
                return Err(e);
            }
            return Err(ButterflyError::QuestionsUnavailable(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        match body {
            Some(value) => parse_question_value(&value),
            None => Err(ButterflyError::QuestionsUnavailable(format!(
                "malformed payload from {}",
                url
            ))),
        }
    }
}

/// Reads `<dir>/<topic key>.json`
pub struct DirectoryQuestionSource {
    dir: PathBuf,
}

impl DirectoryQuestionSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, topic: Topic) -> PathBuf {
        self.dir.join(format!("{}.json", topic.key()))
    }
}

impl QuestionSource for DirectoryQuestionSource {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(&self, topic: Topic) -> Result<Vec<Question>> {
        let path = self.path_for(topic);
        log::info!("Reading questions for '{}' from {}", topic, path.display());
        let body = std::fs::read_to_string(&path).map_err(|e| {
            ButterflyError::QuestionsUnavailable(format!("{}: {}", path.display(), e))
        })?;
        parse_question_payload(&body)
    }
}

/// In-memory source with canned answers per topic
#[derive(Default)]
pub struct MemoryQuestionSource {
    questions: HashMap<Topic, Vec<Question>>,
    errors: HashMap<Topic, String>,
    fetches: Cell<usize>,
}

impl MemoryQuestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(mut self, topic: Topic, questions: Vec<Question>) -> Self {
        self.errors.remove(&topic);
        self.questions.insert(topic, questions);
        self
    }

    /// Make `topic` answer like a service returning `{"error": message}`
    pub fn with_error(mut self, topic: Topic, message: &str) -> Self {
        self.questions.remove(&topic);
        self.errors.insert(topic, message.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl QuestionSource for MemoryQuestionSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, topic: Topic) -> Result<Vec<Question>> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(message) = self.errors.get(&topic) {
            return Err(ButterflyError::QuestionsUnavailable(message.clone()));
        }
        self.questions
            .get(&topic)
            .cloned()
            .ok_or_else(|| ButterflyError::QuestionsUnavailable("topic not found".to_string()))
    }
}
