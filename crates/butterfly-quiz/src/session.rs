//! Per-topic quiz state machine
//!
//! A session moves `Idle -> Loading -> Ready` (or `Failed`). While `Ready`
//! the player selects one answer per question and advances; the last
//! advance completes the attempt and hands back a [`Completion`].
//!
//! Loads are split into [`QuizSession::begin_load`] and
//! [`QuizSession::finish_load`] so a host can fetch on its own schedule.
//! Only the most recent ticket is honoured and nothing is applied after
//! [`QuizSession::close`].

use crate::badge::{tier_for, Tier};
use crate::question::{Question, OPTION_COUNT};
use crate::source::QuestionSource;
use butterfly_core::{ButterflyError, Result, Topic};

/// Text shown in place of a question when loading fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load quiz questions. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Identifies one load request; stale tickets are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Feedback state of one answer button after a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    ChosenCorrect,
    ChosenWrong,
    RevealedCorrect,
    Dimmed,
}

/// Result of a finished attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub topic: Topic,
    pub score: usize,
    pub total: usize,
    pub tier: Tier,
}

impl Completion {
    pub fn message(&self) -> Option<&'static str> {
        self.tier.message()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next,
    Completed(Completion),
}

#[derive(Debug)]
pub struct QuizSession {
    topic: Topic,
    questions: Vec<Question>,
    current_index: usize,
    selected: Option<usize>,
    score: usize,
    complete: bool,
    status: LoadStatus,
    generation: u64,
    closed: bool,
}

impl QuizSession {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            questions: Vec::new(),
            current_index: 0,
            selected: None,
            score: 0,
            complete: false,
            status: LoadStatus::Idle,
            generation: 0,
            closed: false,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetch and apply questions in one step
    pub fn load(&mut self, source: &dyn QuestionSource) -> Result<()> {
        let ticket = self.begin_load();
        let result = source.fetch(self.topic);
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Reset all counters, then load again
    pub fn restart(&mut self, source: &dyn QuestionSource) -> Result<()> {
        self.reset_progress();
        self.load(source)
    }

    /// Start a load, superseding any load still in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        if self.status == LoadStatus::Loading {
            log::debug!(
                "Load {} for '{}' superseded",
                self.generation,
                self.topic
            );
        }
        self.generation += 1;
        if !self.closed {
            self.status = LoadStatus::Loading;
        }
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of a load.
    ///
    /// Returns `Ok(false)` when the ticket is stale or the session is closed;
    /// the outcome is dropped in that case. A failed load keeps the previous
    /// questions and counters but marks the session `Failed`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>>,
    ) -> Result<bool> {
        if self.closed || ticket.generation != self.generation {
            log::debug!(
                "Discarding stale questions for '{}' (load {}, current {})",
                self.topic,
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        let questions = result.and_then(|qs| {
            if qs.is_empty() {
                Err(ButterflyError::QuestionsUnavailable(
                    "no questions for this topic".to_string(),
                ))
            } else {
                Ok(qs)
            }
        });

        match questions {
            Ok(questions) => {
                log::info!("Loaded {} questions for '{}'", questions.len(), self.topic);
                self.questions = questions;
                self.reset_progress();
                self.status = LoadStatus::Ready;
                Ok(true)
            }
            Err(e) => {
                let message = match e {
                    ButterflyError::QuestionsUnavailable(msg) => msg,
                    other => other.to_string(),
                };
                log::warn!("Questions for '{}' unavailable: {}", self.topic, message);
                self.status = LoadStatus::Failed(message.clone());
                Err(ButterflyError::QuestionsUnavailable(message))
            }
        }
    }

    /// Stop accepting load results
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// The question to render; `None` unless the session is `Ready`
    pub fn current_question(&self) -> Option<&Question> {
        if self.status != LoadStatus::Ready {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// Record an answer. Ignored once complete, when an answer is already
    /// chosen, or for an index outside the four options.
    pub fn select_answer(&mut self, index: usize) -> bool {
        if self.complete
            || self.selected.is_some()
            || index >= OPTION_COUNT
            || self.current_question().is_none()
        {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Score the selected answer and move on. `None` without a selection.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.complete {
            return None;
        }
        let selected = self.selected?;
        let correct = self.current_question()?.is_correct(selected);
        if correct {
            self.score += 1;
        }

        if self.current_index + 1 >= self.questions.len() {
            self.complete = true;
            let total = self.questions.len();
            let completion = Completion {
                topic: self.topic,
                score: self.score,
                total,
                tier: tier_for(self.score, total),
            };
            log::info!(
                "Completed '{}' with {}/{} ({})",
                self.topic,
                self.score,
                total,
                completion.tier
            );
            return Some(Advance::Completed(completion));
        }

        self.current_index += 1;
        self.selected = None;
        Some(Advance::Next)
    }

    /// One state per option of the current question
    pub fn option_states(&self) -> Vec<OptionState> {
        let Some(question) = self.current_question() else {
            return Vec::new();
        };
        (0..OPTION_COUNT)
            .map(|i| match self.selected {
                None => OptionState::Idle,
                Some(s) if s == i && question.is_correct(i) => OptionState::ChosenCorrect,
                Some(s) if s == i => OptionState::ChosenWrong,
                Some(_) if question.is_correct(i) => OptionState::RevealedCorrect,
                Some(_) => OptionState::Dimmed,
            })
            .collect()
    }

    /// 1-based question number and total
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current_question()
            .map(|_| (self.current_index + 1, self.questions.len()))
    }

    /// Score as a percentage rounded to one decimal
    pub fn percentage(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let raw = self.score as f64 / self.questions.len() as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    }

    fn reset_progress(&mut self) {
        self.current_index = 0;
        self.selected = None;
        self.score = 0;
        self.complete = false;
    }
}
