//! Standalone single-question card

use crate::question::{Question, OPTION_COUNT};

pub const CARD_TITLE: &str = "Climate Champions";

/// A practice card; unlike a quiz the answer can be changed freely
#[derive(Debug, Clone)]
pub struct Flashcard {
    question: Question,
    selected: Option<usize>,
}

impl Default for Flashcard {
    fn default() -> Self {
        Self::new(Question::new(
            "Which of these helps reduce global warming?",
            [
                "Using public transport",
                "Leaving lights on when not in use",
                "Using single-use plastics",
                "Keeping the car engine running while parked",
            ],
            0,
        ))
    }
}

impl Flashcard {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            selected: None,
        }
    }

    pub fn title(&self) -> &'static str {
        CARD_TITLE
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Letter shown next to option `index`
    pub fn marker(index: usize) -> char {
        (b'A' + (index % OPTION_COUNT) as u8) as char
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= OPTION_COUNT {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// `None` until something is selected
    pub fn is_correct(&self) -> Option<bool> {
        self.selected.map(|i| self.question.is_correct(i))
    }
}
