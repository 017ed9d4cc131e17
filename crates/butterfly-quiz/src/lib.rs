//! Butterfly Quiz - topic quizzes and earned badges
//!
//! A quiz attempt is a [`QuizSession`] fed by a [`QuestionSource`]. Finishing
//! an attempt yields a [`Completion`] whose tier is recorded in a
//! [`BadgeBook`], which the [`TopicHub`] reads back to decorate its buttons.

mod badge;
mod briefing;
mod flashcard;
mod hub;
mod question;
mod session;
mod source;
mod store;

pub use badge::{tier_for, BadgeBook, Tier, BADGE_STORAGE_KEY};
pub use briefing::{BriefingGate, START_LABEL};
pub use flashcard::{Flashcard, CARD_TITLE};
pub use hub::{HubEntry, InventoryItem, TopicHub, HUB_SUBTITLE, HUB_TITLE};
pub use question::{parse_question_payload, parse_question_value, Question, OPTION_COUNT};
pub use session::{
    Advance, Completion, LoadStatus, LoadTicket, OptionState, QuizSession, LOAD_FAILED_MESSAGE,
};
pub use source::{
    DirectoryQuestionSource, HttpQuestionSource, MemoryQuestionSource, QuestionSource,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
