//! Transcript and the single in-flight request

use crate::transport::ChatTransport;
use butterfly_core::Result;
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "Hello! I am an AI assistant. How can I help you today?";
pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Handed out by `begin_send`; the reply must come back with it
#[derive(Debug, PartialEq, Eq)]
pub struct PendingReply {
    generation: u64,
    message: String,
}

impl PendingReply {
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug)]
pub struct ChatWidget {
    transcript: Vec<ChatMessage>,
    in_flight: Option<u64>,
    generation: u64,
    closed: bool,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::assistant(GREETING)],
            in_flight: None,
            generation: 0,
            closed: false,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Record the user's message and open a request for it.
    ///
    /// Blank input, input while another request is outstanding, and input
    /// after `close` are ignored.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingReply> {
        if self.closed || self.in_flight.is_some() || text.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.transcript.push(ChatMessage::user(text));
        Some(PendingReply {
            generation: self.generation,
            message: text.to_string(),
        })
    }

    /// Append the reply, or the apology if the request failed.
    ///
    /// Returns false when the reply was discarded: the widget was closed or
    /// the ticket is not the outstanding one.
    pub fn finish_send(&mut self, pending: PendingReply, reply: Result<String>) -> bool {
        if self.closed || self.in_flight != Some(pending.generation) {
            log::debug!("Discarding chat reply for a closed or superseded request");
            return false;
        }
        self.in_flight = None;
        let content = match reply {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Chat request failed: {}", e);
                APOLOGY.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(content));
        true
    }

    /// Send and wait for the reply; returns the assistant message appended
    pub fn send(&mut self, transport: &dyn ChatTransport, text: &str) -> Option<&ChatMessage> {
        let pending = self.begin_send(text)?;
        let reply = transport.send(pending.message());
        if self.finish_send(pending, reply) {
            self.transcript.last()
        } else {
            None
        }
    }

    /// Tear down; any reply still in flight is dropped when it lands
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_core::ButterflyError;
    use std::cell::RefCell;

    /// Replays canned replies and remembers what it was sent
    struct ScriptedTransport {
        replies: RefCell<Vec<Result<String>>>,
        sent: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: RefCell::new(replies),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatTransport for ScriptedTransport {
        fn send(&self, message: &str) -> Result<String> {
            self.sent.borrow_mut().push(message.to_string());
            let mut replies = self.replies.borrow_mut();
            if replies.is_empty() {
                Err(ButterflyError::ChatRequestFailed("script exhausted".into()))
            } else {
                replies.remove(0)
            }
        }
    }

    #[test]
    fn starts_with_greeting() {
        let widget = ChatWidget::new();
        assert_eq!(widget.transcript(), &[ChatMessage::assistant(GREETING)]);
    }

    #[test]
    fn reply_is_appended_after_user_message() {
        let transport = ScriptedTransport::new(vec![Ok("Walk or cycle.".into())]);
        let mut widget = ChatWidget::new();

        let reply = widget.send(&transport, "How do I cut emissions?").cloned();
        assert_eq!(reply, Some(ChatMessage::assistant("Walk or cycle.")));
        assert_eq!(widget.transcript().len(), 3);
        assert_eq!(
            widget.transcript()[1],
            ChatMessage::user("How do I cut emissions?")
        );
        assert!(!widget.is_pending());
        assert_eq!(*transport.sent.borrow(), vec!["How do I cut emissions?"]);
    }

    #[test]
    fn failure_appends_apology() {
        let transport = ScriptedTransport::new(vec![Err(ButterflyError::ChatRequestFailed(
            "HTTP 500".into(),
        ))]);
        let mut widget = ChatWidget::new();
        widget.send(&transport, "hello");
        assert_eq!(
            widget.transcript().last(),
            Some(&ChatMessage::assistant(APOLOGY))
        );
        assert!(!widget.is_pending());
    }

    #[test]
    fn blank_input_sends_nothing() {
        let transport = ScriptedTransport::new(vec![]);
        let mut widget = ChatWidget::new();
        assert!(widget.send(&transport, "   ").is_none());
        assert_eq!(widget.transcript().len(), 1);
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut widget = ChatWidget::new();
        let first = widget.begin_send("one").unwrap();
        assert!(widget.begin_send("two").is_none());
        assert!(widget.finish_send(first, Ok("reply".into())));
        assert!(widget.begin_send("three").is_some());
    }

    #[test]
    fn reply_after_close_is_discarded() {
        let mut widget = ChatWidget::new();
        let pending = widget.begin_send("still there?").unwrap();
        widget.close();
        assert!(!widget.finish_send(pending, Ok("late".into())));
        assert_eq!(widget.transcript().len(), 2);
        assert!(widget.begin_send("again").is_none());
    }
}
