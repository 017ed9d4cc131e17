//! Butterfly Chat - a small assistant widget
//!
//! Each user message becomes one `GET <endpoint>?message=<text>` request;
//! the reply (or a fixed apology on failure) is appended to the transcript.

mod transport;
mod widget;

pub use transport::{parse_reply, ChatTransport, HttpChatTransport};
pub use widget::{ChatMessage, ChatWidget, PendingReply, Role, APOLOGY, GREETING};
