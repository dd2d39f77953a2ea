//! Per-device chat transcript.
//!
//! The assistant widget keeps its conversation in the session so the panel
//! survives page navigation. An empty transcript renders the welcome message
//! with the suggested questions instead.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Who said a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

/// One transcript entry. Bot text may carry lightweight markup
/// (`**bold**`, `*italic*`, newlines) rendered by the `chat_markup` filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    /// Whether this is an assistant message (rendered with markup).
    #[must_use]
    pub fn is_bot(&self) -> bool {
        self.role == ChatRole::Bot
    }
}

/// The transcript value kept under one session key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.into(),
        });
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Bot,
            text: text.into(),
        });
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Suggested questions shown with the welcome message.
pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "What are the Cocopeat Products?",
    "What can I do with steel scrap?",
    "Tell me about the Herbal Perfumes.",
    "How fast is the delivery?",
    "How can I track my order?",
    "What are your payment options?",
    "How can I partner with you?",
    "What is your return policy?",
];

/// Load the transcript from the session. Absent or unreadable reads as empty.
pub async fn load(session: &Session) -> ChatLog {
    session
        .get::<ChatLog>(session_keys::CHAT_LOG)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the transcript to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save(
    session: &Session,
    log: &ChatLog,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHAT_LOG, log).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keeps_order() {
        let mut log = ChatLog::default();
        log.push_user("hello");
        log.push_bot("hi there");
        log.push_user("what do you sell?");

        assert_eq!(log.messages().len(), 3);
        assert_eq!(log.messages()[0].role, ChatRole::User);
        assert_eq!(log.messages()[1].role, ChatRole::Bot);
        assert_eq!(log.messages()[2].text, "what do you sell?");
    }

    #[test]
    fn test_empty_transcript_triggers_welcome() {
        let log = ChatLog::default();
        assert!(log.is_empty());
        assert_eq!(SUGGESTED_QUESTIONS.len(), 8);
    }
}
