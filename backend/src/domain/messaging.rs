//! Conversation and message primitives.

use serde::{Deserialize, Serialize};

/// Maximum message length, in characters.
pub const MESSAGE_CONTENT_MAX: usize = 10_000;

/// Validation errors for message payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingValidationError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Message must be 10,000 characters or less")]
    MessageTooLong,
}

/// Body of a message sent between two travellers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageContent(String);

impl MessageContent {
    /// Accept between 1 and [`MESSAGE_CONTENT_MAX`] characters.
    pub fn new(content: impl Into<String>) -> Result<Self, MessagingValidationError> {
        let content = content.into();
        if content.is_empty() {
            return Err(MessagingValidationError::EmptyMessage);
        }
        if content.chars().count() > MESSAGE_CONTENT_MAX {
            return Err(MessagingValidationError::MessageTooLong);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for MessageContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MessageContent> for String {
    fn from(value: MessageContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = MessagingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// State of a conversation between two travellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationStatus {
    /// Both participants may send messages.
    #[default]
    Active,
    /// Closed by a participant; kept for history.
    Archived,
    /// One participant blocked the other.
    Blocked,
}

impl ConversationStatus {
    /// Whether new messages may be appended.
    pub fn accepts_messages(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn content_accepts_boundary_length() {
        let content = "a".repeat(MESSAGE_CONTENT_MAX);
        assert!(MessageContent::new(content).is_ok());
    }

    #[rstest]
    #[case(String::new(), MessagingValidationError::EmptyMessage)]
    #[case("a".repeat(MESSAGE_CONTENT_MAX + 1), MessagingValidationError::MessageTooLong)]
    fn content_rejects_bad_lengths(
        #[case] content: String,
        #[case] expected: MessagingValidationError,
    ) {
        assert_eq!(MessageContent::new(content), Err(expected));
    }

    #[rstest]
    fn only_active_conversations_accept_messages() {
        assert!(ConversationStatus::Active.accepts_messages());
        assert!(!ConversationStatus::Archived.accepts_messages());
        assert!(!ConversationStatus::Blocked.accepts_messages());
    }
}
