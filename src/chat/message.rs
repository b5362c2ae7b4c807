//! Chat message type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting used to seed a fresh conversation
pub const WELCOME_MESSAGE: &str = "Hello! I'm your Inventomatic assistant. Ask me about stock levels, suppliers, transactions, or reports.";

/// A single assistant or user message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped now with a fresh time-ordered id
    pub fn new(text: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            is_bot,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// The welcome message
    pub fn seed() -> Self {
        Self::bot(WELCOME_MESSAGE)
    }
}
