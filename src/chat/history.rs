//! Chat History Store
//!
//! Keeps the ordered assistant conversation and mirrors it to the
//! `inventomatic-chat-history` blob. The sequence is append-only apart from
//! [`ChatHistory::clear_history`], which reseeds it and drops the blob.

use crate::chat::message::ChatMessage;
use crate::chat::responder::respond;
use crate::inventory::DataSnapshot;
use crate::storage::{FallbackReason, KeyValueStore, Loaded, StorageResult};
use std::sync::Arc;

/// Storage key of the persisted conversation
pub const CHAT_HISTORY_KEY: &str = "inventomatic-chat-history";

/// Conversation log bound to a durable medium
pub struct ChatHistory {
    storage: Arc<dyn KeyValueStore>,
    messages: Vec<ChatMessage>,
    load_reason: Option<FallbackReason>,
}

impl ChatHistory {
    /// Open the conversation, restoring the persisted log when it decodes
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let loaded = Self::load_messages(storage.as_ref());
        let load_reason = loaded.reason().cloned();
        Self {
            storage,
            messages: loaded.into_inner(),
            load_reason,
        }
    }

    /// Decode the persisted log, or a single seed message on any failure
    pub fn load_messages(storage: &dyn KeyValueStore) -> Loaded<Vec<ChatMessage>> {
        let fallback = |reason: FallbackReason| Loaded::Fallback {
            value: vec![ChatMessage::seed()],
            reason,
        };

        let raw = match storage.get_item(CHAT_HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback(FallbackReason::Missing),
            Err(e) => {
                tracing::error!("Failed to read chat history: {}", e);
                return fallback(FallbackReason::Unavailable(e.to_string()));
            }
        };

        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) if messages.is_empty() => fallback(FallbackReason::Missing),
            Ok(mut messages) => {
                messages.sort_by_key(|m| m.timestamp);
                tracing::debug!("Restored {} chat messages", messages.len());
                Loaded::Stored(messages)
            }
            Err(e) => {
                tracing::error!("Failed to parse chat history: {}", e);
                fallback(FallbackReason::Corrupt(e.to_string()))
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Why the initial load fell back to the seed message, if it did
    pub fn load_reason(&self) -> Option<&FallbackReason> {
        self.load_reason.as_ref()
    }

    /// Append a message and persist the conversation
    ///
    /// Timestamps are clamped so the sequence never goes back in time.
    pub fn push(&mut self, mut message: ChatMessage) -> StorageResult<&ChatMessage> {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
        self.persist()?;
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Record a user question and the assistant's reply
    ///
    /// Blank questions are ignored and return `None`.
    pub fn ask(
        &mut self,
        question: &str,
        data: &DataSnapshot,
    ) -> StorageResult<Option<&ChatMessage>> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }

        self.push(ChatMessage::user(question))?;
        let reply = respond(question, &data.inventory, &data.suppliers, &data.transactions);
        self.push(ChatMessage::bot(reply)).map(Some)
    }

    /// Reset to a fresh welcome message and delete the persisted log
    pub fn clear_history(&mut self) -> StorageResult<()> {
        self.messages = vec![ChatMessage::seed()];
        self.storage.remove_item(CHAT_HISTORY_KEY)?;
        tracing::info!("Chat history cleared");
        Ok(())
    }

    fn persist(&self) -> StorageResult<()> {
        // A lone seed message is never written
        if self.messages.len() <= 1 {
            return Ok(());
        }
        let blob = serde_json::to_string(&self.messages)?;
        self.storage.set_item(CHAT_HISTORY_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::WELCOME_MESSAGE;
    use crate::inventory::{InventoryItem, LOW_STOCK};
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn open(storage: &Arc<MemoryStore>) -> ChatHistory {
        ChatHistory::open(storage.clone())
    }

    #[test]
    fn test_fresh_history_is_seeded_and_not_persisted() {
        let storage = Arc::new(MemoryStore::new());
        let history = open(&storage);

        assert_eq!(history.len(), 1);
        assert!(history.messages()[0].is_bot);
        assert_eq!(history.messages()[0].text, WELCOME_MESSAGE);
        assert_eq!(history.load_reason(), Some(&FallbackReason::Missing));
        assert_eq!(storage.get_item(CHAT_HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_ask_appends_and_persists() {
        let storage = Arc::new(MemoryStore::new());
        let data = DataSnapshot {
            inventory: vec![InventoryItem::new("1", "Bolts", LOW_STOCK)],
            ..Default::default()
        };

        let mut history = open(&storage);
        let reply = history.ask("what's my stock level?", &data).unwrap().unwrap();
        assert!(reply.is_bot);
        assert!(reply.text.contains("1 items with low stock: Bolts"));
        assert_eq!(history.len(), 3);

        let reopened = open(&storage);
        assert!(reopened.load_reason().is_none());
        assert_eq!(reopened.messages(), history.messages());
    }

    #[test]
    fn test_blank_question_ignored() {
        let storage = Arc::new(MemoryStore::new());
        let mut history = open(&storage);
        assert!(history.ask("   ", &DataSnapshot::default()).unwrap().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_corrupt_log_falls_back_to_seed() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set_item(CHAT_HISTORY_KEY, r#"[{"id":"1","text":"hi","isBot":false,"timestamp":"yesterday"}]"#)
            .unwrap();

        let history = open(&storage);
        assert_eq!(history.len(), 1);
        assert!(history.messages()[0].is_bot);
        assert!(matches!(history.load_reason(), Some(FallbackReason::Corrupt(_))));
    }

    #[test]
    fn test_clear_history_removes_blob() {
        let storage = Arc::new(MemoryStore::new());
        let mut history = open(&storage);
        history.push(ChatMessage::user("hello")).unwrap();
        assert!(storage.get_item(CHAT_HISTORY_KEY).unwrap().is_some());

        let old_seed_id = history.messages()[0].id.clone();
        history.clear_history().unwrap();

        assert_eq!(history.len(), 1);
        assert!(history.messages()[0].is_bot);
        assert_ne!(history.messages()[0].id, old_seed_id);
        assert_eq!(storage.get_item(CHAT_HISTORY_KEY).unwrap(), None);
        assert_eq!(open(&storage).load_reason(), Some(&FallbackReason::Missing));
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let storage = Arc::new(MemoryStore::new());
        let mut history = open(&storage);

        let mut early = ChatMessage::user("from a skewed clock");
        early.timestamp = history.messages()[0].timestamp - Duration::hours(1);
        history.push(early).unwrap();

        let stamps: Vec<_> = history.messages().iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_stored_log_is_seeded() {
        let storage = Arc::new(MemoryStore::new());
        storage.set_item(CHAT_HISTORY_KEY, "[]").unwrap();

        let history = open(&storage);
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].text, WELCOME_MESSAGE);
        assert_eq!(history.load_reason(), Some(&FallbackReason::Missing));
    }

    #[test]
    fn test_out_of_order_log_is_sorted_on_open() {
        let storage = Arc::new(MemoryStore::new());
        let base = chrono::Utc::now();
        let mut late = ChatMessage::bot("second");
        late.timestamp = base;
        let mut early = ChatMessage::user("first");
        early.timestamp = base - Duration::minutes(5);
        storage
            .set_item(CHAT_HISTORY_KEY, &serde_json::to_string(&vec![late, early]).unwrap())
            .unwrap();

        let history = open(&storage);
        assert!(history.load_reason().is_none());
        let texts: Vec<&str> = history.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_push_after_reload_clamps_to_restored_tail() {
        let storage = Arc::new(MemoryStore::new());
        let mut first = open(&storage);
        let tail = first.push(ChatMessage::user("hello")).unwrap().timestamp;
        drop(first);

        let mut history = open(&storage);
        assert!(history.load_reason().is_none());
        let mut skewed = ChatMessage::user("from a slow clock");
        skewed.timestamp = tail - Duration::hours(2);
        let pushed = history.push(skewed).unwrap();
        assert_eq!(pushed.timestamp, tail);

        let stamps: Vec<_> = open(&storage).messages().iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps.len(), 3);
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_ids_unique_within_session() {
        let storage = Arc::new(MemoryStore::new());
        let mut history = open(&storage);
        for i in 0..20 {
            history.push(ChatMessage::user(format!("q{}", i))).unwrap();
        }
        let mut ids: Vec<&str> = history.messages().iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 21);
    }
}
