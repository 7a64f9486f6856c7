//! Titled messages, one body per title.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe in-memory message store keyed by title.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: RwLock<HashMap<String, Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a message, replacing any previous message with the same title.
    pub fn save(&self, title: String, body: String) -> Message {
        let message = Message {
            title: title.clone(),
            body,
            created_at: Utc::now(),
        };
        self.messages.write().insert(title, message.clone());
        message
    }

    pub fn get(&self, title: &str) -> Option<Message> {
        self.messages.read().get(title).cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_get() {
        let store = MessageStore::new();
        store.save("hello".to_string(), "world".to_string());

        let message = store.get("hello").unwrap();
        assert_eq!(message.body, "world");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_save_replaces_existing_title() {
        let store = MessageStore::new();
        store.save("t".to_string(), "first".to_string());
        store.save("t".to_string(), "second".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("t").unwrap().body, "second");
    }
}
