//! Assistant conversation store.
//!
//! # Invariants
//! - Messages are append-only; only `clear` removes them.
//! - The persisted blob holds at most [`MAX_PERSISTED_MESSAGES`] messages,
//!   the most recent ones.

use super::PersistedState;
use crate::model::message::{Category, Intent, Message, Sender};
use crate::model::EntityId;
use crate::storage::{SharedStorage, ASSISTANT_KEY};
use chrono::Utc;
use serde::{Deserialize, Serialize, Serializer};

pub const MAX_PERSISTED_MESSAGES: usize = 50;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConversationState {
    #[serde(default, serialize_with = "serialize_recent")]
    messages: Vec<Message>,
}

fn serialize_recent<S: Serializer>(messages: &[Message], serializer: S) -> Result<S::Ok, S::Error> {
    let start = messages.len().saturating_sub(MAX_PERSISTED_MESSAGES);
    messages[start..].serialize(serializer)
}

pub struct AssistantStore {
    state: PersistedState<ConversationState>,
}

impl AssistantStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, ASSISTANT_KEY),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.get().messages
    }

    pub fn len(&self) -> usize {
        self.state.get().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.get().messages.is_empty()
    }

    pub fn push_user(&mut self, text: &str) -> EntityId {
        self.push(Message::new(Sender::User, text, Utc::now()))
    }

    pub fn push_assistant(
        &mut self,
        text: &str,
        category: Category,
        intent: Intent,
    ) -> EntityId {
        self.push(Message::new(Sender::Assistant, text, Utc::now()).with_labels(category, intent))
    }

    pub fn push(&mut self, message: Message) -> EntityId {
        let id = message.id;
        self.state.commit("message_append", |state| {
            state.messages.push(message);
            Some(())
        });
        id
    }

    /// Last `count` messages in chronological order.
    pub fn recent_history(&self, count: usize) -> &[Message] {
        let messages = &self.state.get().messages;
        &messages[messages.len().saturating_sub(count)..]
    }

    pub fn clear(&mut self) -> usize {
        self.state
            .commit("messages_clear", |state| {
                let removed = state.messages.len();
                state.messages.clear();
                (removed > 0).then_some(removed)
            })
            .unwrap_or(0)
    }
}
