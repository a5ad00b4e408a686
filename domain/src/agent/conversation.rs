//! Append-only conversation state for a single run.

use serde::{Deserialize, Serialize};

use crate::session::entities::{Message, Role};

/// Ordered turns of one run.
///
/// Turns can only be appended; there is no API to edit or remove one, so the
/// transcript grows monotonically for the lifetime of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationState {
    turns: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with the system instructions and the user query.
    pub fn seeded(system_prompt: impl Into<String>, query: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.append(Message::system(system_prompt));
        state.append(Message::user(query));
        state
    }

    pub fn append(&mut self, message: Message) {
        self.turns.push(message);
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.append(Message::assistant(content));
    }

    pub fn append_observation(&mut self, content: impl Into<String>) {
        self.append(Message::tool(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Message> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|m| m.role == role).count()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.turns
    }
}
