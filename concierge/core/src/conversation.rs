//! Conversation Store
//!
//! The ordered log of turns shown in the assistant drawer and sent (as
//! history) with every provider request.
//!
//! The log is append-only: there is no way to edit, remove or reorder a
//! turn. Whatever was sent to the provider is therefore always a prefix of
//! what the surface renders.

use serde::{Deserialize, Serialize};

use crate::messages::{Sender, TurnId};

/// One message in the conversation
///
/// Immutable once created; fields are only reachable through accessors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    sender: Sender,
    text: String,
}

impl Turn {
    /// Create a turn for `sender`
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            sender,
            text: text.into(),
        }
    }

    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Unique turn ID
    #[must_use]
    pub fn id(&self) -> &TurnId {
        &self.id
    }

    /// Who authored this turn
    #[must_use]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Turn text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only conversation log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Start a conversation seeded with the assistant's greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Append a turn and return the full sequence
    pub fn append(&mut self, turn: Turn) -> &[Turn] {
        tracing::debug!(
            turn_id = %turn.id.0,
            sender = ?turn.sender,
            turns = self.turns.len() + 1,
            "Appended turn"
        );
        self.turns.push(turn);
        &self.turns
    }

    /// All turns in chronological order
    #[must_use]
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn
    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false once constructed; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Get turn by ID
    #[must_use]
    pub fn get(&self, id: &TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| &t.id == id)
    }
}
