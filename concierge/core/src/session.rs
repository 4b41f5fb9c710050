//! Session State
//!
//! The small set of flags that drive the assistant drawer: open or closed,
//! waiting for a reply or not, and the message being composed.
//!
//! The flags are owned by the controller. `awaiting_response` is tracked
//! independently of `is_open`, so closing the drawer while a reply is on
//! its way keeps the request alive and reopening shows the typing
//! indicator again.

use serde::{Deserialize, Serialize};

use crate::messages::{SessionId, SurfaceState};

/// Session flags
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    /// Unique session ID
    pub id: SessionId,
    /// Whether the drawer is open
    is_open: bool,
    /// Whether a provider call is in flight
    awaiting_response: bool,
    /// In-progress composed message
    draft: String,
}

impl SessionState {
    /// Create a closed, idle session
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            is_open: false,
            awaiting_response: false,
            draft: String::new(),
        }
    }

    /// Whether the drawer is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether a provider call is in flight
    #[must_use]
    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Current draft text
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Derived surface state
    #[must_use]
    pub fn surface_state(&self) -> SurfaceState {
        match (self.is_open, self.awaiting_response) {
            (false, _) => SurfaceState::Closed,
            (true, false) => SurfaceState::Idle,
            (true, true) => SurfaceState::AwaitingResponse,
        }
    }

    /// Open the drawer. Returns false if it was already open.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.is_open, true)
    }

    /// Close the drawer. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_open, false)
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Mark a submission accepted: clears the draft and starts waiting
    pub(crate) fn begin_request(&mut self) {
        self.draft.clear();
        self.awaiting_response = true;
    }

    /// Mark the in-flight request settled
    pub(crate) fn end_request(&mut self) {
        self.awaiting_response = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
