//! Concierge Messages
//!
//! Messages sent from the session controller to UI surfaces. A surface that
//! applies every message in order ends up with the same transcript, typing
//! indicator and idle bubble the controller holds.
//!
//! # Design Philosophy
//!
//! Surfaces are pure renderers. They never decide whether a turn exists or
//! whether a request is in flight; they display what they are told:
//!
//! - `TurnAppended` for every turn, in conversation order
//! - `Typing` around every provider call
//! - `Surface` when the assistant drawer opens or closes
//! - `IdlePrompt` / `IdlePromptCleared` for the decorative bubble

use serde::{Deserialize, Serialize};

use crate::conversation::Turn;

/// Messages from the controller to a UI surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConciergeMessage {
    // ============================================
    // Conversation Messages
    // ============================================
    /// A turn was appended to the conversation
    TurnAppended {
        /// The appended turn
        turn: Turn,
    },

    /// Typing indicator on/off (a provider call is in flight)
    Typing {
        /// Whether the indicator should be shown
        active: bool,
    },

    // ============================================
    // Surface Directives
    // ============================================
    /// The assistant drawer opened or closed
    Surface {
        /// Whether the drawer is open
        open: bool,
    },

    /// Show an idle call-to-action bubble
    IdlePrompt {
        /// Bubble text
        text: String,
    },

    /// Hide the idle bubble
    IdlePromptCleared,

    // ============================================
    // System Messages
    // ============================================
    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Session information
    SessionInfo {
        /// Session ID
        session_id: SessionId,
        /// Name of the response provider in use
        provider: String,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Turn identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub String);

impl TurnId {
    /// Generate a new unique turn ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("turn_{id}"))
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

/// Session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID
    pub fn new() -> Self {
        Self(format!("session_{}", uuid::Uuid::new_v4().simple()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The visitor typing into the drawer
    User,
    /// The assistant (persona)
    Assistant,
}

impl Sender {
    /// Role name used by the generation API
    #[must_use]
    pub fn provider_role(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "model",
        }
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Observable state of the assistant surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceState {
    /// Drawer closed
    Closed,
    /// Drawer open, ready for input
    Idle,
    /// Drawer open, a reply is on its way
    AwaitingResponse,
}

impl SurfaceState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Closed => "Closed",
            Self::Idle => "Ready",
            Self::AwaitingResponse => "Typing...",
        }
    }
}
