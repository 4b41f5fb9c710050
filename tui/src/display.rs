//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConciergeMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Concierge tells it to.
//! Display state is the bridge between ConciergeMessages and rendering.
//!
//! - DisplayMessage: A rendered transcript turn
//! - DisplayNotification: The latest status-line notice

use concierge_core::{
    ConciergeMessage, NotifyLevel, Sender, SessionId, SurfaceState, Turn, TurnId,
};

/// A rendered transcript turn
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMessage {
    /// Turn ID
    pub id: TurnId,
    /// Who wrote it
    pub role: DisplayRole,
    /// The turn text
    pub content: String,
}

impl From<Turn> for DisplayMessage {
    fn from(turn: Turn) -> Self {
        Self {
            id: turn.id().clone(),
            role: turn.sender().into(),
            content: turn.text().to_string(),
        }
    }
}

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// Visitor input
    User,
    /// The persona
    Assistant,
}

impl From<Sender> for DisplayRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => DisplayRole::User,
            Sender::Assistant => DisplayRole::Assistant,
        }
    }
}

impl DisplayRole {
    /// Line prefix for this role
    pub fn prefix(&self, assistant_name: &str) -> String {
        match self {
            DisplayRole::User => "You: ".to_string(),
            DisplayRole::Assistant => format!("{assistant_name}: "),
        }
    }
}

/// A notification to display
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Transcript, in conversation order
    pub messages: Vec<DisplayMessage>,
    /// Typing indicator
    pub typing: bool,
    /// Whether the drawer is open
    pub open: bool,
    /// Idle bubble text (if showing)
    pub idle_prompt: Option<String>,
    /// Latest notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Session ID, once announced
    pub session_id: Option<SessionId>,
    /// Name of the provider answering
    pub provider: String,
    /// Name shown in front of assistant turns
    pub assistant_name: String,
    /// The Concierge asked the surface to quit
    pub quit_requested: bool,
    /// Goodbye text that came with the quit request
    pub goodbye: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            typing: false,
            open: false,
            idle_prompt: None,
            notification: None,
            session_id: None,
            provider: String::new(),
            assistant_name: "Assistant".to_string(),
            quit_requested: false,
            goodbye: None,
        }
    }
}

impl DisplayState {
    /// Create a display state that labels assistant turns with `name`
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            ..Self::default()
        }
    }

    /// Apply a ConciergeMessage to update display state
    pub fn apply_message(&mut self, msg: ConciergeMessage) {
        match msg {
            // Conversation messages
            ConciergeMessage::TurnAppended { turn } => {
                self.messages.push(turn.into());
            }
            ConciergeMessage::Typing { active } => {
                self.typing = active;
            }

            // Surface directives
            ConciergeMessage::Surface { open } => {
                self.open = open;
            }
            ConciergeMessage::IdlePrompt { text } => {
                self.idle_prompt = Some(text);
            }
            ConciergeMessage::IdlePromptCleared => {
                self.idle_prompt = None;
            }

            // System messages
            ConciergeMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification { level, message });
            }
            ConciergeMessage::SessionInfo {
                session_id,
                provider,
            } => {
                self.session_id = Some(session_id);
                self.provider = provider;
            }
            ConciergeMessage::Quit { message } => {
                self.quit_requested = true;
                self.goodbye = message;
            }
        }
    }

    /// Surface state as the renderer should show it
    pub fn surface_state(&self) -> SurfaceState {
        match (self.open, self.typing) {
            (false, _) => SurfaceState::Closed,
            (true, false) => SurfaceState::Idle,
            (true, true) => SurfaceState::AwaitingResponse,
        }
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    /// Lines of the transcript wrapped to `width`, with a blank line after
    /// each turn
    pub fn wrapped_lines(&self, width: usize) -> Vec<(DisplayRole, String)> {
        let mut lines = Vec::new();
        for msg in &self.messages {
            let content = format!("{}{}", msg.role.prefix(&self.assistant_name), msg.content);
            for line in textwrap::wrap(&content, width.max(1)) {
                lines.push((msg.role, line.into_owned()));
            }
            lines.push((msg.role, String::new()));
        }
        lines
    }
}
