//! Surface Events
//!
//! Events sent from a UI surface to the controller. Surfaces report what
//! the visitor did; the controller decides what it means.
//!
//! The external "open assistant" trigger is deliberately not a surface
//! event: any component may raise it through a `SignalEmitter`, and the
//! controller reacts to it with an extra greeting.

use serde::{Deserialize, Serialize};

/// Events from a UI surface to the controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Drawer Events
    // ============================================
    /// The visitor used the drawer's open affordance
    OpenRequested,

    /// The visitor used the drawer's close affordance
    CloseRequested,

    // ============================================
    // Input Events
    // ============================================
    /// The composed message changed
    DraftChanged {
        /// Full draft text
        text: String,
    },

    /// The visitor submitted the current draft
    Submit,

    // ============================================
    // Lifecycle Events
    // ============================================
    /// The visitor asked to quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OpenRequested => "open",
            Self::CloseRequested => "close",
            Self::DraftChanged { .. } => "draft",
            Self::Submit => "submit",
            Self::QuitRequested => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        assert_eq!(SurfaceEvent::Submit.kind(), "submit");
        assert_eq!(
            SurfaceEvent::DraftChanged {
                text: "hi".into()
            }
            .kind(),
            "draft"
        );
    }

    #[test]
    fn test_event_serde() {
        let event = SurfaceEvent::DraftChanged {
            text: "hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
