//! Concierge Core - Headless Chat Session for a Portfolio Assistant
//!
//! This crate provides the session logic of the portfolio "digital twin",
//! completely independent of any UI framework. It can drive a TUI, a web
//! surface, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surface                            │
//! │   drawer · transcript · typing indicator · idle bubble · mascot│
//! └───────┬───────────────────────▲──────────────────────┬────────┘
//!         │ SurfaceEvent (up)      │ ConciergeMessage     │ SignalEmitter
//!         │                        │ (down)               │ (open signal)
//! ┌───────▼────────────────────────┴──────────────────────▼────────┐
//! │                        CONCIERGE CORE                          │
//! │  ┌──────────────────────────────────────────────────────────┐  │
//! │  │                       Concierge                           │  │
//! │  │  ┌─────────────┐ ┌──────────┐ ┌─────────┐ ┌────────────┐ │  │
//! │  │  │Conversation │ │ Session  │ │  Idle   │ │  Response  │ │  │
//! │  │  │(append-only)│ │  State   │ │ Prompts │ │  Provider  │ │  │
//! │  │  └─────────────┘ └──────────┘ └─────────┘ └────────────┘ │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Concierge`]: The session controller
//! - [`ConciergeMessage`]: Messages sent from the controller to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to the controller
//! - [`Conversation`]: Append-only transcript of [`Turn`]s
//! - [`ResponseProvider`]: Text generation seam ([`GeminiProvider`], [`ScriptedProvider`])
//! - [`IdlePromptScheduler`]: Decorative call-to-action bubbles
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Instant;
//!
//! use concierge_core::{signal_bus, Concierge, ConciergeConfig, GeminiProvider, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = concierge_core::load_config()?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let (emitter, listener) = signal_bus();
//!
//!     let provider = GeminiProvider::new(config.provider.clone());
//!     let mut concierge = Concierge::new(provider, config, listener, tx);
//!     concierge.start().await?;
//!
//!     // Hand `emitter` to anything that may open the assistant
//!     loop {
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message to UI
//!         }
//!
//!         concierge.tick(Instant::now()).await;
//!
//!         // Handle user input, send as SurfaceEvent
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Response provider abstraction (Gemini, scripted)
//! - [`concierge`]: Main Concierge struct
//! - [`config`]: TOML/env configuration
//! - [`conversation`]: Turns and the append-only conversation
//! - [`events`]: Events from UI surfaces to the controller
//! - [`idle`]: Idle prompt scheduler
//! - [`messages`]: Messages from the controller to UI surfaces
//! - [`persona`]: Persona texts
//! - [`security`]: Input limits
//! - [`session`]: Drawer and request flags
//! - [`signal`]: External open-assistant signal bus
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod concierge;
pub mod config;
pub mod conversation;
pub mod events;
pub mod idle;
pub mod messages;
pub mod persona;
pub mod security;
pub mod session;
pub mod signal;

// Re-exports for convenience
pub use backend::{
    GeminiProvider, ProviderConfig, ProviderError, ProviderRequest, ResponseProvider,
    ScriptedProvider,
};
pub use concierge::{Concierge, SubmitError};
pub use conversation::{Conversation, Turn};
pub use events::SurfaceEvent;
pub use idle::{IdleConfig, IdlePromptScheduler, IdleUpdate};
pub use messages::{ConciergeMessage, NotifyLevel, Sender, SessionId, SurfaceState, TurnId};
pub use persona::Persona;
pub use security::{InputLimits, InputValidator, ValidationResult};
pub use session::SessionState;
pub use signal::{signal_bus, AssistantSignal, SignalEmitter, SignalListener, SignalSource};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env,
    ConciergeConfig, ConfigError, ConfigOverrides, ConfigSource, SessionConfig,
};
