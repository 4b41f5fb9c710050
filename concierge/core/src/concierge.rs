//! Concierge - The Session Controller
//!
//! The Concierge owns one chat session and coordinates:
//! - the append-only conversation
//! - open/closed and awaiting-response state
//! - the single in-flight provider call
//! - the external open signal and its delayed greeting
//! - idle call-to-action prompts
//!
//! # Design Philosophy
//!
//! The Concierge is UI-agnostic. A surface drives it with `SurfaceEvent`s
//! and a regular `tick`, and renders the `ConciergeMessage`s it sends back.
//! Nothing here blocks: the provider call runs in a spawned task and its
//! result is picked up by `poll_pending` on a later tick.
//!
//! # Invariants
//!
//! - Turns are only ever appended
//! - At most one provider call is in flight
//! - Every accepted submission produces exactly one assistant turn, either
//!   the reply or the persona's fallback text

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::backend::{ProviderError, ProviderRequest, ResponseProvider};
use crate::config::ConciergeConfig;
use crate::conversation::{Conversation, Turn};
use crate::events::SurfaceEvent;
use crate::idle::{IdlePromptScheduler, IdleUpdate};
use crate::messages::{ConciergeMessage, NotifyLevel, SessionId, SurfaceState, TurnId};
use crate::persona::Persona;
use crate::security::{InputValidator, ValidationResult};
use crate::session::SessionState;
use crate::signal::{AssistantSignal, SignalListener};

/// Why a submission was not accepted
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Nothing but whitespace
    #[error("message is empty")]
    Empty,

    /// A reply to the previous message is still on its way
    #[error("still waiting for the previous reply")]
    Busy,

    /// Input failed the size or character checks
    #[error("message rejected: {0}")]
    Rejected(String),
}

/// The provider call currently in flight
struct PendingReply {
    /// Turn that triggered the call
    turn_id: TurnId,
    started: Instant,
    rx: oneshot::Receiver<Result<String, ProviderError>>,
    handle: JoinHandle<()>,
}

/// The Concierge - headless session controller
pub struct Concierge<P: ResponseProvider> {
    /// Configuration
    config: ConciergeConfig,
    /// Response provider
    provider: Arc<P>,
    /// Drawer and request flags
    session: SessionState,
    /// Append-only transcript
    conversation: Conversation,
    /// Idle call-to-action bubbles
    idle: IdlePromptScheduler,
    /// External open signals
    signals: SignalListener,
    /// Due times of greetings scheduled by open signals, oldest first
    scheduled_greetings: VecDeque<Instant>,
    /// The single in-flight request slot
    pending: Option<PendingReply>,
    /// Input validator for submissions
    input_validator: InputValidator,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConciergeMessage>,
}

impl<P: ResponseProvider + 'static> Concierge<P> {
    /// Create a new Concierge with the given provider
    pub fn new(
        provider: P,
        config: ConciergeConfig,
        signals: SignalListener,
        tx: mpsc::Sender<ConciergeMessage>,
    ) -> Self {
        let conversation = Conversation::new(config.persona.greeting.clone());
        let idle = IdlePromptScheduler::new(&config.idle);
        let input_validator = InputValidator::new(config.session.input_limits());

        Self {
            config,
            provider: Arc::new(provider),
            session: SessionState::new(),
            conversation,
            idle,
            signals,
            scheduled_greetings: VecDeque::new(),
            pending: None,
            input_validator,
            tx,
        }
    }

    /// Use a fixed seed for idle prompt draws
    #[must_use]
    pub fn with_idle_seed(mut self, seed: u64) -> Self {
        self.idle = IdlePromptScheduler::with_seed(&self.config.idle, seed);
        self
    }

    /// Get the session ID
    pub fn session_id(&self) -> &SessionId {
        &self.session.id
    }

    /// Session flags
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The transcript
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Idle prompt scheduler
    pub fn idle(&self) -> &IdlePromptScheduler {
        &self.idle
    }

    /// Persona in use
    pub fn persona(&self) -> &Persona {
        &self.config.persona
    }

    /// Name of the response provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Derived surface state
    pub fn surface_state(&self) -> SurfaceState {
        self.session.surface_state()
    }

    /// Whether the drawer is open
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Whether a provider call is in flight
    pub fn is_awaiting_response(&self) -> bool {
        self.session.is_awaiting_response()
    }

    /// Number of open-signal greetings not yet appended
    pub fn scheduled_greetings(&self) -> usize {
        self.scheduled_greetings.len()
    }

    /// Announce the session and replay the transcript to the surface
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.send(ConciergeMessage::SessionInfo {
            session_id: self.session.id.clone(),
            provider: self.provider.name().to_string(),
        })
        .await;

        let turns = self.conversation.snapshot().to_vec();
        for turn in turns {
            self.send(ConciergeMessage::TurnAppended { turn }).await;
        }

        tracing::info!(
            session_id = %self.session.id,
            provider = self.provider.name(),
            "Session started"
        );
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(event = event.kind(), "Surface event");

        match event {
            SurfaceEvent::OpenRequested => {
                self.open(Instant::now()).await;
            }

            SurfaceEvent::CloseRequested => {
                self.close().await;
            }

            SurfaceEvent::DraftChanged { text } => {
                self.set_draft(text);
            }

            SurfaceEvent::Submit => match self.submit_draft().await {
                Ok(_) | Err(SubmitError::Empty) => {}
                Err(SubmitError::Busy) => {
                    self.notify(
                        NotifyLevel::Warning,
                        "Still thinking about your last message...",
                    )
                    .await;
                }
                Err(SubmitError::Rejected(reason)) => {
                    self.notify(NotifyLevel::Warning, &format!("Invalid message: {reason}"))
                        .await;
                }
            },

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Open the drawer
    ///
    /// Opening an open drawer does nothing.
    pub async fn open(&mut self, now: Instant) {
        if !self.session.open() {
            return;
        }

        self.idle.resume(now);
        self.send(ConciergeMessage::Surface { open: true }).await;
        tracing::info!(session_id = %self.session.id, "Drawer opened");
    }

    /// Close the drawer
    ///
    /// The transcript is kept and an in-flight request keeps running.
    pub async fn close(&mut self) {
        if !self.session.close() {
            return;
        }

        self.idle.pause();
        self.send(ConciergeMessage::Surface { open: false }).await;
        tracing::info!(
            session_id = %self.session.id,
            awaiting = self.session.is_awaiting_response(),
            "Drawer closed"
        );
    }

    /// Update the message being composed
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.session.set_draft(text);
    }

    /// Current draft
    pub fn draft(&self) -> &str {
        self.session.draft()
    }

    /// Submit the current draft
    pub async fn submit_draft(&mut self) -> Result<TurnId, SubmitError> {
        let draft = self.session.draft().to_string();
        self.submit(&draft).await
    }

    /// Submit a user message
    ///
    /// On success the user turn is appended, the draft is cleared and one
    /// provider call is started. On any error nothing changes.
    pub async fn submit(&mut self, text: &str) -> Result<TurnId, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::Empty);
        }

        if self.pending.is_some() || self.session.is_awaiting_response() {
            tracing::debug!(session_id = %self.session.id, "Submission while busy");
            return Err(SubmitError::Busy);
        }

        if let ValidationResult::Invalid(reason) = self.input_validator.validate_message(text) {
            tracing::warn!(reason = %reason, "Rejected user message");
            return Err(SubmitError::Rejected(reason));
        }

        // History is everything before the new message
        let request = ProviderRequest::new(&self.config.persona.instruction, text)
            .with_history(self.conversation.snapshot());

        let turn = Turn::user(text);
        let turn_id = turn.id().clone();
        self.append(turn).await;

        self.session.begin_request();
        self.send(ConciergeMessage::Typing { active: true }).await;
        self.spawn_request(turn_id.clone(), request);

        tracing::info!(
            session_id = %self.session.id,
            turns = self.conversation.len(),
            "Message submitted"
        );

        Ok(turn_id)
    }

    /// Start the provider call in the background
    fn spawn_request(&mut self, turn_id: TurnId, request: ProviderRequest) {
        let provider = Arc::clone(&self.provider);
        let deadline = self.config.provider.timeout();
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let result = match tokio::time::timeout(deadline, provider.generate(&request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(duration_ms(deadline))),
            };
            // Receiver is gone only after shutdown
            let _ = tx.send(result);
        });

        self.pending = Some(PendingReply {
            turn_id,
            started: Instant::now(),
            rx,
            handle,
        });
    }

    /// Settle the in-flight request if its result has arrived
    ///
    /// Call this regularly. Returns true if a reply (or fallback) was appended.
    pub async fn poll_pending(&mut self) -> bool {
        let result = match self.pending.as_mut() {
            None => return false,
            Some(pending) => match pending.rx.try_recv() {
                Ok(result) => result,
                Err(oneshot::error::TryRecvError::Empty) => return false,
                Err(oneshot::error::TryRecvError::Closed) => Err(lost_reply()),
            },
        };

        if let Some(pending) = self.pending.take() {
            self.finish_request(&pending, result).await;
        }
        true
    }

    /// Wait for the in-flight request and settle it
    ///
    /// Returns false if nothing was in flight.
    pub async fn settle(&mut self) -> bool {
        let Some(mut pending) = self.pending.take() else {
            return false;
        };

        let result = (&mut pending.rx).await.unwrap_or_else(|_| Err(lost_reply()));
        self.finish_request(&pending, result).await;
        true
    }

    /// Append the reply (or fallback) and leave the awaiting state
    async fn finish_request(
        &mut self,
        pending: &PendingReply,
        result: Result<String, ProviderError>,
    ) {
        let elapsed_ms = duration_ms(pending.started.elapsed());

        let text = match result {
            Ok(reply) => {
                tracing::info!(
                    session_id = %self.session.id,
                    turn = %pending.turn_id.0,
                    elapsed_ms,
                    "Reply received"
                );
                reply
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %self.session.id,
                    turn = %pending.turn_id.0,
                    elapsed_ms,
                    error = %error,
                    "Provider failed, using fallback reply"
                );
                self.config.persona.fallback_reply.clone()
            }
        };

        self.append(Turn::assistant(text)).await;
        self.session.end_request();
        self.send(ConciergeMessage::Typing { active: false }).await;
    }

    /// Advance timers and pick up pending work
    ///
    /// Drains open signals, appends greetings that are due, drives the idle
    /// scheduler and settles a finished request. Returns true if anything
    /// happened.
    pub async fn tick(&mut self, now: Instant) -> bool {
        let mut activity = false;

        for signal in self.signals.drain() {
            self.handle_signal(signal, now).await;
            activity = true;
        }

        while self.scheduled_greetings.front().is_some_and(|due| *due <= now) {
            self.scheduled_greetings.pop_front();
            let greeting = self.config.persona.clicked_greeting.clone();
            self.append(Turn::assistant(greeting)).await;
            activity = true;
        }

        for update in self.idle.tick(now) {
            let msg = match update {
                IdleUpdate::Shown(text) => ConciergeMessage::IdlePrompt { text },
                IdleUpdate::Hidden => ConciergeMessage::IdlePromptCleared,
            };
            self.send(msg).await;
            activity = true;
        }

        if self.poll_pending().await {
            activity = true;
        }

        activity
    }

    /// React to an external signal
    async fn handle_signal(&mut self, signal: AssistantSignal, now: Instant) {
        match signal {
            AssistantSignal::Open { source } => {
                tracing::debug!(source = ?source, "Open signal");
                self.open(now).await;
                self.scheduled_greetings
                    .push_back(now + self.config.session.greeting_delay());
            }
        }
    }

    /// Shut down the session
    ///
    /// A still-running provider call is aborted.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            self.session.end_request();
            tracing::debug!(turn = %pending.turn_id.0, "Aborted in-flight request");
        }

        tracing::info!(
            session_id = %self.session.id,
            turns = self.conversation.len(),
            "Session ended"
        );

        self.send(ConciergeMessage::Quit {
            message: Some("Goodbye!".to_string()),
        })
        .await;

        Ok(())
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConciergeMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Append a turn and tell the surface
    async fn append(&mut self, turn: Turn) {
        self.conversation.append(turn.clone());
        self.send(ConciergeMessage::TurnAppended { turn }).await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConciergeMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

fn lost_reply() -> ProviderError {
    ProviderError::Unavailable("provider task ended without a reply".to_string())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
