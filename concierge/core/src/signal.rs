//! Open-Assistant Signal Bus
//!
//! Other parts of the page (a clickable mascot, a "chat with me" link) ask
//! the assistant to open by raising a signal on a bus that is handed to
//! them explicitly. The controller owns the only listener for its whole
//! lifetime.
//!
//! The bus is an unbounded queue: a signal raised before the controller
//! has polled, or while the drawer is closed, waits until it is drained.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Where a signal came from (for logs only)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSource {
    /// The animated mascot
    Mascot,
    /// Any other named page component
    Component(String),
}

/// Signals understood by the controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistantSignal {
    /// Open the drawer and greet the visitor who triggered it
    Open {
        /// Who raised the signal
        source: SignalSource,
    },
}

/// Create a connected emitter/listener pair
#[must_use]
pub fn signal_bus() -> (SignalEmitter, SignalListener) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalEmitter { tx }, SignalListener { rx })
}

/// Sending half, cloned into every component that may open the assistant
#[derive(Clone, Debug)]
pub struct SignalEmitter {
    tx: mpsc::UnboundedSender<AssistantSignal>,
}

impl SignalEmitter {
    /// Raise a signal. Returns false if the listener is gone.
    pub fn emit(&self, signal: AssistantSignal) -> bool {
        if self.tx.send(signal).is_err() {
            tracing::warn!("Assistant signal dropped: listener gone");
            return false;
        }
        true
    }

    /// Raise `AssistantSignal::Open`
    pub fn open_from(&self, source: SignalSource) -> bool {
        self.emit(AssistantSignal::Open { source })
    }
}

/// Receiving half, owned by the controller
#[derive(Debug)]
pub struct SignalListener {
    rx: mpsc::UnboundedReceiver<AssistantSignal>,
}

impl SignalListener {
    /// Take every queued signal without waiting
    pub fn drain(&mut self) -> Vec<AssistantSignal> {
        let mut signals = Vec::new();
        while let Ok(signal) = self.rx.try_recv() {
            signals.push(signal);
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_queue_until_drained() {
        let (emitter, mut listener) = signal_bus();
        assert!(emitter.open_from(SignalSource::Mascot));
        assert!(emitter.open_from(SignalSource::Component("footer".into())));

        let drained = listener.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(
            drained[0],
            AssistantSignal::Open {
                source: SignalSource::Mascot
            }
        );
        assert!(listener.drain().is_empty());
    }

    #[test]
    fn test_cloned_emitters_share_listener() {
        let (emitter, mut listener) = signal_bus();
        let other = emitter.clone();
        emitter.open_from(SignalSource::Mascot);
        other.open_from(SignalSource::Mascot);
        assert_eq!(listener.drain().len(), 2);
    }

    #[test]
    fn test_emit_after_listener_dropped() {
        let (emitter, listener) = signal_bus();
        drop(listener);
        assert!(!emitter.open_from(SignalSource::Mascot));
    }
}
