//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`AuthEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.
//! Delivery to the external transport is at-least-once from the consumer's
//! point of view, so consumers must be idempotent per verification token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Payload published once per successful registration. Carries everything
/// the notification collaborator needs to build the verification link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    pub email: String,
    pub full_name: String,
    pub verification_token: String,
}

/// A domain event emitted by the auth core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    UserRegistered(UserRegistered),
}

/// An event with its emission timestamp, as seen by subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: AuthEvent,
    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`AuthEvent`].
pub struct EventBus {
    sender: broadcast::Sender<Envelope>,
}

impl EventBus {
    /// Create a bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Publish an event to every current subscriber.
    ///
    /// Publishing with no subscribers is not an error: the core must not
    /// fail a registration because the transport adapter is absent (a test
    /// environment, for instance).
    pub fn publish(&self, event: AuthEvent) {
        let envelope = Envelope {
            event,
            timestamp: Utc::now(),
        };
        if let Err(err) = self.sender.send(envelope) {
            tracing::debug!(event = ?err.0.event, "event published with no subscribers");
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
