//! Domain event plumbing for the auth core.
//!
//! [`EventBus`] is the in-process boundary to the notification
//! collaborator: the orchestrator publishes [`AuthEvent`]s, the transport
//! adapter (message bus, out of scope here) subscribes and forwards them.

pub mod bus;

pub use bus::{AuthEvent, EventBus, UserRegistered};
