//! Nyumba domain event bus.
//!
//! Side effects of domain operations (notifications, audit trails) are
//! driven by events published here rather than performed inline:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`] — the canonical event envelope.
//! - [`kinds`] — the closed list of event kind names.

pub mod bus;
pub mod kinds;

pub use bus::{DomainEvent, EventBus};
