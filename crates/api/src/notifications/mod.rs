//! Event-driven notification dispatcher.
//!
//! Subscribes to the [`EventBus`] and turns domain events into
//! notification rows for the affected counterparty. Dispatch runs on its
//! own task: a failed insert is logged and never affects the operation
//! that published the event.

use tokio::sync::broadcast;

use nyumba_db::models::notification::NewNotification;
use nyumba_db::repositories::NotificationRepo;
use nyumba_db::DbPool;
use nyumba_events::{kinds, DomainEvent, EventBus};

/// Consumes domain events and writes notifications.
pub struct NotificationDispatcher {
    pool: DbPool,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run until the event bus is closed.
    ///
    /// A lagged receiver logs how many events were missed and keeps
    /// going; missed notifications are an accepted trade-off of the
    /// bounded broadcast buffer.
    pub async fn run(self, mut rx: broadcast::Receiver<DomainEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.dispatch(&event).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Notification dispatcher lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher stopping");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, event: &DomainEvent) {
        let Some(notification) = build_notification(event) else {
            return;
        };

        if let Err(err) = NotificationRepo::insert(&self.pool, &notification).await {
            tracing::error!(
                error = %err,
                kind = %event.kind,
                user_id = notification.user_id,
                "Failed to store notification"
            );
        }
    }
}

/// Map an event to a notification, or `None` for kinds nobody is told
/// about (e.g. `property.created`).
///
/// The recipient comes from the event payload's `notify_user_id`, set by
/// the publishing handler, which knows which party is the counterparty.
fn build_notification(event: &DomainEvent) -> Option<NewNotification> {
    let user_id = event.payload.get("notify_user_id")?.as_i64()?;

    let property_title = event
        .payload
        .get("property_title")
        .and_then(|v| v.as_str())
        .unwrap_or("your property");

    let (title, message) = match event.kind.as_str() {
        kinds::VIEWING_REQUESTED => (
            "New viewing request",
            format!("A viewing of {property_title} has been requested"),
        ),
        kinds::VIEWING_CONFIRMED => (
            "Viewing confirmed",
            format!("Your viewing of {property_title} has been confirmed"),
        ),
        kinds::VIEWING_CANCELLED => (
            "Viewing cancelled",
            format!("A viewing of {property_title} has been cancelled"),
        ),
        kinds::VIEWING_COMPLETED => (
            "Viewing completed",
            format!("Your viewing of {property_title} has been marked completed"),
        ),
        kinds::VIEWING_NO_SHOW => (
            "Viewing missed",
            format!("Your viewing of {property_title} was marked as a no-show"),
        ),
        _ => return None,
    };

    Some(NewNotification {
        user_id,
        kind: event.kind.clone(),
        title: title.to_string(),
        message,
        data: event.payload.clone(),
    })
}

/// Spawn the dispatcher on a background task subscribed to `bus`.
pub fn spawn_dispatcher(pool: DbPool, bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let dispatcher = NotificationDispatcher::new(pool);
    let rx = bus.subscribe();
    tokio::spawn(dispatcher.run(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_without_a_recipient_produce_no_notification() {
        let event = DomainEvent::new(kinds::PROPERTY_CREATED)
            .with_payload(json!({ "title": "Beach plot" }));
        assert!(build_notification(&event).is_none());
    }

    #[test]
    fn viewing_requested_notifies_the_payload_recipient() {
        let event = DomainEvent::new(kinds::VIEWING_REQUESTED).with_payload(json!({
            "notify_user_id": 9,
            "property_title": "Sunny flat",
        }));

        let notification = build_notification(&event).expect("should notify");
        assert_eq!(notification.user_id, 9);
        assert_eq!(notification.kind, kinds::VIEWING_REQUESTED);
        assert!(notification.message.contains("Sunny flat"));
    }

    #[test]
    fn unknown_kinds_are_ignored_even_with_a_recipient() {
        let event = DomainEvent::new(kinds::SAVED_SEARCH_CREATED)
            .with_payload(json!({ "notify_user_id": 9 }));
        assert!(build_notification(&event).is_none());
    }
}
