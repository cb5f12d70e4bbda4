//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`BookingEvent`]s. It is
//! shared via `Arc<EventBus>` across the application. Delivery is
//! best-effort: a lagging or absent subscriber never blocks or fails the
//! publishing booking flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studiobook_core::types::DbId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// BookingEvent
// ---------------------------------------------------------------------------

/// A booking-engine event.
///
/// `event_type` is dot-separated, e.g. `"booking.confirmed"`,
/// `"booking.cancelled"`, or `"waitlist.seat_available"` (the promotion
/// signal consumed by notification dispatch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub event_type: String,
    pub tenant_id: DbId,
    pub lesson_id: DbId,
    /// The booking the event concerns (for promotion signals, the
    /// waiting booking that should be offered the seat).
    pub booking_id: Option<DbId>,
    /// The user to notify, when the event targets one.
    pub user_id: Option<DbId>,
    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,
    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl BookingEvent {
    /// Create an event with only the required routing fields.
    pub fn new(event_type: impl Into<String>, tenant_id: DbId, lesson_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            tenant_id,
            lesson_id,
            booking_id: None,
            user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the booking the event concerns.
    pub fn with_booking(mut self, booking_id: DbId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Attach the target user.
    pub fn with_user(mut self, user_id: DbId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`BookingEvent`].
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that received it. Zero is not
    /// an error: the engine publishes regardless of whether anyone is
    /// listening.
    pub fn publish(&self, event: BookingEvent) -> usize {
        let event_type = event.event_type.clone();
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(%event_type, "No subscribers for event");
                0
            }
        }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
