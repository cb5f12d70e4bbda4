//! Booking lifecycle events and waitlist promotion signals.
//!
//! The engine publishes facts here after a committed write; the external
//! notification dispatcher subscribes and owns delivery and retry.

pub mod bus;

pub use bus::{BookingEvent, EventBus};
