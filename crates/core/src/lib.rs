//! Pure domain logic for the booking & capacity engine.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API layer, and any future CLI or worker tooling.
//! Everything here is a pure function or a plain data type: capacity,
//! per-viewer availability, lockout decisions, eligibility decisions, and
//! the booking-row state machine. Nothing in this crate touches the
//! database or the clock — callers pass `now` in explicitly.

pub mod availability;
pub mod booking;
pub mod capacity;
pub mod eligibility;
pub mod error;
pub mod lockout;
pub mod types;
