//! The booking engine: orchestration plus post-commit reconciliation.
//!
//! Lockout and waitlist maintenance are named, independently testable,
//! idempotent functions the orchestrator invokes explicitly after a
//! committed write. Reconciliation never fails the triggering booking or
//! cancellation call: faults are logged and the next booking write for
//! the lesson reconciles from scratch.

pub mod eligibility;
pub mod lockout;
pub mod orchestrator;
pub mod waitlist;
