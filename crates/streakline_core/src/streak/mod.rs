//! Derived projections over the completion ledger.
//!
//! # Responsibility
//! - Compute streak counters as a pure function of completion history.
//! - Compute the per-day aggregate used for calendar rings.
//! - Compute goal-count progress as a presentation policy over the ledger.
//!
//! # Invariants
//! - Nothing in this module reads storage or the wall clock; callers pass
//!   history and "today" explicitly.

pub mod aggregate;
pub mod engine;
pub mod progress;
