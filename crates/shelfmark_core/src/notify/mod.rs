//! Availability notification for loan-state changes.
//!
//! # Responsibility
//! - Hold the session-wide observer registry keyed by book title.
//! - Provide a reference observer that tracks books currently on loan.
//!
//! # Invariants
//! - Registries live as long as the session that created them; nothing is persisted.
//! - Observers are notified only after a transition has been stored.

pub mod registry;
pub mod watch_list;
