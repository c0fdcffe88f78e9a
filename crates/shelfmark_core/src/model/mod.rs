//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book and patron records persisted by the catalog store.
//! - Own the two state invariants the loan engine relies on.
//!
//! # Invariants
//! - A book has a borrower exactly when it is on loan.
//! - A patron has a ban date exactly when it is banned.

pub mod book;
pub mod patron;
