//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations offered to the front end.
//! - Translate repository outcomes into user-facing error kinds.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - A failed operation leaves every record unchanged.

pub mod catalog_service;
pub mod loan_service;
pub mod patron_service;
