//! Catalog search entry points.
//!
//! # Responsibility
//! - Expose field-specific substring search over books.
//! - Keep strategy selection as one typed value instead of per-field functions.

pub mod strategy;
