//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book record shapes shared by storage, services and views.
//!
//! # Invariants
//! - `storage_key` is assigned by the repository and never accepted from callers.
//! - Numeric-looking fields (`pages`, `year`) stay strings end to end.

pub mod book;
