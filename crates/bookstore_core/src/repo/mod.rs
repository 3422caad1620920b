//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the catalog data access contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs distinguish "no match" outcomes from storage faults.

pub mod catalog_repo;
