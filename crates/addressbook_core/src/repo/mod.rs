//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence contract behind the contact store.
//! - Isolate SQLite query details from store/service orchestration.
//!
//! # Invariants
//! - Repository APIs report absence (`false`) separately from DB errors.

pub mod contact_repo;
