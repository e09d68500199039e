//! In-memory contact store.
//!
//! # Responsibility
//! - Own the single ordered contact list shared by all use cases.
//! - Write every mutation through to the repository before returning.

pub mod contact_store;
